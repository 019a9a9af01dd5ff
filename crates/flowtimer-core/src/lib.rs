//! # Flowtimer Core Library
//!
//! This library provides the core logic for Flowtimer: composable timer
//! flows executed as a single countdown, with elapsed time attributed to a
//! tracked task. The CLI binary is a thin shell over this library; it owns
//! persistence timing, the 1 Hz scheduling signal, and the terminal sinks.
//!
//! ## Architecture
//!
//! - **Flow Tree**: an ordered sequence of steps (timers, notification
//!   markers, loops of nested steps) with a pure recursive duration fold
//! - **Timer Engine**: a tick-driven state machine; the caller delivers one
//!   `tick()` per scheduling signal while the engine is running
//! - **Attribution**: policy turning elapsed run time into a recorded
//!   contribution against the selected task
//! - **Storage**: SQLite-backed presets/tasks/contributions and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`Flow`] / [`Step`]: the flow tree model
//! - [`FlowEngine`]: countdown state machine
//! - [`EffectRouter`]: routes terminal events to attribution and sinks
//! - [`Database`]: preset, task, and contribution persistence
//! - [`Config`]: application configuration

pub mod error;
pub mod events;
pub mod flow;
pub mod sinks;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, FlowError, StoreError};
pub use events::Event;
pub use flow::{Flow, NotifyKind, Preset, Step};
pub use sinks::{AudioSink, NotificationSink, SinkError, TaskStore};
pub use storage::{Config, Database, Stats, TaskRecord};
pub use timer::{AttributionPolicy, ContributionKind, EffectRouter, FlowEngine, Phase, Ticker};
