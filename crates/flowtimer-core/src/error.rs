//! Core error types for flowtimer-core.
//!
//! Every fallible operation in the library reports through this hierarchy;
//! nothing here is fatal to the process and the timer engine is left in a
//! well-defined phase after any error.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for flowtimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Flow model and engine transition errors
    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    /// Database-related errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the flow tree and the timer engine.
#[derive(Error, Debug)]
pub enum FlowError {
    /// `start` was called with an empty flow. Non-fatal; no state change.
    #[error("flow is empty")]
    EmptyFlow,

    /// `start` was called while a countdown is already running.
    #[error("timer is already running")]
    AlreadyRunning,

    /// `reset` was called while running; the countdown keeps running.
    #[error("reset is not allowed while the timer is running")]
    ResetWhileRunning,

    /// A flow edit was addressed with an empty path.
    #[error("flow path is empty")]
    EmptyPath,

    /// A path segment points past the end of its sequence.
    #[error("index {index} out of bounds for sequence of length {len}")]
    OutOfBounds { index: usize, len: usize },

    /// A path descends into a step that has no children.
    #[error("step at index {index} is not a loop")]
    NotALoop { index: usize },
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the database file
    #[error("failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// A stored JSON value could not be decoded
    #[error("stored value is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Referenced preset does not exist
    #[error("no such preset: {0}")]
    PresetNotFound(String),

    /// Referenced task does not exist
    #[error("no such task: {0}")]
    TaskNotFound(String),

    /// Data directory could not be created
    #[error("data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-separated key passed to get/set
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Value could not be parsed for the key's type
    #[error("cannot parse '{value}' for key '{key}'")]
    InvalidValue { key: String, value: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
