//! Timer engine implementation.
//!
//! The engine is a tick-driven state machine. It owns no thread and no
//! clock - the caller delivers one `tick()` per scheduling signal
//! (nominally 1 Hz) while the engine is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> ... -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = FlowEngine::new();
//! engine.start(&flow, Some(task_id))?;
//! // Per scheduling signal:
//! engine.tick(); // Returns Some(Event::TimerCompleted) at zero
//! ```
//!
//! The engine decrements exactly once per delivered tick and never while
//! Paused or Idle; cancellation (`stop`) is synchronous, so no tick applies
//! after it returns. Total duration is captured once at start - editing the
//! source preset mid-run cannot change it.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::events::Event;
use crate::flow::Flow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
}

/// Countdown state machine for one flow run.
///
/// A plain value owned by the caller; any number of independent engines can
/// coexist. Serializable so a shell can persist it between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEngine {
    phase: Phase,
    /// Total seconds of the run, fixed at start.
    total_secs: u64,
    /// Seconds left; invariant `remaining_secs <= total_secs`.
    remaining_secs: u64,
    /// Task selected at start; attribution target for this run.
    #[serde(default)]
    task_id: Option<String>,
}

impl FlowEngine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            total_secs: 0,
            remaining_secs: 0,
            task_id: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.total_secs - self.remaining_secs
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    /// 0.0 .. 100.0 progress across the run.
    pub fn progress_pct(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        self.elapsed_secs() as f64 / self.total_secs as f64 * 100.0
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            total_secs: self.total_secs,
            remaining_secs: self.remaining_secs,
            progress_pct: self.progress_pct(),
            task_id: self.task_id.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a run from Idle, or resume from Paused.
    ///
    /// From Idle the flow's duration is computed once and captured; the
    /// flow itself is not retained. An empty flow is rejected with
    /// `FlowError::EmptyFlow` and no state change, so the shell can
    /// disable the action. From Paused the countdown resumes from the
    /// retained remainder and `flow`/`task_id` are ignored.
    pub fn start(&mut self, flow: &Flow, task_id: Option<String>) -> Result<Event, FlowError> {
        match self.phase {
            Phase::Idle => {
                if flow.is_empty() {
                    return Err(FlowError::EmptyFlow);
                }
                self.total_secs = flow.total_secs();
                self.remaining_secs = self.total_secs;
                self.task_id = task_id;
                self.phase = Phase::Running;
                Ok(Event::TimerStarted {
                    total_secs: self.total_secs,
                    task_id: self.task_id.clone(),
                    at: Utc::now(),
                })
            }
            Phase::Paused => {
                self.phase = Phase::Running;
                Ok(Event::TimerResumed {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            Phase::Running => Err(FlowError::AlreadyRunning),
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.phase {
            Phase::Running => {
                self.phase = Phase::Paused;
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    pub fn resume(&mut self) -> Option<Event> {
        match self.phase {
            Phase::Paused => {
                self.phase = Phase::Running;
                Some(Event::TimerResumed {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Stop the run early.
    ///
    /// Returns `TimerStopped` carrying the elapsed seconds for manual-stop
    /// attribution. Completion effects never fire on this path. No-op when
    /// already Idle.
    pub fn stop(&mut self) -> Option<Event> {
        match self.phase {
            Phase::Running | Phase::Paused => {
                let elapsed = self.elapsed_secs();
                let task_id = self.task_id.take();
                self.phase = Phase::Idle;
                self.total_secs = 0;
                self.remaining_secs = 0;
                Some(Event::TimerStopped {
                    elapsed_secs: elapsed,
                    task_id,
                    at: Utc::now(),
                })
            }
            Phase::Idle => None,
        }
    }

    /// Reset to Idle. Equivalent to `stop`, except it is rejected while
    /// Running; from Idle it is a no-op with no attribution side effect.
    pub fn reset(&mut self) -> Result<Option<Event>, FlowError> {
        if self.phase == Phase::Running {
            return Err(FlowError::ResetWhileRunning);
        }
        Ok(self.stop())
    }

    /// Deliver one scheduling tick.
    ///
    /// Exactly one decrement per call while Running; completion triggers
    /// synchronously within the tick that reaches zero. Ticks delivered
    /// while Paused or Idle are ignored.
    pub fn tick(&mut self) -> Option<Event> {
        if self.phase != Phase::Running {
            return None;
        }
        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return None;
        }
        self.remaining_secs = 0;
        self.phase = Phase::Idle;
        let event = Event::TimerCompleted {
            total_secs: self.total_secs,
            task_id: self.task_id.take(),
            at: Utc::now(),
        };
        self.total_secs = 0;
        Some(event)
    }
}

impl Default for FlowEngine {
    fn default() -> Self {
        Self::new()
    }
}
