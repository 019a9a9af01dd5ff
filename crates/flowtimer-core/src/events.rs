use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every engine transition produces an Event.
/// The shell prints them, persists contributions from them, and routes
/// completion effects through the sinks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        total_secs: u64,
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown was stopped before reaching zero. Elapsed time is
    /// attributed to the selected task; completion effects do not fire.
    TimerStopped {
        elapsed_secs: u64,
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero naturally. The full run is attributed and
    /// the completion notification/sound fire.
    TimerCompleted {
        total_secs: u64,
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        total_secs: u64,
        remaining_secs: u64,
        progress_pct: f64,
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
}
