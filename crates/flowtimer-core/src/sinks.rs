//! Collaborator interfaces the core consumes.
//!
//! The engine never talks to the OS, a database, or a speaker directly;
//! shells implement these traits and the effect router calls them.
//! Everything here is best-effort from the engine's point of view: a
//! failing sink is logged at the boundary and never changes engine phase.

use thiserror::Error;

use crate::timer::ContributionKind;

/// A sink failed to deliver. Carries a display message only; the router
/// logs it and moves on.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SinkError(pub String);

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Raises a user-visible notification. Fire-and-forget.
pub trait NotificationSink {
    fn notify(&self, title: &str, body: &str) -> Result<(), SinkError>;
}

/// Plays the completion sound. Fire-and-forget.
pub trait AudioSink {
    fn play_completion(&self) -> Result<(), SinkError>;
}

/// Caller-owned task accumulator. The core only ever adds; it never reads
/// task state back.
pub trait TaskStore {
    fn add_contribution(
        &self,
        task_id: &str,
        secs: u64,
        kind: ContributionKind,
    ) -> Result<(), SinkError>;
}
