//! Effect routing for terminal engine events.
//!
//! The engine emits values; this router turns the two terminal events into
//! their observable effects. Completion attributes the full run and fires
//! the notification and audio sinks; a manual stop attributes elapsed time
//! only. Sink failures are swallowed here - logged, never raised back.

use tracing::warn;

use super::attribution::{AttributionPolicy, ContributionKind};
use crate::events::Event;
use crate::sinks::{AudioSink, NotificationSink, TaskStore};

pub struct EffectRouter<'a> {
    policy: AttributionPolicy,
    tasks: Option<&'a dyn TaskStore>,
    notifier: Option<&'a dyn NotificationSink>,
    audio: Option<&'a dyn AudioSink>,
}

impl<'a> EffectRouter<'a> {
    pub fn new(policy: AttributionPolicy) -> Self {
        Self {
            policy,
            tasks: None,
            notifier: None,
            audio: None,
        }
    }

    pub fn with_task_store(mut self, tasks: &'a dyn TaskStore) -> Self {
        self.tasks = Some(tasks);
        self
    }

    pub fn with_notifier(mut self, notifier: &'a dyn NotificationSink) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_audio(mut self, audio: &'a dyn AudioSink) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Apply the effects of one event. Non-terminal events pass through
    /// untouched.
    pub fn handle(&self, event: &Event) {
        match event {
            Event::TimerCompleted {
                total_secs,
                task_id,
                ..
            } => {
                self.record(task_id.as_deref(), *total_secs, ContributionKind::Complete);
                if let Some(notifier) = self.notifier {
                    if let Err(e) = notifier.notify("Timer finished", "The timer has completed") {
                        warn!(error = %e, "notification sink failed");
                    }
                }
                if let Some(audio) = self.audio {
                    if let Err(e) = audio.play_completion() {
                        warn!(error = %e, "audio sink failed");
                    }
                }
            }
            Event::TimerStopped {
                elapsed_secs,
                task_id,
                ..
            } => {
                self.record(
                    task_id.as_deref(),
                    *elapsed_secs,
                    ContributionKind::ManualStop,
                );
            }
            _ => {}
        }
    }

    fn record(&self, task_id: Option<&str>, elapsed_secs: u64, kind: ContributionKind) {
        let (Some(tasks), Some(task_id)) = (self.tasks, task_id) else {
            return;
        };
        let Some(amount) = self.policy.contribution(elapsed_secs) else {
            return;
        };
        if let Err(e) = tasks.add_contribution(task_id, amount, kind) {
            warn!(error = %e, task_id, "failed to record contribution");
        }
    }
}
