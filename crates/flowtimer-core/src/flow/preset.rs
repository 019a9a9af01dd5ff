use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Flow;

/// A named, persisted flow.
///
/// Presets are the unit of CRUD in storage and the thing a user selects
/// when starting the timer. The flow inside is a snapshot value; editing a
/// preset replaces its flow wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub flow: Flow,
}

impl Preset {
    /// New empty preset with a fresh v4 id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            flow: Flow::default(),
        }
    }

    /// Same preset with a different flow.
    pub fn with_flow(mut self, flow: Flow) -> Self {
        self.flow = flow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::Step;

    #[test]
    fn new_presets_start_empty_with_unique_ids() {
        let a = Preset::new("morning");
        let b = Preset::new("morning");
        assert!(a.flow.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn preset_roundtrips_through_json() {
        let preset = Preset::new("deep work")
            .with_flow(Flow::new(vec![Step::Timer { minutes: 50 }]));
        let json = serde_json::to_string(&preset).unwrap();
        let back: Preset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, preset);
    }
}
