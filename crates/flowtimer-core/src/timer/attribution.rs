//! Time attribution policy.
//!
//! Converts the elapsed time of a finished or aborted run into the amount
//! recorded against the selected task. The stored unit is always seconds;
//! the minute-floor policy rounds down to whole minutes before recording,
//! for consumers that only ever display minutes.

use serde::{Deserialize, Serialize};

/// How elapsed seconds become a recorded contribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionPolicy {
    /// Second-granularity accumulation. Canonical: lossless.
    #[default]
    Seconds,
    /// Floor to whole minutes. Sub-minute runs record nothing.
    MinuteFloor,
}

impl AttributionPolicy {
    /// Amount to record for `elapsed_secs`, or `None` when nothing should
    /// be recorded (zero elapsed, or sub-minute under minute-floor).
    pub fn contribution(&self, elapsed_secs: u64) -> Option<u64> {
        let amount = match self {
            AttributionPolicy::Seconds => elapsed_secs,
            AttributionPolicy::MinuteFloor => (elapsed_secs / 60) * 60,
        };
        (amount > 0).then_some(amount)
    }
}

/// Why a contribution was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
    /// Countdown reached zero naturally; the full run is attributed.
    Complete,
    /// User stopped early; elapsed time so far is attributed.
    ManualStop,
}

impl ContributionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionKind::Complete => "complete",
            ContributionKind::ManualStop => "manual_stop",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_policy_is_lossless() {
        assert_eq!(AttributionPolicy::Seconds.contribution(90), Some(90));
        assert_eq!(AttributionPolicy::Seconds.contribution(1), Some(1));
    }

    #[test]
    fn zero_elapsed_records_nothing() {
        assert_eq!(AttributionPolicy::Seconds.contribution(0), None);
        assert_eq!(AttributionPolicy::MinuteFloor.contribution(0), None);
    }

    #[test]
    fn minute_floor_rounds_down_to_whole_minutes() {
        assert_eq!(AttributionPolicy::MinuteFloor.contribution(90), Some(60));
        assert_eq!(AttributionPolicy::MinuteFloor.contribution(120), Some(120));
    }

    #[test]
    fn minute_floor_drops_sub_minute_runs() {
        assert_eq!(AttributionPolicy::MinuteFloor.contribution(59), None);
    }

    #[test]
    fn policy_parses_from_config_strings() {
        let p: AttributionPolicy = serde_json::from_str("\"minute_floor\"").unwrap();
        assert_eq!(p, AttributionPolicy::MinuteFloor);
        let p: AttributionPolicy = serde_json::from_str("\"seconds\"").unwrap();
        assert_eq!(p, AttributionPolicy::Seconds);
    }
}
