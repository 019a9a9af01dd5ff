//! One-second scheduling source.
//!
//! The engine itself is tick-driven; this is the signal a shell subscribes
//! to while the engine is Running. Constructing a `Ticker` subscribes,
//! dropping it unsubscribes - drop is synchronous, so once the driver lets
//! go of the ticker no further tick can reach the engine.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

pub struct Ticker {
    interval: Interval,
}

impl Ticker {
    /// 1 Hz ticker. The first tick fires one second from now, not
    /// immediately; missed ticks are skipped rather than bursted, so a
    /// stalled driver never delivers decrements faster than wall time.
    pub fn one_second() -> Self {
        let period = Duration::from_secs(1);
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    /// Wait for the next tick.
    pub async fn next(&mut self) {
        self.interval.tick().await;
    }
}
