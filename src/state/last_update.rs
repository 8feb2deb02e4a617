//! Freshness record of the oracle rate.

use odra::prelude::*;

/// Freshness of the oracle rate, measured in block time (milliseconds).
#[odra::odra_type]
#[derive(Copy, Default)]
pub struct LastUpdate {
    /// Block time of the last accepted write
    pub timestamp: u64,
}

impl LastUpdate {
    /// Create a record stamped at `now`
    pub fn new(now: u64) -> Self {
        Self { timestamp: now }
    }

    /// Return time elapsed since the last update
    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.timestamp)
    }

    /// Stamp a new update; the timestamp never moves backwards
    pub fn touch(&mut self, now: u64) {
        self.timestamp = self.timestamp.max(now);
    }

    /// True once more than `threshold` has passed since the last update
    pub fn is_stale(&self, now: u64, threshold: u64) -> bool {
        self.elapsed(now) > threshold
    }

    /// Time left before the record turns stale, zero if it already is
    pub fn time_until_stale(&self, now: u64, threshold: u64) -> u64 {
        self.timestamp
            .saturating_add(threshold)
            .saturating_sub(now)
    }
}
