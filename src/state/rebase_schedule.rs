//! When the ledger last rebased and how often.

use odra::prelude::*;

/// Rebase timing state of the ledger.
///
/// The next rebase is due one interval after the previous successful one,
/// not on wall-clock boundaries.
#[odra::odra_type]
#[derive(Copy, Default)]
pub struct RebaseSchedule {
    /// Block time of the last successful rebase, zero before the first
    pub last_rebase: u64,
    /// Number of successful rebases
    pub rebase_count: u64,
}

impl RebaseSchedule {
    /// Earliest block time at which the next rebase may run
    pub fn next_rebase_time(&self, interval: u64) -> u64 {
        self.last_rebase.saturating_add(interval)
    }

    /// Check if a rebase may run at `now`
    pub fn is_ready(&self, now: u64, interval: u64) -> bool {
        now >= self.next_rebase_time(interval)
    }

    /// Record a successful rebase at `now`
    pub fn record(&mut self, now: u64) {
        self.last_rebase = now;
        self.rebase_count += 1;
    }
}
