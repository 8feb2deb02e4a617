//! Persisted state records and the timing constants they are checked against

pub mod last_update;
pub mod rebase_schedule;

pub use last_update::LastUpdate;
pub use rebase_schedule::RebaseSchedule;

/// One hour of block time, in milliseconds
pub const HOUR: u64 = 60 * 60 * 1_000;

/// Time after which an oracle rate is considered stale
pub const STALE_THRESHOLD: u64 = 48 * HOUR;

/// Minimum spacing between two rebases
pub const REBASE_INTERVAL: u64 = 24 * HOUR;

/// Lowest rate the oracle accepts (basis points)
pub const MIN_RATE: u64 = 0;

/// Highest rate the oracle accepts (basis points, 50%)
pub const MAX_RATE: u64 = 5_000;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rebase_runs_before_rate_goes_stale() {
        assert!(REBASE_INTERVAL < STALE_THRESHOLD);
        assert!(MIN_RATE <= MAX_RATE);
    }
}
