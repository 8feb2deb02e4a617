//! Cross-contract interfaces.

/// Anything the ledger can read a rate from.
///
/// Implemented by [`crate::oracle::RateOracle`]; tests substitute mocks.
#[odra::external_contract]
pub trait RateSource {
    /// Current rate in basis points.
    fn read(&self) -> u64;
    /// True when the source is unpaused and its rate is fresh.
    fn is_healthy(&self) -> bool;
}
