//! Error kinds reported by the oracle and the ledger.
//!
//! Every failing entry point reverts with exactly one of these codes, so an
//! operator can tell "not authorized" apart from "rate out of bounds" or
//! "too soon to rebase". Oracle codes start at 1, ledger codes at 100.

use core::fmt;
use odra::prelude::*;

/// Failures of the rate oracle.
#[odra::odra_error]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OracleError {
    /// Caller is neither the owner nor an authorized updater
    Unauthorized = 1,
    /// Rate outside `[MIN_RATE, MAX_RATE]`
    OutOfRange = 2,
    /// Emergency write attempted while the rate is still fresh
    NotStale = 3,
    /// Zero identity passed where a real account is required
    InvalidIdentity = 4,
    /// Feed value could not be parsed into a fixed-point rate
    InvalidFeedValue = 5,
}

impl OracleError {
    /// Human readable description of the error.
    pub fn message(&self) -> &str {
        match self {
            OracleError::Unauthorized => "Caller is not allowed to update the rate",
            OracleError::OutOfRange => "Rate is outside the accepted bounds",
            OracleError::NotStale => "Rate is still fresh, emergency update refused",
            OracleError::InvalidIdentity => "Identity must not be the zero address",
            OracleError::InvalidFeedValue => "Feed value is not a valid non-negative decimal",
        }
    }
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Failures of the rebase ledger.
#[odra::odra_error]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerError {
    // 100
    /// Caller lacks the required role
    Unauthorized = 100,
    /// Rebase interval has not elapsed
    RebaseNotReady = 101,
    /// Rebase re-entered while running
    Reentrant = 102,
    /// Balance below the requested amount
    InsufficientBalance = 103,
    /// Zero address where a real one is required
    InvalidAddress = 104,

    // 105
    /// Transfers are paused
    Paused = 105,
    /// Result does not fit in U256
    MathOverflow = 106,
    /// Allowance below the requested amount
    InsufficientAllowance = 107,
    /// Amount must be positive
    InvalidAmount = 108,
    /// Rate source is paused or stale
    OracleUnhealthy = 109,
}

impl LedgerError {
    /// Human readable description of the error.
    pub fn message(&self) -> &str {
        match self {
            LedgerError::Unauthorized => "Caller is not allowed to perform this operation",
            LedgerError::RebaseNotReady => "Rebase interval has not elapsed yet",
            LedgerError::Reentrant => "Rebase is already in progress",
            LedgerError::InsufficientBalance => "Balance is lower than the requested amount",
            LedgerError::InvalidAddress => "Address must not be the zero address",
            LedgerError::Paused => "Ledger is paused",
            LedgerError::MathOverflow => "Math operation overflow",
            LedgerError::InsufficientAllowance => "Allowance is lower than the requested amount",
            LedgerError::InvalidAmount => "Amount must be greater than zero",
            LedgerError::OracleUnhealthy => "Rate source is paused or stale",
        }
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
