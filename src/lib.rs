#![cfg_attr(target_arch = "wasm32", no_std)]
#![allow(clippy::arithmetic_side_effects)]
#![deny(missing_docs)]

//! Yield-bearing rebase ledger for the Casper blockchain.
//!
//! - **RateOracle**: bounded, staleness-aware rate feed written by authorized
//!   updaters.
//! - **RebaseLedger**: share ledger whose balances grow with a global scaling
//!   factor, compounded once per rebase interval from the oracle rate.

extern crate alloc;

pub mod access;
pub mod error;
pub mod feed;
pub mod interfaces;
pub mod ledger;
pub mod math;
pub mod oracle;
pub mod state;

#[cfg(test)]
pub mod mock;

pub use error::{LedgerError, OracleError};
pub use ledger::{LedgerStats, RebaseLedger};
pub use oracle::{RateOracle, RateSnapshot};
