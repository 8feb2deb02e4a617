//! Test double for the ledger's rate source.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::ledger::RebaseLedgerContractRef;

/// Rate source with a settable rate and health flag.
///
/// When armed with a ledger address, `read` calls back into that ledger's
/// `rebase` before answering.
#[odra::module]
pub struct MockRateSource {
    rate: Var<u64>,
    healthy: Var<bool>,
    reentry_target: Var<Address>,
}

#[odra::module]
impl MockRateSource {
    /// Starts healthy at `rate`
    pub fn init(&mut self, rate: u64) {
        self.rate.set(rate);
        self.healthy.set(true);
    }

    /// Rate returned by `read`
    pub fn set_rate(&mut self, rate: u64) {
        self.rate.set(rate);
    }

    /// Health returned by `is_healthy`
    pub fn set_healthy(&mut self, healthy: bool) {
        self.healthy.set(healthy);
    }

    /// Make the next `read` call back into `ledger`
    pub fn arm_reentry(&mut self, ledger: Address) {
        self.reentry_target.set(ledger);
    }

    /// Current rate, after the armed callback if any
    pub fn read(&self) -> u64 {
        if let Some(ledger) = self.reentry_target.get() {
            let mut ledger = RebaseLedgerContractRef::new(self.env(), ledger);
            ledger.rebase();
        }
        self.rate.get_or_default()
    }

    /// Current health flag
    pub fn is_healthy(&self) -> bool {
        self.healthy.get_or_default()
    }

    /// Call `rebase` on `ledger` with this contract as the caller
    pub fn trigger_rebase(&mut self, ledger: Address) -> U256 {
        let mut ledger = RebaseLedgerContractRef::new(self.env(), ledger);
        ledger.rebase()
    }
}
