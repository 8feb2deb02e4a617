//! Rebasing share ledger.
//!
//! Accounts hold shares; balances are derived as
//! `shares * scaling_factor / WAD`. A rebase grows the single global factor,
//! so every balance moves at once without touching any account record.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::access::is_zero_address;
use crate::error::LedgerError;
use crate::interfaces::RateSourceContractRef;
use crate::math::{rebase_rate, ScalingFactor, TryAdd, TrySub};
use crate::state::{RebaseSchedule, REBASE_INTERVAL};

/// Share ledger whose balances follow a global scaling factor
#[odra::module(
    events = [Rebased, Transfer, Approval, OracleUpdated, LedgerPaused, LedgerUnpaused, OwnershipTransferred],
    errors = LedgerError
)]
pub struct RebaseLedger {
    // Token metadata
    name: Var<String>,
    symbol: Var<String>,
    decimals: Var<u8>,

    // Share accounting
    shares: Mapping<Address, U256>,
    total_shares: Var<U256>,
    allowances: Mapping<(Address, Address), U256>,

    // Scaling state
    scaling_factor: Var<ScalingFactor>,
    schedule: Var<RebaseSchedule>,
    rebase_in_progress: Var<bool>,

    // Administration
    owner: Var<Address>,
    oracle: Var<Address>,
    paused: Var<bool>,
}

#[odra::module]
impl RebaseLedger {
    // ===========================================================================
    // CONSTRUCTOR
    // ===========================================================================

    /// Issue `initial_supply` shares to `owner` at the initial factor
    pub fn init(
        &mut self,
        name: String,
        symbol: String,
        decimals: u8,
        initial_supply: U256,
        owner: Address,
        oracle: Address,
    ) {
        if is_zero_address(&owner) || is_zero_address(&oracle) {
            self.env().revert(LedgerError::InvalidAddress);
        }
        if initial_supply.is_zero() {
            self.env().revert(LedgerError::InvalidAmount);
        }

        self.name.set(name);
        self.symbol.set(symbol);
        self.decimals.set(decimals);
        self.owner.set(owner);
        self.oracle.set(oracle);
        self.paused.set(false);
        self.rebase_in_progress.set(false);
        self.scaling_factor.set(ScalingFactor::one());
        self.schedule.set(RebaseSchedule::default());

        // Shares equal units at the initial factor.
        self.shares.set(&owner, initial_supply);
        self.total_shares.set(initial_supply);

        self.env().emit_event(Transfer {
            from: None,
            to: Some(owner),
            amount: initial_supply,
            shares: initial_supply,
        });
    }

    // ===========================================================================
    // FUNGIBLE ASSET INTERFACE
    // ===========================================================================

    /// Token name
    pub fn name(&self) -> String {
        self.name.get_or_default()
    }

    /// Token symbol
    pub fn symbol(&self) -> String {
        self.symbol.get_or_default()
    }

    /// Display decimals of balances
    pub fn decimals(&self) -> u8 {
        self.decimals.get_or_default()
    }

    /// Balance of `owner` at the current scaling factor
    pub fn balance_of(&self, owner: Address) -> U256 {
        let shares = self.shares_of(owner);
        self.unwrap_or_revert(self.factor().tokens_for_shares(shares))
    }

    /// Sum of all balances at the current scaling factor
    pub fn total_supply(&self) -> U256 {
        let total = self.total_shares();
        self.unwrap_or_revert(self.factor().tokens_for_shares(total))
    }

    /// Move `amount` of balance from the caller to `recipient`.
    ///
    /// The amount is converted to shares at the current factor, rounding
    /// down, so the sender is never debited more than `amount` is worth. The
    /// emitted `Transfer` carries the value of the shares actually moved.
    pub fn transfer(&mut self, recipient: Address, amount: U256) {
        let sender = self.env().caller();
        self.assert_not_paused();
        if self.balance_of(sender) < amount {
            self.env().revert(LedgerError::InsufficientBalance);
        }
        let shares = self.unwrap_or_revert(self.factor().shares_for_tokens(amount));
        let moved = self.tokens_for_shares(shares);
        self.move_shares(sender, recipient, shares, moved);
    }

    /// Move `shares` verbatim from the caller to `recipient`
    pub fn transfer_shares(&mut self, recipient: Address, shares: U256) {
        let sender = self.env().caller();
        self.assert_not_paused();
        if self.shares_of(sender) < shares {
            self.env().revert(LedgerError::InsufficientBalance);
        }
        let amount = self.tokens_for_shares(shares);
        self.move_shares(sender, recipient, shares, amount);
    }

    /// Allow `spender` to move up to `amount` of the caller's balance
    pub fn approve(&mut self, spender: Address, amount: U256) {
        let owner = self.env().caller();
        if is_zero_address(&spender) {
            self.env().revert(LedgerError::InvalidAddress);
        }
        self.allowances.set(&(owner, spender), amount);
        self.env().emit_event(Approval {
            owner,
            spender,
            amount,
        });
    }

    /// Balance `spender` may still move on behalf of `owner`
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get_or_default(&(owner, spender))
    }

    /// Move `amount` from `owner` to `recipient` against the caller's allowance
    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) {
        let spender = self.env().caller();
        self.assert_not_paused();

        let allowance = self.allowance(owner, spender);
        if allowance < amount {
            self.env().revert(LedgerError::InsufficientAllowance);
        }
        if self.balance_of(owner) < amount {
            self.env().revert(LedgerError::InsufficientBalance);
        }

        self.allowances.set(&(owner, spender), allowance - amount);
        let shares = self.unwrap_or_revert(self.factor().shares_for_tokens(amount));
        let moved = self.tokens_for_shares(shares);
        self.move_shares(owner, recipient, shares, moved);
    }

    // ===========================================================================
    // SHARE INTROSPECTION
    // ===========================================================================

    /// Raw shares held by `owner`
    pub fn shares_of(&self, owner: Address) -> U256 {
        self.shares.get_or_default(&owner)
    }

    /// Sum of all shares, fixed at issuance
    pub fn total_shares(&self) -> U256 {
        self.total_shares.get_or_default()
    }

    /// Balance worth of `shares`, rounded down
    pub fn tokens_for_shares(&self, shares: U256) -> U256 {
        self.unwrap_or_revert(self.factor().tokens_for_shares(shares))
    }

    /// Shares worth of `amount`, rounded down
    pub fn shares_for_tokens(&self, amount: U256) -> U256 {
        self.unwrap_or_revert(self.factor().shares_for_tokens(amount))
    }

    /// Raw scaling factor, 18 decimals
    pub fn scaling_factor(&self) -> U256 {
        self.factor().to_scaled_val()
    }

    // ===========================================================================
    // REBASE
    // ===========================================================================

    /// Oracle rate as currently reported
    pub fn current_rate(&self) -> u64 {
        self.rate_source().read()
    }

    /// Rate applied by the next rebase
    pub fn rebase_rate(&self) -> u64 {
        self.unwrap_or_revert(rebase_rate(self.current_rate()))
    }

    /// Grow the scaling factor by one rebase period.
    ///
    /// Owner or the configured oracle only, at most once per
    /// `REBASE_INTERVAL`, and only while the oracle reports healthy.
    /// Returns the new raw factor.
    pub fn rebase(&mut self) -> U256 {
        if self.rebase_in_progress.get_or_default() {
            self.env().revert(LedgerError::Reentrant);
        }

        self.rebase_in_progress.set(true);
        let outcome = self.apply_rebase();
        self.rebase_in_progress.set(false);

        self.unwrap_or_revert(outcome).to_scaled_val()
    }

    /// True once `REBASE_INTERVAL` has passed since the last rebase
    pub fn is_rebase_ready(&self) -> bool {
        self.schedule
            .get_or_default()
            .is_ready(self.env().get_block_time(), REBASE_INTERVAL)
    }

    /// Earliest block time of the next rebase
    pub fn next_rebase_time(&self) -> u64 {
        self.schedule.get_or_default().next_rebase_time(REBASE_INTERVAL)
    }

    /// Block time of the last successful rebase
    pub fn last_rebase_time(&self) -> u64 {
        self.schedule.get_or_default().last_rebase
    }

    /// Number of successful rebases
    pub fn rebase_count(&self) -> u64 {
        self.schedule.get_or_default().rebase_count
    }

    /// Read-only aggregate of the rebase state
    pub fn get_stats(&self) -> LedgerStats {
        let schedule = self.schedule.get_or_default();
        let source = self.rate_source();
        let current_rate = source.read();
        LedgerStats {
            last_rebase_time: schedule.last_rebase,
            next_rebase_time: schedule.next_rebase_time(REBASE_INTERVAL),
            rebase_count: schedule.rebase_count,
            current_rate,
            rebase_rate: self.unwrap_or_revert(rebase_rate(current_rate)),
            is_rebase_ready: schedule.is_ready(self.env().get_block_time(), REBASE_INTERVAL),
            scaling_factor: self.scaling_factor(),
            oracle_healthy: source.is_healthy(),
        }
    }

    // ===========================================================================
    // ADMINISTRATION
    // ===========================================================================

    /// Current owner
    pub fn owner(&self) -> Address {
        self.owner.get_or_revert_with(LedgerError::InvalidAddress)
    }

    /// Address of the rate source
    pub fn oracle(&self) -> Address {
        self.oracle.get_or_revert_with(LedgerError::InvalidAddress)
    }

    /// True while transfers are stopped
    pub fn is_paused(&self) -> bool {
        self.paused.get_or_default()
    }

    /// Point the ledger at another rate source. Does not rebase.
    pub fn update_oracle(&mut self, new_oracle: Address) {
        self.assert_owner();
        if is_zero_address(&new_oracle) {
            self.env().revert(LedgerError::InvalidAddress);
        }

        let previous_oracle = self.oracle();
        self.oracle.set(new_oracle);
        self.env().emit_event(OracleUpdated {
            previous_oracle,
            new_oracle,
        });
    }

    /// Stop transfers. Queries and rebases keep working.
    pub fn pause(&mut self) {
        let caller = self.assert_owner();
        self.paused.set(true);
        self.env().emit_event(LedgerPaused { by: caller });
    }

    /// Resume transfers
    pub fn unpause(&mut self) {
        let caller = self.assert_owner();
        self.paused.set(false);
        self.env().emit_event(LedgerUnpaused { by: caller });
    }

    /// Hand the ledger over to `new_owner`
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        let previous_owner = self.assert_owner();
        if is_zero_address(&new_owner) {
            self.env().revert(LedgerError::InvalidAddress);
        }

        self.owner.set(new_owner);
        self.env().emit_event(OwnershipTransferred {
            previous_owner,
            new_owner,
        });
    }
}

impl RebaseLedger {
    fn factor(&self) -> ScalingFactor {
        self.scaling_factor.get_or_default()
    }

    fn rate_source(&self) -> RateSourceContractRef {
        RateSourceContractRef::new(self.env(), self.oracle())
    }

    fn unwrap_or_revert<T>(&self, result: Result<T, LedgerError>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => self.env().revert(err),
        }
    }

    /// Revert unless the caller is the owner, return the caller otherwise
    fn assert_owner(&self) -> Address {
        let caller = self.env().caller();
        if caller != self.owner() {
            self.env().revert(LedgerError::Unauthorized);
        }
        caller
    }

    fn assert_not_paused(&self) {
        if self.is_paused() {
            self.env().revert(LedgerError::Paused);
        }
    }

    /// Body of `rebase`, run while the in-progress flag is held.
    fn apply_rebase(&mut self) -> Result<ScalingFactor, LedgerError> {
        let caller = self.env().caller();
        if caller != self.owner() && caller != self.oracle() {
            return Err(LedgerError::Unauthorized);
        }

        let now = self.env().get_block_time();
        let mut schedule = self.schedule.get_or_default();
        if !schedule.is_ready(now, REBASE_INTERVAL) {
            return Err(LedgerError::RebaseNotReady);
        }

        let source = self.rate_source();
        if !source.is_healthy() {
            return Err(LedgerError::OracleUnhealthy);
        }
        let rate = source.read();
        let applied_rate = rebase_rate(rate)?;
        let new_factor = self.factor().try_grow(applied_rate)?;

        self.scaling_factor.set(new_factor);
        schedule.record(now);
        self.schedule.set(schedule);

        self.env().emit_event(Rebased {
            rebase_count: schedule.rebase_count,
            rate,
            rebase_rate: applied_rate,
            new_factor: new_factor.to_scaled_val(),
            timestamp: now,
        });
        Ok(new_factor)
    }

    fn move_shares(&mut self, from: Address, to: Address, shares: U256, amount: U256) {
        if is_zero_address(&to) {
            self.env().revert(LedgerError::InvalidAddress);
        }

        let from_shares = self.shares_of(from).try_sub(shares);
        let from_shares = match from_shares {
            Ok(value) => value,
            Err(_) => self.env().revert(LedgerError::InsufficientBalance),
        };
        self.shares.set(&from, from_shares);

        // Read after the debit so a self-transfer nets to zero.
        let to_shares = self.unwrap_or_revert(self.shares_of(to).try_add(shares));
        self.shares.set(&to, to_shares);

        self.env().emit_event(Transfer {
            from: Some(from),
            to: Some(to),
            amount,
            shares,
        });
    }
}

/// Read-only snapshot of the rebase state for schedulers and dashboards
#[odra::odra_type]
pub struct LedgerStats {
    /// Block time of the last successful rebase
    pub last_rebase_time: u64,
    /// Earliest block time of the next rebase
    pub next_rebase_time: u64,
    /// Number of successful rebases
    pub rebase_count: u64,
    /// Oracle rate, basis points
    pub current_rate: u64,
    /// Rate the next rebase would apply, basis points
    pub rebase_rate: u64,
    /// True if the interval has elapsed
    pub is_rebase_ready: bool,
    /// Raw scaling factor, 18 decimals
    pub scaling_factor: U256,
    /// True if the oracle is unpaused and fresh
    pub oracle_healthy: bool,
}

/// Audit record of a successful rebase
#[odra::event]
pub struct Rebased {
    /// Count including this rebase
    pub rebase_count: u64,
    /// Oracle rate read for this rebase
    pub rate: u64,
    /// Rate applied to the factor
    pub rebase_rate: u64,
    /// Scaling factor after the rebase
    pub new_factor: U256,
    /// Block time of the rebase
    pub timestamp: u64,
}

/// Balance movement. `from` is `None` for the initial issuance.
#[odra::event]
pub struct Transfer {
    /// Sender, `None` on issuance
    pub from: Option<Address>,
    /// Recipient
    pub to: Option<Address>,
    /// Balance value of the shares moved
    pub amount: U256,
    /// Shares moved
    pub shares: U256,
}

/// Allowance set by `owner` for `spender`
#[odra::event]
pub struct Approval {
    /// Account whose balance may be spent
    pub owner: Address,
    /// Account allowed to spend
    pub spender: Address,
    /// New allowance
    pub amount: U256,
}

/// Rate source swapped
#[odra::event]
pub struct OracleUpdated {
    /// Source before the swap
    pub previous_oracle: Address,
    /// Source after the swap
    pub new_oracle: Address,
}

/// Transfers stopped
#[odra::event]
pub struct LedgerPaused {
    /// Owner that paused
    pub by: Address,
}

/// Transfers resumed
#[odra::event]
pub struct LedgerUnpaused {
    /// Owner that unpaused
    pub by: Address,
}

/// Ledger ownership moved
#[odra::event]
pub struct OwnershipTransferred {
    /// Owner before the transfer
    pub previous_owner: Address,
    /// Owner after the transfer
    pub new_owner: Address,
}
