//! Rate oracle contract and its audit events.

use odra::prelude::*;

use crate::access::{is_zero_address, AuthorizationSet};
use crate::error::OracleError;
use crate::state::{LastUpdate, MAX_RATE, MIN_RATE, STALE_THRESHOLD};

/// Bounded, staleness-aware rate feed.
///
/// Holds one rate in basis points. Writes are restricted to the owner and an
/// explicit set of authorized updaters; every accepted write is recorded as a
/// [`RateUpdated`] event.
#[odra::module(
    events = [RateUpdated, AuthorizationChanged, OraclePaused, OracleUnpaused, OwnershipTransferred],
    errors = OracleError
)]
pub struct RateOracle {
    rate: Var<u64>,
    last_update: Var<LastUpdate>,
    owner: Var<Address>,
    paused: Var<bool>,
    authorized: SubModule<AuthorizationSet>,
}

#[odra::module]
impl RateOracle {
    /// Initialize the oracle with its owner and first rate
    pub fn init(&mut self, owner: Address, initial_rate: u64) {
        if is_zero_address(&owner) {
            self.env().revert(OracleError::InvalidIdentity);
        }
        if !Self::in_range(initial_rate) {
            self.env().revert(OracleError::OutOfRange);
        }

        self.owner.set(owner);
        self.rate.set(initial_rate);
        self.last_update.set(LastUpdate::new(self.env().get_block_time()));
        self.paused.set(false);
    }

    // ===========================================================================
    // READS
    // ===========================================================================

    /// Current rate
    pub fn read(&self) -> u64 {
        self.rate.get_or_default()
    }

    /// Current rate together with its update time and freshness
    pub fn read_with_metadata(&self) -> RateSnapshot {
        let last = self.last_update.get_or_default();
        RateSnapshot {
            rate: self.read(),
            last_update: last.timestamp,
            is_fresh: !last.is_stale(self.env().get_block_time(), STALE_THRESHOLD),
        }
    }

    /// True iff the oracle is not paused and the rate is fresh
    pub fn is_healthy(&self) -> bool {
        !self.is_paused() && self.is_fresh()
    }

    /// Time left before the rate turns stale, zero if it already is
    pub fn time_until_stale(&self) -> u64 {
        self.last_update
            .get_or_default()
            .time_until_stale(self.env().get_block_time(), STALE_THRESHOLD)
    }

    /// Block time of the last accepted write
    pub fn last_update(&self) -> u64 {
        self.last_update.get_or_default().timestamp
    }

    /// Current owner
    pub fn owner(&self) -> Address {
        self.owner_or_revert()
    }

    /// True while the oracle reports unhealthy
    pub fn is_paused(&self) -> bool {
        self.paused.get_or_default()
    }

    /// Check if `identity` may call `write`. The owner always may.
    pub fn is_authorized(&self, identity: Address) -> bool {
        identity == self.owner_or_revert() || self.authorized.contains(identity)
    }

    /// Lowest accepted rate
    pub fn min_rate(&self) -> u64 {
        MIN_RATE
    }

    /// Highest accepted rate
    pub fn max_rate(&self) -> u64 {
        MAX_RATE
    }

    /// Age after which the rate is stale
    pub fn stale_threshold(&self) -> u64 {
        STALE_THRESHOLD
    }

    // ===========================================================================
    // WRITES
    // ===========================================================================

    /// Publish a new rate. Owner or authorized updaters only.
    pub fn write(&mut self, new_rate: u64) {
        let caller = self.env().caller();
        if !self.is_authorized(caller) {
            self.env().revert(OracleError::Unauthorized);
        }
        self.apply_rate(caller, new_rate, false);
    }

    /// Publish a new rate over a stale feed. Owner only.
    ///
    /// Refused with `NotStale` while the current rate is still fresh.
    pub fn emergency_write(&mut self, new_rate: u64) {
        let caller = self.assert_owner();
        if self.is_fresh() {
            self.env().revert(OracleError::NotStale);
        }
        self.apply_rate(caller, new_rate, true);
    }

    /// Grant or revoke write access for `identity`
    pub fn set_authorization(&mut self, identity: Address, enabled: bool) {
        let caller = self.assert_owner();
        if is_zero_address(&identity) {
            self.env().revert(OracleError::InvalidIdentity);
        }

        if enabled {
            self.authorized.add(identity);
        } else {
            self.authorized.remove(identity);
        }

        self.env().emit_event(AuthorizationChanged {
            identity,
            enabled,
            changed_by: caller,
        });
    }

    /// Mark the oracle unhealthy. Writes are still accepted.
    pub fn pause(&mut self) {
        let caller = self.assert_owner();
        self.paused.set(true);
        self.env().emit_event(OraclePaused { by: caller });
    }

    pub fn unpause(&mut self) {
        let caller = self.assert_owner();
        self.paused.set(false);
        self.env().emit_event(OracleUnpaused { by: caller });
    }

    /// Hand the oracle over to `new_owner`
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        let previous_owner = self.assert_owner();
        if is_zero_address(&new_owner) {
            self.env().revert(OracleError::InvalidIdentity);
        }

        self.owner.set(new_owner);
        self.env().emit_event(OwnershipTransferred {
            previous_owner,
            new_owner,
        });
    }
}

impl RateOracle {
    fn in_range(rate: u64) -> bool {
        (MIN_RATE..=MAX_RATE).contains(&rate)
    }

    fn is_fresh(&self) -> bool {
        !self
            .last_update
            .get_or_default()
            .is_stale(self.env().get_block_time(), STALE_THRESHOLD)
    }

    fn owner_or_revert(&self) -> Address {
        self.owner.get_or_revert_with(OracleError::InvalidIdentity)
    }

    /// Revert unless the caller is the owner, return the caller otherwise
    fn assert_owner(&self) -> Address {
        let caller = self.env().caller();
        if caller != self.owner_or_revert() {
            self.env().revert(OracleError::Unauthorized);
        }
        caller
    }

    fn apply_rate(&mut self, caller: Address, new_rate: u64, emergency: bool) {
        if !Self::in_range(new_rate) {
            self.env().revert(OracleError::OutOfRange);
        }

        let now = self.env().get_block_time();
        let previous_rate = self.read();
        let mut last = self.last_update.get_or_default();
        last.touch(now);

        self.rate.set(new_rate);
        self.last_update.set(last);

        self.env().emit_event(RateUpdated {
            previous_rate,
            new_rate,
            caller,
            timestamp: last.timestamp,
            emergency,
        });
    }
}

/// Rate with its freshness metadata
#[odra::odra_type]
pub struct RateSnapshot {
    /// Rate in basis points
    pub rate: u64,
    /// Block time of the last accepted write
    pub last_update: u64,
    /// False once the rate is older than the stale threshold
    pub is_fresh: bool,
}

/// Audit record of an accepted rate write
#[odra::event]
pub struct RateUpdated {
    /// Rate before the write
    pub previous_rate: u64,
    /// Rate after the write
    pub new_rate: u64,
    /// Writer
    pub caller: Address,
    /// Block time of the write
    pub timestamp: u64,
    /// Set for `emergency_write`
    pub emergency: bool,
}

/// Updater granted or revoked
#[odra::event]
pub struct AuthorizationChanged {
    /// Affected updater
    pub identity: Address,
    /// New state
    pub enabled: bool,
    /// Owner that made the change
    pub changed_by: Address,
}

/// Oracle paused
#[odra::event]
pub struct OraclePaused {
    /// Owner that paused
    pub by: Address,
}

/// Oracle unpaused
#[odra::event]
pub struct OracleUnpaused {
    /// Owner that unpaused
    pub by: Address,
}

/// Oracle ownership moved
#[odra::event]
pub struct OwnershipTransferred {
    /// Owner before the transfer
    pub previous_owner: Address,
    /// Owner after the transfer
    pub new_owner: Address,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::zero_address;
    use odra::host::{Deployer, HostEnv};

    const DAY: u64 = 24 * crate::state::HOUR;

    fn setup(initial_rate: u64) -> (HostEnv, RateOracleHostRef) {
        let env = odra_test::env();
        let owner = env.get_account(0);
        env.set_caller(owner);
        let oracle = RateOracle::deploy(
            &env,
            RateOracleInitArgs {
                owner,
                initial_rate,
            },
        );
        (env, oracle)
    }

    #[test]
    fn init_sets_rate_and_owner() {
        let (env, oracle) = setup(1000);
        assert_eq!(oracle.read(), 1000);
        assert_eq!(oracle.owner(), env.get_account(0));
        assert!(oracle.is_healthy());
        assert!(!oracle.is_paused());
        assert_eq!(oracle.time_until_stale(), STALE_THRESHOLD);
    }

    #[test]
    fn init_rejects_out_of_range_rate() {
        let env = odra_test::env();
        let result = RateOracle::try_deploy(
            &env,
            RateOracleInitArgs {
                owner: env.get_account(0),
                initial_rate: MAX_RATE + 1,
            },
        );
        assert_eq!(result.err(), Some(OracleError::OutOfRange.into()));
    }

    #[test]
    fn init_rejects_zero_owner() {
        let env = odra_test::env();
        let result = RateOracle::try_deploy(
            &env,
            RateOracleInitArgs {
                owner: zero_address(),
                initial_rate: 1000,
            },
        );
        assert_eq!(result.err(), Some(OracleError::InvalidIdentity.into()));
    }

    #[test]
    fn owner_can_write_and_event_is_recorded() {
        let (env, mut oracle) = setup(1000);
        env.advance_block_time(1_000);
        oracle.write(1500);

        let snapshot = oracle.read_with_metadata();
        assert_eq!(snapshot.rate, 1500);
        assert!(snapshot.is_fresh);
        assert!(env.emitted_event(
            &oracle,
            RateUpdated {
                previous_rate: 1000,
                new_rate: 1500,
                caller: env.get_account(0),
                timestamp: snapshot.last_update,
                emergency: false,
            }
        ));
    }

    #[test]
    fn out_of_range_write_leaves_state_unchanged() {
        let (env, mut oracle) = setup(1000);
        let before = oracle.read_with_metadata();
        env.advance_block_time(1_000);

        assert_eq!(oracle.try_write(6000), Err(OracleError::OutOfRange.into()));
        assert_eq!(oracle.try_write(MAX_RATE + 1), Err(OracleError::OutOfRange.into()));
        assert_eq!(oracle.read(), 1000);
        assert_eq!(oracle.last_update(), before.last_update);

        // Both bounds are inclusive.
        oracle.write(MAX_RATE);
        assert_eq!(oracle.read(), MAX_RATE);
        oracle.write(MIN_RATE);
        assert_eq!(oracle.read(), MIN_RATE);
    }

    #[test]
    fn unauthorized_writes_are_rejected() {
        let (env, mut oracle) = setup(1000);
        let stranger = env.get_account(2);
        let before = oracle.last_update();

        env.set_caller(stranger);
        env.advance_block_time(1_000);
        for rate in [0, 1000, 2500, MAX_RATE] {
            assert_eq!(oracle.try_write(rate), Err(OracleError::Unauthorized.into()));
        }
        assert_eq!(oracle.read(), 1000);
        assert_eq!(oracle.last_update(), before);
    }

    #[test]
    fn authorized_updater_can_write_until_revoked() {
        let (env, mut oracle) = setup(1000);
        let updater = env.get_account(1);

        oracle.set_authorization(updater, true);
        oracle.set_authorization(updater, true);
        assert!(oracle.is_authorized(updater));

        env.set_caller(updater);
        oracle.write(1100);
        assert_eq!(oracle.read(), 1100);

        // Updaters cannot manage the set themselves.
        assert_eq!(
            oracle.try_set_authorization(env.get_account(3), true),
            Err(OracleError::Unauthorized.into())
        );

        env.set_caller(env.get_account(0));
        oracle.set_authorization(updater, false);
        assert!(!oracle.is_authorized(updater));

        env.set_caller(updater);
        assert_eq!(oracle.try_write(1200), Err(OracleError::Unauthorized.into()));
        assert_eq!(oracle.read(), 1100);
    }

    #[test]
    fn set_authorization_rejects_zero_identity() {
        let (_env, mut oracle) = setup(1000);
        assert_eq!(
            oracle.try_set_authorization(zero_address(), true),
            Err(OracleError::InvalidIdentity.into())
        );
    }

    #[test]
    fn rate_goes_stale_after_threshold() {
        let (env, oracle) = setup(1000);

        env.advance_block_time(STALE_THRESHOLD);
        assert!(oracle.read_with_metadata().is_fresh);
        assert_eq!(oracle.time_until_stale(), 0);

        env.advance_block_time(1);
        let snapshot = oracle.read_with_metadata();
        assert!(!snapshot.is_fresh);
        assert_eq!(snapshot.rate, 1000);
        assert!(!oracle.is_healthy());
    }

    #[test]
    fn emergency_write_requires_staleness() {
        let (env, mut oracle) = setup(1000);
        assert_eq!(oracle.try_emergency_write(1200), Err(OracleError::NotStale.into()));

        env.advance_block_time(STALE_THRESHOLD + 1);
        oracle.emergency_write(1200);
        assert_eq!(oracle.read(), 1200);
        assert!(oracle.is_healthy());
        assert!(env.emitted_event(
            &oracle,
            RateUpdated {
                previous_rate: 1000,
                new_rate: 1200,
                caller: env.get_account(0),
                timestamp: oracle.last_update(),
                emergency: true,
            }
        ));

        // Fresh again, so the emergency path closes.
        assert_eq!(oracle.try_emergency_write(1300), Err(OracleError::NotStale.into()));
    }

    #[test]
    fn emergency_write_is_owner_only_and_range_checked() {
        let (env, mut oracle) = setup(1000);
        let updater = env.get_account(1);
        oracle.set_authorization(updater, true);
        env.advance_block_time(3 * DAY);

        env.set_caller(updater);
        assert_eq!(oracle.try_emergency_write(1200), Err(OracleError::Unauthorized.into()));

        env.set_caller(env.get_account(0));
        assert_eq!(oracle.try_emergency_write(6000), Err(OracleError::OutOfRange.into()));
        assert!(!oracle.is_healthy());
    }

    #[test]
    fn pause_affects_health_but_not_writes() {
        let (env, mut oracle) = setup(1000);
        oracle.pause();
        assert!(oracle.is_paused());
        assert!(!oracle.is_healthy());
        assert!(oracle.read_with_metadata().is_fresh);

        oracle.write(1400);
        assert_eq!(oracle.read(), 1400);
        assert!(!oracle.is_healthy());

        env.advance_block_time(STALE_THRESHOLD + 1);
        oracle.emergency_write(900);
        assert_eq!(oracle.read(), 900);
        assert!(oracle.read_with_metadata().is_fresh);
        assert!(!oracle.is_healthy());

        env.set_caller(env.get_account(1));
        assert_eq!(oracle.try_unpause(), Err(OracleError::Unauthorized.into()));

        env.set_caller(env.get_account(0));
        oracle.unpause();
        assert!(oracle.is_healthy());
        assert!(env.emitted(&oracle, "OraclePaused"));
        assert!(env.emitted(&oracle, "OracleUnpaused"));
    }

    #[test]
    fn ownership_moves_owner_rights() {
        let (env, mut oracle) = setup(1000);
        let new_owner = env.get_account(1);

        assert_eq!(
            oracle.try_transfer_ownership(zero_address()),
            Err(OracleError::InvalidIdentity.into())
        );
        oracle.transfer_ownership(new_owner);
        assert_eq!(oracle.owner(), new_owner);
        assert_eq!(oracle.try_pause(), Err(OracleError::Unauthorized.into()));

        env.set_caller(new_owner);
        oracle.pause();
        assert!(oracle.is_paused());
    }
}
