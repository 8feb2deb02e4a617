//! Access-control building blocks shared by both contracts.

use odra::casper_types::account::AccountHash;
use odra::prelude::*;

/// The null identity: an account address whose hash is all zero bytes.
pub fn zero_address() -> Address {
    Address::Account(AccountHash::new([0u8; 32]))
}

/// Check if `address` is the null identity
pub fn is_zero_address(address: &Address) -> bool {
    *address == zero_address()
}

/// Explicit set of identities allowed to act on a contract.
#[odra::module]
pub struct AuthorizationSet {
    members: Mapping<Address, bool>,
}

#[odra::module]
impl AuthorizationSet {
    /// Add `identity` to the set. Adding twice is a no-op.
    pub fn add(&mut self, identity: Address) {
        self.members.set(&identity, true);
    }

    /// Remove `identity` from the set. Removing a non-member is a no-op.
    pub fn remove(&mut self, identity: Address) {
        self.members.set(&identity, false);
    }

    /// Check if `identity` is a member of the set
    pub fn contains(&self, identity: Address) -> bool {
        self.members.get_or_default(&identity)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use odra::host::{Deployer, NoArgs};

    #[test]
    fn add_and_remove_are_idempotent() {
        let env = odra_test::env();
        let mut set = AuthorizationSet::deploy(&env, NoArgs);
        let member = env.get_account(1);

        assert!(!set.contains(member));
        set.add(member);
        set.add(member);
        assert!(set.contains(member));
        set.remove(member);
        assert!(!set.contains(member));
        set.remove(member);
        assert!(!set.contains(member));
    }

    #[test]
    fn zero_address_is_recognised() {
        let env = odra_test::env();
        assert!(is_zero_address(&zero_address()));
        assert!(!is_zero_address(&env.get_account(0)));
    }
}
