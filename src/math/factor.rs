//! The global share-to-balance scaling factor.

use {
    crate::{error::LedgerError, math::common::*},
    alloc::string::ToString,
    core::fmt,
    odra::casper_types::U256,
};

/// Share-to-balance multiplier, precise to 18 digits.
///
/// `balance = shares * factor / WAD`. Starts at `WAD` and only grows.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord)]
pub struct ScalingFactor(pub U256);

impl odra::casper_types::bytesrepr::ToBytes for ScalingFactor {
    fn to_bytes(&self) -> Result<alloc::vec::Vec<u8>, odra::casper_types::bytesrepr::Error> {
        self.0.to_bytes()
    }

    fn serialized_length(&self) -> usize {
        self.0.serialized_length()
    }
}

impl odra::casper_types::bytesrepr::FromBytes for ScalingFactor {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), odra::casper_types::bytesrepr::Error> {
        let (value, remainder) = U256::from_bytes(bytes)?;
        Ok((ScalingFactor(value), remainder))
    }
}

impl odra::casper_types::CLTyped for ScalingFactor {
    fn cl_type() -> odra::casper_types::CLType {
        odra::casper_types::CLType::U256
    }
}

impl Default for ScalingFactor {
    fn default() -> Self {
        Self::one()
    }
}

impl ScalingFactor {
    /// The initial factor, one share is worth one unit.
    pub fn one() -> Self {
        Self(Self::wad())
    }

    fn wad() -> U256 {
        U256::from(WAD)
    }

    /// Raw 18-decimal value.
    pub fn to_scaled_val(&self) -> U256 {
        self.0
    }

    /// Compound the factor by one rebase.
    ///
    /// `factor + factor * rebase_rate / RATE_SCALE`, rounded down so a rebase
    /// never creates more value than the rate allows.
    pub fn try_grow(self, rebase_rate: u64) -> Result<Self, LedgerError> {
        let growth = mul_div_floor(self.0, U256::from(rebase_rate), U256::from(RATE_SCALE))?;
        Ok(Self(self.0.try_add(growth)?))
    }

    /// Balance represented by `shares`, rounded down.
    pub fn tokens_for_shares(&self, shares: U256) -> Result<U256, LedgerError> {
        mul_div_floor(shares, self.0, Self::wad())
    }

    /// Shares needed to represent `amount`, rounded down.
    ///
    /// Rounding down means `shares_for_tokens(tokens_for_shares(s))` is `s`
    /// or `s - 1`, never more than `s`.
    pub fn shares_for_tokens(&self, amount: U256) -> Result<U256, LedgerError> {
        mul_div_floor(amount, Self::wad(), self.0)
    }
}

impl fmt::Display for ScalingFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut scaled_val = self.0.to_string();
        if scaled_val.len() <= SCALE {
            scaled_val.insert_str(0, &"0".repeat(SCALE - scaled_val.len()));
            scaled_val.insert_str(0, "0.");
        } else {
            scaled_val.insert(scaled_val.len() - SCALE, '.');
        }
        f.write_str(&scaled_val)
    }
}
