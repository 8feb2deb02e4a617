//! Shared scalers and the floor `mul_div` used by every share/balance
//! conversion.
//!
//! All arithmetic is integer fixed point. Products are formed in a 512-bit
//! intermediate before dividing, so `a * b / c` never loses precision to an
//! intermediate overflow for any pair of 256-bit operands.

use crate::error::LedgerError;
use odra::casper_types::{U256, U512};

/// Scale of precision of the scaling factor
pub const SCALE: usize = 18;
/// Identity, the initial scaling factor
pub const WAD: u64 = 1_000_000_000_000_000_000;
/// Fixed-point scale of oracle rates (basis points)
pub const RATE_SCALE: u64 = 10_000;
/// Numerator of the oracle-rate to rebase-rate multiplier
pub const RATE_MULTIPLIER: u64 = 120;
/// Denominator of the oracle-rate to rebase-rate multiplier
pub const MULTIPLIER_DENOMINATOR: u64 = 100;

/// Try to subtract, return an error on underflow
pub trait TrySub: Sized {
    /// Subtract
    fn try_sub(self, rhs: Self) -> Result<Self, LedgerError>;
}

/// Try to add, return an error on overflow
pub trait TryAdd: Sized {
    /// Add
    fn try_add(self, rhs: Self) -> Result<Self, LedgerError>;
}

impl TryAdd for U256 {
    fn try_add(self, rhs: Self) -> Result<Self, LedgerError> {
        self.checked_add(rhs).ok_or(LedgerError::MathOverflow)
    }
}

impl TrySub for U256 {
    fn try_sub(self, rhs: Self) -> Result<Self, LedgerError> {
        self.checked_sub(rhs).ok_or(LedgerError::MathOverflow)
    }
}

/// Widen a 256-bit value into the 512-bit intermediate.
pub fn widen(value: U256) -> U512 {
    let mut bytes = [0u8; 32];
    value.to_little_endian(&mut bytes);
    U512::from_little_endian(&bytes)
}

/// Narrow a 512-bit intermediate back into 256 bits, failing if the upper
/// half is not zero.
pub fn narrow(value: U512) -> Result<U256, LedgerError> {
    let mut bytes = [0u8; 64];
    value.to_little_endian(&mut bytes);
    if bytes[32..].iter().any(|b| *b != 0) {
        return Err(LedgerError::MathOverflow);
    }
    Ok(U256::from_little_endian(&bytes[..32]))
}

/// `a * b / denominator`, rounded toward zero.
pub fn mul_div_floor(a: U256, b: U256, denominator: U256) -> Result<U256, LedgerError> {
    if denominator.is_zero() {
        return Err(LedgerError::MathOverflow);
    }
    // 256 x 256 bits always fits in 512 bits.
    let product = widen(a) * widen(b);
    narrow(product / widen(denominator))
}

/// Rebase rate derived from an oracle rate, in the oracle's scale.
///
/// `rate * RATE_MULTIPLIER / MULTIPLIER_DENOMINATOR`, truncated.
pub fn rebase_rate(rate: u64) -> Result<u64, LedgerError> {
    rate.checked_mul(RATE_MULTIPLIER)
        .map(|scaled| scaled / MULTIPLIER_DENOMINATOR)
        .ok_or(LedgerError::MathOverflow)
}
