//! Conversion of externally published benchmark values into oracle rates.
//!
//! A feed publishes a percentage as decimal text (`"5.33"` for 5.33%). The
//! oracle stores basis points, so digits beyond the second decimal place are
//! truncated. Supplies are whole units in plain decimal text.

use odra::casper_types::U256;

use crate::error::{LedgerError, OracleError};
use crate::math::RATE_SCALE;
use crate::state::{MAX_RATE, MIN_RATE};

/// Basis points per whole percent
const PER_PERCENT: u64 = RATE_SCALE / 100;
/// Decimal places of a percentage kept by the oracle scale
const FRACTION_DIGITS: usize = 2;

/// Parse a percentage such as `"5.33"` into a bounded oracle rate.
pub fn rate_from_percent(text: &str) -> Result<u64, OracleError> {
    let text = text.trim();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(OracleError::InvalidFeedValue);
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(OracleError::InvalidFeedValue);
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| OracleError::OutOfRange)?
    };

    let mut fraction_units = 0u64;
    let mut place = PER_PERCENT;
    for digit in fraction.bytes().take(FRACTION_DIGITS) {
        place /= 10;
        fraction_units += u64::from(digit - b'0') * place;
    }

    let rate = whole
        .checked_mul(PER_PERCENT)
        .and_then(|units| units.checked_add(fraction_units))
        .ok_or(OracleError::OutOfRange)?;

    if !(MIN_RATE..=MAX_RATE).contains(&rate) {
        return Err(OracleError::OutOfRange);
    }
    Ok(rate)
}

/// Parse a positive whole-unit supply such as `"1000000"`.
pub fn supply_from_units(text: &str) -> Result<U256, LedgerError> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LedgerError::InvalidAmount);
    }
    let supply = U256::from_dec_str(text).map_err(|_| LedgerError::MathOverflow)?;
    if supply.is_zero() {
        return Err(LedgerError::InvalidAmount);
    }
    Ok(supply)
}
