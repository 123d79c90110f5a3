//! Conversion between quarks and display units.

use crate::error::{Denomination, QuarkError, WalletError};
use crate::timelock::Timelock;

pub const DECIMALS: u32 = 5;
pub const QUARKS_PER_UNIT: u64 = 10u64.pow(DECIMALS);

/// Largest integer an f64 represents exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn is_safe_integer(amount: f64) -> bool {
    amount.is_finite() && amount.fract() == 0.0 && amount.abs() <= MAX_SAFE_INTEGER
}

fn check_amount(amount: f64, denomination: Denomination) -> Result<(), QuarkError> {
    if amount.is_nan() {
        return Err(QuarkError::NotANumber(denomination));
    }
    if !amount.is_finite() {
        return Err(QuarkError::NotFinite(denomination));
    }
    if !is_safe_integer(amount) {
        return Err(QuarkError::NotSafeInteger(denomination));
    }
    if amount < 0.0 {
        return Err(QuarkError::Negative(denomination));
    }
    if amount.fract() != 0.0 {
        return Err(QuarkError::NotWholeNumber(denomination));
    }
    Ok(())
}

/// Convert a quark amount to display units.
pub fn from_quarks(quarks: f64) -> Result<f64, QuarkError> {
    if quarks == 0.0 {
        return Ok(0.0);
    }
    check_amount(quarks, Denomination::Quark)?;

    Ok(quarks / QUARKS_PER_UNIT as f64)
}

/// Convert whole display units to quarks.
pub fn to_quarks(units: f64) -> Result<u64, QuarkError> {
    if units == 0.0 {
        return Ok(0);
    }
    check_amount(units, Denomination::Unit)?;

    let limit = MAX_SAFE_INTEGER / QUARKS_PER_UNIT as f64;
    if units > limit {
        return Err(QuarkError::TooLarge(Denomination::Unit));
    }
    if units < -limit {
        return Err(QuarkError::TooSmall(Denomination::Unit));
    }

    Ok(units as u64 * QUARKS_PER_UNIT)
}

/// Sum of the last fetched balances, in display units.
pub fn estimated_total_balance<'a, I>(accounts: I) -> Result<f64, WalletError>
where
    I: IntoIterator<Item = &'a Timelock>,
{
    let mut total: u128 = 0;
    for account in accounts {
        total += account.cached_balance()? as u128;
    }
    Ok(from_quarks(total as f64)?)
}
