// storefront/src/services/money.rs

use crate::errors::{AppError, Result as AppResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
  unit_price * Decimal::from(quantity)
}

/// Converts `amount` to an integer count of minor units (cents for usd).
///
/// Fails instead of rounding when `amount` has more fractional digits than the
/// currency allows, and when the result is negative or does not fit in `i64`.
pub fn to_minor_units(amount: Decimal, exponent: u32) -> AppResult<i64> {
  let factor = 10i64
    .checked_pow(exponent)
    .map(Decimal::from)
    .ok_or_else(|| AppError::Internal(format!("unsupported currency exponent {}", exponent)))?;
  let scaled = amount
    .checked_mul(factor)
    .ok_or_else(|| AppError::Internal(format!("amount {} overflows minor units", amount)))?;
  if !scaled.fract().is_zero() {
    return Err(AppError::Internal(format!(
      "amount {} has more than {} decimal places",
      amount, exponent
    )));
  }
  if scaled.is_sign_negative() && !scaled.is_zero() {
    return Err(AppError::Internal(format!("amount {} is negative", amount)));
  }
  scaled
    .to_i64()
    .ok_or_else(|| AppError::Internal(format!("amount {} overflows minor units", amount)))
}
