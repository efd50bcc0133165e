//! Common helpers shared by the calculators: currency rounding, clamping and
//! safe rate division.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::warn;

/// Largest amount any calculator accepts as input. Larger values are clamped
/// so that products with rates and factors stay inside `Decimal` range.
pub const MAX_INPUT_AMOUNT: Decimal = dec!(1000000000000000);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use canadian_tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the minimum of two decimal values.
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}

/// `amount / base`, or zero when `base` is not positive.
///
/// ```
/// use rust_decimal_macros::dec;
/// use canadian_tax_core::calculations::common::rate_of;
///
/// assert_eq!(rate_of(dec!(25), dec!(100)), dec!(0.25));
/// assert_eq!(rate_of(dec!(25), dec!(0)), dec!(0));
/// ```
pub fn rate_of(
    amount: Decimal,
    base: Decimal,
) -> Decimal {
    if base <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        amount / base
    }
}

/// Clamps an input amount into `0..=MAX_INPUT_AMOUNT`, logging the
/// adjustment.
pub fn clamp_input(
    field: &'static str,
    value: Decimal,
) -> Decimal {
    if value < Decimal::ZERO {
        warn!(field, value = %value, "negative input clamped to zero");
        Decimal::ZERO
    } else if value > MAX_INPUT_AMOUNT {
        warn!(field, value = %value, max = %MAX_INPUT_AMOUNT, "input clamped to maximum");
        MAX_INPUT_AMOUNT
    } else {
        value
    }
}
