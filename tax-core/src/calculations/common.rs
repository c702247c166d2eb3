//! Common utility functions for bracket calculations.
//!
//! This module provides shared arithmetic used by the allocator, the axis
//! scaler and the bar layout, including rounding and percentage scaling.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to `dp` decimal places using half-up rounding.
///
/// Values exactly at the midpoint are rounded away from zero, matching
/// standard financial rounding conventions.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454), 2), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455), 2), dec!(123.46));
/// assert_eq!(round_half_up(dec!(1234.5), 0), dec!(1235));
/// assert_eq!(round_half_up(dec!(-123.455), 2), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the smaller of a value and an optional upper bound.
///
/// `None` is treated as an unbounded limit, so the value is returned as-is.
pub fn min_bounded(
    value: Decimal,
    bound: Option<Decimal>,
) -> Decimal {
    match bound {
        Some(bound) if bound < value => bound,
        _ => value,
    }
}

/// Expresses `part` as a percentage of `whole`.
///
/// Returns `None` when `whole` is zero or the division overflows.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(30000), dec!(90000)).map(|p| p.round_dp(2)), Some(dec!(33.33)));
/// assert_eq!(percent_of(dec!(10), dec!(0)), None);
/// ```
pub fn percent_of(
    part: Decimal,
    whole: Decimal,
) -> Option<Decimal> {
    part.checked_div(whole)?.checked_mul(Decimal::ONE_HUNDRED)
}
