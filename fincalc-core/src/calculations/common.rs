//! Common utility functions shared by the calculators.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Largest magnitude accepted for any money or time input (10^15).
///
/// Larger inputs can overflow `Decimal` arithmetic inside the calculators.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Whether `value` lies within `[-MAX_AMOUNT, MAX_AMOUNT]`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::common::within_amount_range;
///
/// assert!(within_amount_range(dec!(250000000)));
/// assert!(!within_amount_range(dec!(50000000000000000000000000000)));
/// ```
pub fn within_amount_range(value: Decimal) -> bool {
    value.abs() <= MAX_AMOUNT
}

/// Rounds a value to the nearest whole rupee, halves away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::common::round_rupee;
///
/// assert_eq!(round_rupee(dec!(14166.49)), dec!(14166));
/// assert_eq!(round_rupee(dec!(14166.50)), dec!(14167));
/// assert_eq!(round_rupee(dec!(-0.5)), dec!(-1));
/// ```
pub fn round_rupee(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Divides, yielding zero when the divisor is zero.
pub fn ratio_or_zero(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}
