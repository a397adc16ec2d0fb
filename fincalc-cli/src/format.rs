//! Display helpers for rupee amounts, foreign-currency wages, hours and
//! rates.
//!
//! Rupee figures use Indian digit grouping (`15,00,000`); wage figures use
//! Western grouping (`1,500,000`) with a caller-chosen currency symbol.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

const THOUSAND: Decimal = dec!(1000);
const LAKH: Decimal = dec!(100000);
const MILLION: Decimal = dec!(1000000);
const CRORE: Decimal = dec!(10000000);

fn round_dp(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Splits a non-negative rounded value into its integer digits and the
/// fractional part (without the dot), padded to `dp` digits.
fn split_digits(
    value: Decimal,
    dp: u32,
) -> (String, String) {
    let text = format!("{:.*}", dp as usize, round_dp(value.abs(), dp));
    match text.split_once('.') {
        Some((int, frac)) => (int.to_string(), frac.to_string()),
        None => (text, String::new()),
    }
}

/// Inserts commas every three digits.
fn group_western(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Last three digits as one group, then groups of two (`1,23,45,678`).
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    for (i, ch) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push(',');
    out.push_str(tail);
    out
}

fn sign(value: Decimal) -> &'static str {
    if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    }
}

/// Drops trailing zeros after the decimal point (`1.50` -> `1.5`, `2.00` -> `2`).
fn trim_fraction(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Whole rupees with Indian digit grouping.
///
/// ```
/// use fincalc_cli::format::format_inr;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_inr(dec!(1500000)), "₹15,00,000");
/// assert_eq!(format_inr(dec!(-12500.5)), "-₹12,501");
/// ```
pub fn format_inr(value: Decimal) -> String {
    let rounded = round_dp(value, 0);
    let (int, _) = split_digits(rounded, 0);
    format!("{}₹{}", sign(rounded), group_indian(&int))
}

/// Short rupee figure in crore, lakh or thousand units, up to two decimals.
pub fn format_inr_compact(value: Decimal) -> String {
    let abs = value.abs();
    let body = if abs >= CRORE {
        format!("{}Cr", trim_fraction(round_dp(abs / CRORE, 2)))
    } else if abs >= LAKH {
        format!("{}L", trim_fraction(round_dp(abs / LAKH, 2)))
    } else if abs >= THOUSAND {
        format!("{}K", trim_fraction(round_dp(abs / THOUSAND, 2)))
    } else {
        split_digits(abs, 0).0
    };
    format!("{}₹{body}", sign(value))
}

/// Whole currency units with Western grouping, or `K`/`M` with one decimal
/// when `compact` is set.
///
/// ```
/// use fincalc_cli::format::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(47250), "$", false), "$47,250");
/// assert_eq!(format_currency(dec!(47250), "$", true), "$47.3K");
/// ```
pub fn format_currency(
    value: Decimal,
    symbol: &str,
    compact: bool,
) -> String {
    let abs = value.abs();
    let body = if compact && abs >= MILLION {
        format!("{:.1}M", round_dp(abs / MILLION, 1))
    } else if compact && abs >= THOUSAND {
        format!("{:.1}K", round_dp(abs / THOUSAND, 1))
    } else {
        group_western(&split_digits(abs, 0).0)
    };
    format!("{}{symbol}{body}", sign(value))
}

/// Per-hour amounts keep cents.
pub fn format_hourly(
    value: Decimal,
    symbol: &str,
) -> String {
    let (int, frac) = split_digits(value, 2);
    format!("{}{symbol}{}.{frac}", sign(value), group_western(&int))
}

/// Hours with Western grouping and at most one decimal.
pub fn format_hours(value: Decimal) -> String {
    let (int, frac) = split_digits(value, 1);
    let int = group_western(&int);
    if frac.chars().all(|c| c == '0') {
        format!("{}{int}", sign(round_dp(value, 1)))
    } else {
        format!("{}{int}.{frac}", sign(value))
    }
}

/// A fractional rate (`0.065`) as a percentage with one decimal (`6.5%`).
pub fn format_rate(rate: Decimal) -> String {
    format_percent(rate * dec!(100))
}

/// A value already in percent, one decimal.
pub fn format_percent(percent: Decimal) -> String {
    format!("{:.1}%", round_dp(percent, 1))
}
