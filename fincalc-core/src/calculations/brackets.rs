//! Progressive bracket (slab) arithmetic.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::{BracketSchedule, compute_bracket_tax, marginal_rate};
//!
//! let schedule = BracketSchedule::new_regime();
//! let result = compute_bracket_tax(dec!(1205000), &schedule);
//!
//! // 4L at 0% + 4L at 5% + 4L at 10% + 5,000 at 15%
//! assert_eq!(result.tax, dec!(60750));
//! assert_eq!(result.breakdown.len(), 7);
//! assert_eq!(marginal_rate(dec!(1205000), &schedule), dec!(0.15));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{BracketSchedule, SlabDetail};

/// Slab tax plus the per-slab attribution of income and tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTax {
    pub tax: Decimal,
    /// One entry per bracket, in schedule order, including untouched ones.
    pub breakdown: Vec<SlabDetail>,
}

/// Walks the schedule from the bottom, taxing each slice of income at its
/// bracket's rate.
///
/// A bracket's upper bound is inclusive, so the amount taxed in a bracket is
/// the income between the previous bound and its own. Brackets above the
/// taxable income are still reported with zero amount and zero tax.
pub fn compute_bracket_tax(
    taxable_income: Decimal,
    schedule: &BracketSchedule,
) -> BracketTax {
    let mut tax = Decimal::ZERO;
    let mut remaining = taxable_income;
    let mut previous_bound = Decimal::ZERO;
    let mut breakdown = Vec::with_capacity(schedule.brackets().len());

    for bracket in schedule.brackets() {
        let amount = if remaining <= Decimal::ZERO {
            Decimal::ZERO
        } else {
            match bracket.upper_bound {
                Some(bound) => remaining.min(bound - previous_bound),
                None => remaining,
            }
        };
        let slab_tax = amount * bracket.rate;

        tax += slab_tax;
        remaining -= amount;
        if let Some(bound) = bracket.upper_bound {
            previous_bound = bound;
        }

        breakdown.push(SlabDetail {
            label: bracket.label.clone(),
            rate: bracket.rate,
            taxable_amount: amount,
            tax: slab_tax,
        });
    }

    BracketTax { tax, breakdown }
}

/// Rate applied to the next rupee of income.
///
/// Returns the rate of the first bracket whose upper bound is at or above
/// `taxable_income`, or the open top bracket's rate beyond every bound.
pub fn marginal_rate(
    taxable_income: Decimal,
    schedule: &BracketSchedule,
) -> Decimal {
    schedule
        .brackets()
        .iter()
        .find(|b| b.upper_bound.is_none_or(|bound| bound >= taxable_income))
        .unwrap_or_else(|| schedule.top_bracket())
        .rate
}
