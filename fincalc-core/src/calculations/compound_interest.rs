//! Growth of a lump sum plus monthly contributions.
//!
//! Interest is credited monthly on the opening balance, then the month's
//! contribution is added. Each year-end balance is also reported in today's
//! money by deflating it at the inflation rate.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{CalculatorError, CompoundInterestInputs, CompoundInterestResult, CompoundYear};

const MONTHS_PER_YEAR: u32 = 12;

/// Projects the balance year by year, starting with the opening deposit as
/// year 0.
///
/// # Errors
///
/// [`CalculatorError::Overflow`] when the balance or the inflation deflator
/// leaves `Decimal`'s range.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::{CompoundInterestInputs, compute_compound_interest};
///
/// let result = compute_compound_interest(&CompoundInterestInputs {
///     initial_principal: dec!(100000),
///     monthly_contribution: dec!(0),
///     annual_rate: dec!(12),
///     years: 1,
///     inflation_rate: dec!(0),
/// })
/// .unwrap();
///
/// // 1% a month for twelve months
/// assert_eq!(result.final_balance.round_dp(2), dec!(112682.50));
/// assert_eq!(result.yearly.len(), 2);
/// ```
pub fn compute_compound_interest(
    inputs: &CompoundInterestInputs,
) -> Result<CompoundInterestResult, CalculatorError> {
    let monthly_rate = inputs.annual_rate / Decimal::ONE_HUNDRED / Decimal::from(MONTHS_PER_YEAR);
    let inflation_factor = Decimal::ONE + inputs.inflation_rate / Decimal::ONE_HUNDRED;
    let contribution = inputs.monthly_contribution;

    let mut balance = inputs.initial_principal;
    let mut total_principal = inputs.initial_principal;
    let mut total_interest = Decimal::ZERO;
    let mut deflator = Decimal::ONE;

    let mut yearly = Vec::with_capacity(inputs.years as usize + 1);
    yearly.push(CompoundYear {
        year: 0,
        balance,
        total_principal,
        total_interest,
        annual_interest: Decimal::ZERO,
        real_value: balance,
    });

    for year in 1..=inputs.years {
        let mut annual_interest = Decimal::ZERO;
        for _ in 0..MONTHS_PER_YEAR {
            let interest = balance
                .checked_mul(monthly_rate)
                .ok_or(CalculatorError::Overflow)?;
            balance = balance
                .checked_add(interest)
                .and_then(|b| b.checked_add(contribution))
                .ok_or(CalculatorError::Overflow)?;
            annual_interest += interest;
            total_interest += interest;
            total_principal += contribution;
        }

        deflator = deflator
            .checked_mul(inflation_factor)
            .ok_or(CalculatorError::Overflow)?;
        let real_value = balance
            .checked_div(deflator)
            .ok_or(CalculatorError::Overflow)?;

        yearly.push(CompoundYear {
            year,
            balance,
            total_principal,
            total_interest,
            annual_interest,
            real_value,
        });
    }

    let real_value = yearly.last().map_or(balance, |y| y.real_value);
    debug!(final_balance = %balance, %total_interest, %real_value, "computed compound growth");

    Ok(CompoundInterestResult {
        final_balance: balance,
        total_principal,
        total_interest,
        real_value,
        yearly,
    })
}
