//! Reducing-balance loans: the equated monthly installment, the month by
//! month amortization schedule with prepayments, and the all-in monthly cost
//! of a mortgage.
//!
//! # Schedule
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Interest for the month at `annual_rate / 12` on the opening balance |
//! | 2    | Principal repaid = installment - interest, never more than the balance |
//! | 3    | Prepayments due this month, capped at what is still owed |
//! | 4    | `reduce-emi` prepayments recompute the installment over the months left |
//! | 5    | Stop once the balance is settled or the tenure runs out |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::{LoanInputs, compute_loan};
//!
//! let result = compute_loan(&LoanInputs {
//!     principal: dec!(1200000),
//!     annual_rate: dec!(0),
//!     tenure_months: 12,
//!     prepayments: vec![],
//! })
//! .unwrap();
//!
//! assert_eq!(result.summary.emi, dec!(100000));
//! assert_eq!(result.schedule.len(), 12);
//! assert_eq!(result.summary.total_interest, dec!(0));
//! ```

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use tracing::debug;

use crate::calculations::common::ratio_or_zero;
use crate::models::{
    AmortizationRow, CalculatorError, LoanInputs, LoanResult, LoanSummary, MortgageInputs,
    MortgageResult, Prepayment, PrepaymentFrequency, PrepaymentStrategy,
};

const MONTHS_PER_YEAR: Decimal = dec!(12);
/// Balances at or below this are treated as repaid.
const SETTLED_BALANCE: Decimal = dec!(0.01);
/// Down payment share, in percent, from which PMI is no longer charged.
const PMI_FREE_DOWN_PAYMENT: Decimal = dec!(20);

fn monthly_rate(annual_rate: Decimal) -> Decimal {
    annual_rate / MONTHS_PER_YEAR / Decimal::ONE_HUNDRED
}

/// Equated monthly installment for `principal` over `months` at
/// `annual_rate` percent.
///
/// Zero when there is nothing to repay or no months to repay it in; a
/// straight `principal / months` at a zero rate.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::loan::emi;
///
/// assert_eq!(emi(dec!(5000000), dec!(8.5), 240).unwrap().round_dp(2), dec!(43391.16));
/// assert_eq!(emi(dec!(0), dec!(8.5), 240).unwrap(), dec!(0));
/// ```
pub fn emi(
    principal: Decimal,
    annual_rate: Decimal,
    months: u32,
) -> Result<Decimal, CalculatorError> {
    if principal <= Decimal::ZERO || months == 0 {
        return Ok(Decimal::ZERO);
    }

    let rate = monthly_rate(annual_rate);
    let growth = (Decimal::ONE + rate)
        .checked_powi(i64::from(months))
        .ok_or(CalculatorError::Overflow)?;
    if growth == Decimal::ONE {
        return Ok(principal / Decimal::from(months));
    }

    let numerator = principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(growth))
        .ok_or(CalculatorError::Overflow)?;
    numerator
        .checked_div(growth - Decimal::ONE)
        .ok_or(CalculatorError::Overflow)
}

/// Expands a repeating prepayment into one entry per due month, from
/// `start_month` up to and including `tenure_months`.
pub fn recurring_prepayments(
    amount: Decimal,
    start_month: u32,
    frequency: PrepaymentFrequency,
    tenure_months: u32,
    strategy: PrepaymentStrategy,
) -> Vec<Prepayment> {
    let step = frequency.interval_months() as usize;
    (start_month.max(1)..=tenure_months)
        .step_by(step)
        .map(|month| Prepayment {
            month,
            amount,
            strategy,
        })
        .collect()
}

/// Builds the amortization schedule and its summary for one loan.
#[derive(Debug, Clone)]
pub struct LoanCalculator<'a> {
    inputs: &'a LoanInputs,
}

struct Schedule {
    rows: Vec<AmortizationRow>,
    final_emi: Decimal,
}

impl<'a> LoanCalculator<'a> {
    pub fn new(inputs: &'a LoanInputs) -> Self {
        Self { inputs }
    }

    pub fn calculate(&self) -> Result<LoanResult, CalculatorError> {
        if self.inputs.tenure_months == 0 {
            return Err(CalculatorError::ZeroTenure);
        }

        let with_prepayments = self.schedule(&self.inputs.prepayments)?;
        let baseline = if self.inputs.prepayments.is_empty() {
            None
        } else {
            Some(self.schedule(&[])?)
        };

        let summary = self.summary(&with_prepayments, baseline.as_ref());
        debug!(
            emi = %summary.emi,
            total_interest = %summary.total_interest,
            months = summary.actual_tenure_months,
            "computed loan schedule"
        );

        Ok(LoanResult {
            summary,
            schedule: with_prepayments.rows,
        })
    }

    fn schedule(
        &self,
        prepayments: &[Prepayment],
    ) -> Result<Schedule, CalculatorError> {
        let LoanInputs {
            principal,
            annual_rate,
            tenure_months,
            ..
        } = *self.inputs;
        let rate = monthly_rate(annual_rate);

        let mut installment = emi(principal, annual_rate, tenure_months)?;
        let mut balance = principal.max(Decimal::ZERO);
        let mut rows = Vec::new();

        for month in 1..=tenure_months {
            if balance <= SETTLED_BALANCE {
                break;
            }

            let interest = balance * rate;
            let principal_paid = (installment - interest).min(balance).max(Decimal::ZERO);
            balance -= principal_paid;

            let (prepayment, reduce_emi) = Self::prepayment_due(prepayments, month, balance);
            balance -= prepayment;

            let due = installment;
            if reduce_emi && balance > SETTLED_BALANCE && month < tenure_months {
                installment = emi(balance, annual_rate, tenure_months - month)?;
            }
            if balance <= SETTLED_BALANCE {
                balance = Decimal::ZERO;
            }

            rows.push(AmortizationRow {
                month,
                emi: due,
                principal: principal_paid,
                interest,
                prepayment,
                total_payment: principal_paid + interest + prepayment,
                remaining_balance: balance,
            });
        }

        Ok(Schedule {
            rows,
            final_emi: installment,
        })
    }

    /// Sum of the prepayments due in `month`, capped at `balance`, and
    /// whether any of them asks for a lower installment.
    fn prepayment_due(
        prepayments: &[Prepayment],
        month: u32,
        balance: Decimal,
    ) -> (Decimal, bool) {
        let due = prepayments
            .iter()
            .filter(|p| p.month == month && p.amount > Decimal::ZERO);

        let mut amount = Decimal::ZERO;
        let mut reduce_emi = false;
        for prepayment in due {
            amount += prepayment.amount;
            reduce_emi |= prepayment.strategy == PrepaymentStrategy::ReduceEmi;
        }
        (amount.min(balance), reduce_emi)
    }

    fn summary(
        &self,
        schedule: &Schedule,
        baseline: Option<&Schedule>,
    ) -> LoanSummary {
        let total_interest: Decimal = schedule.rows.iter().map(|r| r.interest).sum();
        let total_prepayment: Decimal = schedule.rows.iter().map(|r| r.prepayment).sum();
        let actual_tenure_months = schedule.rows.len() as u32;

        let (interest_saved, months_saved) = match baseline {
            Some(baseline) => {
                let baseline_interest: Decimal = baseline.rows.iter().map(|r| r.interest).sum();
                (
                    baseline_interest - total_interest,
                    (baseline.rows.len() as u32).saturating_sub(actual_tenure_months),
                )
            }
            None => (Decimal::ZERO, 0),
        };

        LoanSummary {
            emi: schedule.rows.first().map_or(Decimal::ZERO, |r| r.emi),
            final_emi: schedule.final_emi,
            total_interest,
            total_prepayment,
            total_amount: self.inputs.principal + total_interest,
            actual_tenure_months,
            interest_saved,
            months_saved,
        }
    }
}

/// Amortizes one loan.
///
/// # Errors
///
/// [`CalculatorError::ZeroTenure`] when `tenure_months` is zero, and
/// [`CalculatorError::Overflow`] when the rate and tenure push the growth
/// factor beyond `Decimal`'s range.
pub fn compute_loan(inputs: &LoanInputs) -> Result<LoanResult, CalculatorError> {
    LoanCalculator::new(inputs).calculate()
}

/// Monthly principal and interest plus property tax, insurance, PMI and HOA.
pub fn compute_mortgage(inputs: &MortgageInputs) -> Result<MortgageResult, CalculatorError> {
    if inputs.term_years == 0 {
        return Err(CalculatorError::ZeroTenure);
    }
    if inputs.down_payment > inputs.home_price {
        return Err(CalculatorError::DownPaymentExceedsPrice);
    }

    let months = inputs
        .term_years
        .checked_mul(12)
        .ok_or(CalculatorError::Overflow)?;
    let loan_amount = inputs.home_price - inputs.down_payment;
    let down_payment_percentage =
        ratio_or_zero(inputs.down_payment, inputs.home_price) * Decimal::ONE_HUNDRED;

    let monthly_principal_and_interest = emi(loan_amount, inputs.interest_rate, months)?;
    let monthly_property_tax =
        inputs.home_price * inputs.property_tax_rate / Decimal::ONE_HUNDRED / MONTHS_PER_YEAR;
    let monthly_pmi = if down_payment_percentage < PMI_FREE_DOWN_PAYMENT {
        loan_amount * inputs.pmi_rate / Decimal::ONE_HUNDRED / MONTHS_PER_YEAR
    } else {
        Decimal::ZERO
    };

    let total_monthly_payment = monthly_principal_and_interest
        + monthly_property_tax
        + inputs.home_insurance_monthly
        + monthly_pmi
        + inputs.hoa_monthly;
    let total_payment = monthly_principal_and_interest * Decimal::from(months);

    Ok(MortgageResult {
        loan_amount,
        down_payment_percentage,
        monthly_principal_and_interest,
        monthly_property_tax,
        monthly_home_insurance: inputs.home_insurance_monthly,
        monthly_pmi,
        monthly_hoa: inputs.hoa_monthly,
        total_monthly_payment,
        total_payment,
        total_interest: total_payment - loan_amount,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn home_loan(prepayments: Vec<Prepayment>) -> LoanInputs {
        LoanInputs {
            prepayments,
            ..LoanInputs::default()
        }
    }

    fn one_time(
        month: u32,
        amount: Decimal,
        strategy: PrepaymentStrategy,
    ) -> Prepayment {
        Prepayment {
            month,
            amount,
            strategy,
        }
    }

    // =========================================================================
    // emi tests
    // =========================================================================

    #[test]
    fn emi_standard_formula() {
        let installment = emi(dec!(5000000), dec!(8.5), 240).unwrap();
        assert_eq!(installment.round_dp(2), dec!(43391.16));
    }

    #[test]
    fn emi_zero_rate_is_straight_line() {
        assert_eq!(emi(dec!(1200000), Decimal::ZERO, 12).unwrap(), dec!(100000));
    }

    #[test]
    fn emi_nothing_to_repay_is_zero() {
        assert_eq!(emi(Decimal::ZERO, dec!(8.5), 240).unwrap(), Decimal::ZERO);
        assert_eq!(emi(dec!(-5), dec!(8.5), 240).unwrap(), Decimal::ZERO);
        assert_eq!(emi(dec!(100000), dec!(8.5), 0).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn emi_overflow_is_reported() {
        assert_eq!(
            emi(dec!(100000), dec!(1200), 1200),
            Err(CalculatorError::Overflow)
        );
    }

    // =========================================================================
    // schedule tests
    // =========================================================================

    #[test]
    fn schedule_without_prepayments_runs_full_tenure() {
        let result = compute_loan(&LoanInputs::default()).unwrap();

        assert_eq!(result.schedule.len(), 240);
        let first = &result.schedule[0];
        assert_eq!(first.interest.round_dp(2), dec!(35416.67));
        assert_eq!(result.schedule[239].remaining_balance, Decimal::ZERO);

        let repaid: Decimal = result.schedule.iter().map(|r| r.principal).sum();
        assert_eq!(repaid.round_dp(2), dec!(5000000));
        assert_eq!(result.summary.total_interest.round_dp(2), dec!(5413878.80));
        assert_eq!(result.summary.total_amount.round_dp(2), dec!(10413878.80));
        assert_eq!(result.summary.interest_saved, Decimal::ZERO);
        assert_eq!(result.summary.emi, result.summary.final_emi);
    }

    #[test]
    fn reduce_tenure_prepayment_ends_loan_early() {
        let inputs = home_loan(vec![one_time(
            12,
            dec!(500000),
            PrepaymentStrategy::ReduceTenure,
        )]);

        let result = compute_loan(&inputs).unwrap();
        let summary = &result.summary;

        assert_eq!(summary.actual_tenure_months, 192);
        assert_eq!(summary.months_saved, 48);
        assert_eq!(summary.interest_saved.round_dp(2), dec!(1603690.73));
        assert_eq!(summary.final_emi, summary.emi);
        assert_eq!(summary.total_prepayment, dec!(500000));
        assert_eq!(result.schedule[11].prepayment, dec!(500000));
    }

    #[test]
    fn reduce_emi_prepayment_keeps_tenure_and_lowers_installment() {
        let inputs = home_loan(vec![one_time(
            12,
            dec!(500000),
            PrepaymentStrategy::ReduceEmi,
        )]);

        let result = compute_loan(&inputs).unwrap();
        let summary = &result.summary;

        assert_eq!(summary.actual_tenure_months, 240);
        assert_eq!(summary.months_saved, 0);
        assert_eq!(summary.final_emi.round_dp(2), dec!(38963.93));
        assert_eq!(summary.interest_saved.round_dp(2), dec!(509408.02));
        assert_eq!(result.schedule[12].emi, summary.final_emi);
        assert_eq!(result.schedule[11].emi, summary.emi);
    }

    #[test]
    fn prepayment_is_capped_at_outstanding_balance() {
        let inputs = LoanInputs {
            principal: dec!(100000),
            annual_rate: dec!(12),
            tenure_months: 12,
            prepayments: vec![one_time(3, dec!(1000000), PrepaymentStrategy::ReduceTenure)],
        };

        let result = compute_loan(&inputs).unwrap();

        assert_eq!(result.schedule.len(), 3);
        let last = &result.schedule[2];
        assert_eq!(last.prepayment.round_dp(2), dec!(76108.03));
        assert_eq!(last.remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn zero_tenure_is_an_error() {
        let inputs = LoanInputs {
            tenure_months: 0,
            ..LoanInputs::default()
        };

        assert_eq!(compute_loan(&inputs), Err(CalculatorError::ZeroTenure));
    }

    #[test]
    fn recurring_prepayments_follow_frequency() {
        let entries = recurring_prepayments(
            dec!(10000),
            2,
            PrepaymentFrequency::Quarterly,
            12,
            PrepaymentStrategy::ReduceEmi,
        );

        let months: Vec<u32> = entries.iter().map(|p| p.month).collect();
        assert_eq!(months, vec![2, 5, 8, 11]);
        assert!(entries
            .iter()
            .all(|p| p.strategy == PrepaymentStrategy::ReduceEmi));
    }

    // =========================================================================
    // mortgage tests
    // =========================================================================

    #[test]
    fn mortgage_defaults_twenty_percent_down_has_no_pmi() {
        let result = compute_mortgage(&MortgageInputs::default()).unwrap();

        assert_eq!(result.loan_amount, dec!(320000));
        assert_eq!(result.down_payment_percentage, dec!(20));
        assert_eq!(result.monthly_principal_and_interest.round_dp(2), dec!(2022.62));
        assert_eq!(result.monthly_property_tax, dec!(400));
        assert_eq!(result.monthly_pmi, Decimal::ZERO);
        assert_eq!(result.total_monthly_payment.round_dp(2), dec!(2572.62));
        assert_eq!(result.total_interest.round_dp(2), dec!(408142.36));
    }

    #[test]
    fn mortgage_small_down_payment_adds_pmi() {
        let result = compute_mortgage(&MortgageInputs {
            down_payment: dec!(40000),
            ..MortgageInputs::default()
        })
        .unwrap();

        assert_eq!(result.loan_amount, dec!(360000));
        assert_eq!(result.monthly_pmi, dec!(150));
        assert_eq!(result.monthly_principal_and_interest.round_dp(2), dec!(2275.44));
    }

    #[test]
    fn mortgage_rejects_down_payment_above_price() {
        let inputs = MortgageInputs {
            down_payment: dec!(500000),
            ..MortgageInputs::default()
        };

        assert_eq!(
            compute_mortgage(&inputs),
            Err(CalculatorError::DownPaymentExceedsPrice)
        );
    }
}
