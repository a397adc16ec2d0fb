//! Systematic investment plan (SIP) projections.
//!
//! Each month the installment is invested first and the whole corpus then
//! earns `annual_return / 12`. At every anniversary the installment steps
//! up, by a percentage or a fixed amount. Year-end rows are rounded to whole
//! units; the running figures are not.
//!
//! Besides the projection the planner reports:
//!
//! - the same plan without step-ups, for comparison
//! - in goal mode, the smallest starting installment reaching the target
//! - the annualised return (XIRR) of the monthly cash flows
//! - the corpus lost by starting 1, 2, 3, 5 or 10 years later
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::{SipInputs, compute_sip};
//!
//! let result = compute_sip(&SipInputs {
//!     monthly_investment: dec!(1000),
//!     tenure_years: 1,
//!     step_up_value: dec!(0),
//!     inflation_rate: None,
//!     ..SipInputs::default()
//! })
//! .unwrap();
//!
//! assert_eq!(result.total_invested, dec!(12000));
//! assert_eq!(result.estimated_corpus, dec!(12809));
//! ```

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::calculations::common::{max, round_rupee};
use crate::models::{
    CalculatorError, DelayCost, PlannerMode, SipInputs, SipResult, SipYear, StepUpMode,
};

/// Goal search stops doubling the installment once it passes this.
const MAX_GOAL_INSTALLMENT: Decimal = dec!(50000000);
/// Lowest installment the goal search starts doubling from.
const MIN_GOAL_INSTALLMENT: Decimal = dec!(1000);
const GOAL_SEARCH_ROUNDS: usize = 50;

const DELAY_YEARS: [u32; 6] = [0, 1, 2, 3, 5, 10];

const XIRR_MAX_ITERATIONS: usize = 300;
/// Starting monthly guess, roughly 10% a year.
const XIRR_GUESS: f64 = 0.008;
const XIRR_STEP_TOLERANCE: f64 = 1e-10;

fn step_up(
    installment: Decimal,
    mode: StepUpMode,
    value: Decimal,
) -> Decimal {
    if value <= Decimal::ZERO {
        return installment;
    }
    match mode {
        StepUpMode::Percent => installment * (Decimal::ONE + value / Decimal::ONE_HUNDRED),
        StepUpMode::Fixed => installment + value,
    }
}

fn round_percent(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn plan_months(tenure_years: u32) -> Result<u32, CalculatorError> {
    tenure_years
        .checked_mul(12)
        .map(|months| months.max(1))
        .ok_or(CalculatorError::Overflow)
}

struct Projection {
    yearly: Vec<SipYear>,
    estimated_corpus: Decimal,
    total_invested: Decimal,
    final_monthly_investment: Decimal,
}

/// Runs one SIP plan and its comparisons.
#[derive(Debug, Clone)]
pub struct SipPlanner<'a> {
    inputs: &'a SipInputs,
}

impl<'a> SipPlanner<'a> {
    pub fn new(inputs: &'a SipInputs) -> Self {
        Self { inputs }
    }

    pub fn calculate(&self) -> Result<SipResult, CalculatorError> {
        let inputs = self.inputs;

        let required_monthly_investment = match inputs.mode {
            PlannerMode::Goal => self.required_monthly_investment()?,
            PlannerMode::Wealth => Decimal::ZERO,
        };
        let installment = match inputs.mode {
            PlannerMode::Goal => required_monthly_investment,
            PlannerMode::Wealth => inputs.monthly_investment,
        };

        let projection = self.project(installment, inputs.tenure_years, inputs.step_up_value)?;
        let flat = self.project(installment, inputs.tenure_years, Decimal::ZERO)?;

        let estimated_corpus = projection.estimated_corpus;
        let total_invested = projection.total_invested;
        let wealth_gained = max(estimated_corpus - total_invested, Decimal::ZERO);
        let purchasing_power = projection
            .yearly
            .last()
            .map_or(estimated_corpus, |year| year.real_corpus);
        let absolute_return = if total_invested > Decimal::ZERO {
            round_percent(wealth_gained / total_invested * Decimal::ONE_HUNDRED)
        } else {
            Decimal::ZERO
        };

        let xirr = self.xirr(installment, estimated_corpus)?;
        let delay_costs = self.delay_costs(installment, &projection)?;

        debug!(
            %installment,
            %estimated_corpus,
            %total_invested,
            %xirr,
            "computed SIP projection"
        );

        Ok(SipResult {
            estimated_corpus,
            total_invested,
            wealth_gained,
            purchasing_power,
            required_monthly_investment,
            final_monthly_investment: projection.final_monthly_investment,
            goal_gap: max(inputs.target_corpus - estimated_corpus, Decimal::ZERO),
            yearly: projection.yearly,
            flat_corpus: flat.estimated_corpus,
            flat_wealth_gained: max(flat.estimated_corpus - flat.total_invested, Decimal::ZERO),
            flat_yearly: flat.yearly,
            xirr,
            absolute_return,
            delay_costs,
        })
    }

    /// Month by month growth of one plan, closing a row at each year end
    /// and at the final month.
    fn project(
        &self,
        monthly_investment: Decimal,
        tenure_years: u32,
        step_up_value: Decimal,
    ) -> Result<Projection, CalculatorError> {
        let inputs = self.inputs;
        let months = plan_months(tenure_years)?;
        let monthly_rate = inputs.annual_return / Decimal::ONE_HUNDRED / dec!(12);
        let inflation_factor = inputs
            .inflation_rate
            .map(|rate| Decimal::ONE + rate / Decimal::ONE_HUNDRED);

        let lumpsum = max(inputs.lumpsum_amount, Decimal::ZERO);
        let mut corpus = lumpsum;
        let mut total_invested = lumpsum;
        let mut interest_earned = Decimal::ZERO;
        let mut installment = max(monthly_investment, Decimal::ZERO);
        let mut yearly_investment = Decimal::ZERO;
        let mut yearly_interest = Decimal::ZERO;
        let mut yearly = Vec::with_capacity(months.div_ceil(12) as usize);

        for month in 1..=months {
            if month > 1 && (month - 1) % 12 == 0 {
                installment = step_up(installment, inputs.step_up_mode, step_up_value);
            }

            corpus = corpus
                .checked_add(installment)
                .ok_or(CalculatorError::Overflow)?;
            yearly_investment += installment;
            total_invested += installment;

            let interest = corpus
                .checked_mul(monthly_rate)
                .ok_or(CalculatorError::Overflow)?;
            corpus = corpus
                .checked_add(interest)
                .ok_or(CalculatorError::Overflow)?;
            interest_earned += interest;
            yearly_interest += interest;

            if month % 12 == 0 || month == months {
                let year = month.div_ceil(12);
                let real_corpus = match inflation_factor {
                    Some(factor) => factor
                        .checked_powi(i64::from(year))
                        .and_then(|divisor| corpus.checked_div(divisor))
                        .ok_or(CalculatorError::Overflow)?,
                    None => corpus,
                };

                yearly.push(SipYear {
                    year,
                    yearly_investment: round_rupee(yearly_investment),
                    total_invested: round_rupee(total_invested),
                    interest_earned: round_rupee(interest_earned),
                    yearly_interest_earned: round_rupee(yearly_interest),
                    total_corpus: round_rupee(corpus),
                    real_corpus: round_rupee(real_corpus),
                    monthly_sip: round_rupee(installment),
                });
                yearly_investment = Decimal::ZERO;
                yearly_interest = Decimal::ZERO;
            }
        }

        Ok(Projection {
            yearly,
            estimated_corpus: round_rupee(corpus),
            total_invested: round_rupee(total_invested),
            final_monthly_investment: round_rupee(installment),
        })
    }

    fn reaches_target(
        &self,
        installment: Decimal,
    ) -> Result<bool, CalculatorError> {
        let projection =
            self.project(installment, self.inputs.tenure_years, self.inputs.step_up_value)?;
        Ok(projection.estimated_corpus >= self.inputs.target_corpus)
    }

    /// Smallest starting installment, to the nearest unit, whose projected
    /// corpus reaches the target.
    fn required_monthly_investment(&self) -> Result<Decimal, CalculatorError> {
        if self.inputs.target_corpus <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }

        let mut low = Decimal::ZERO;
        let mut high = max(self.inputs.monthly_investment, MIN_GOAL_INSTALLMENT);
        while high < MAX_GOAL_INSTALLMENT {
            if self.reaches_target(high)? {
                break;
            }
            high *= Decimal::TWO;
        }

        for _ in 0..GOAL_SEARCH_ROUNDS {
            let mid = (low + high) / Decimal::TWO;
            if self.reaches_target(mid)? {
                high = mid;
            } else {
                low = mid;
            }
        }

        Ok(round_rupee(high))
    }

    /// Annualised return solving NPV = 0 over the monthly cash flows with
    /// Newton's method: the lump sum at month 0, each installment as an
    /// outflow, and the final corpus as an inflow in the last month.
    fn xirr(
        &self,
        installment: Decimal,
        final_corpus: Decimal,
    ) -> Result<Decimal, CalculatorError> {
        if final_corpus <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        let inputs = self.inputs;
        let months = plan_months(inputs.tenure_years)? as usize;

        let mut flows = vec![0.0_f64; months + 1];
        flows[0] = -max(inputs.lumpsum_amount, Decimal::ZERO).to_f64().unwrap_or(0.0);
        let mut current = installment;
        for (month, flow) in flows.iter_mut().enumerate().skip(1) {
            if month > 1 && (month - 1) % 12 == 0 {
                current = step_up(current, inputs.step_up_mode, inputs.step_up_value);
            }
            *flow = -current.to_f64().unwrap_or(0.0);
        }
        flows[months] += final_corpus.to_f64().unwrap_or(0.0);

        let mut rate = XIRR_GUESS;
        for _ in 0..XIRR_MAX_ITERATIONS {
            let mut npv = 0.0;
            let mut slope = 0.0;
            for (t, flow) in flows.iter().enumerate().filter(|(_, f)| **f != 0.0) {
                let discount = (1.0 + rate).powi(t as i32);
                npv += flow / discount;
                if t > 0 {
                    slope -= t as f64 * flow / (discount * (1.0 + rate));
                }
            }
            if slope.abs() < 1e-15 {
                break;
            }

            let step = npv / slope;
            let next = rate - step;
            rate = if next <= -0.5 {
                rate / 2.0
            } else if next >= 2.0 {
                (rate + 2.0) / 2.0
            } else {
                next
            };
            if step.abs() < XIRR_STEP_TOLERANCE {
                break;
            }
        }

        let annual = ((1.0 + rate.max(-0.99)).powi(12) - 1.0) * 100.0;
        match Decimal::from_f64(annual) {
            Some(value) => Ok(round_percent(value)),
            None => {
                warn!(annual, "XIRR did not converge to a finite rate");
                Ok(Decimal::ZERO)
            }
        }
    }

    fn delay_costs(
        &self,
        installment: Decimal,
        base: &Projection,
    ) -> Result<Vec<DelayCost>, CalculatorError> {
        let tenure = self.inputs.tenure_years;
        DELAY_YEARS
            .iter()
            .copied()
            .filter(|delay| *delay < tenure)
            .map(|delay| -> Result<DelayCost, CalculatorError> {
                if delay == 0 {
                    return Ok(DelayCost {
                        delay_years: 0,
                        corpus: base.estimated_corpus,
                        total_invested: base.total_invested,
                        loss: Decimal::ZERO,
                    });
                }
                let late = self.project(
                    installment,
                    (tenure - delay).max(1),
                    self.inputs.step_up_value,
                )?;
                Ok(DelayCost {
                    delay_years: delay,
                    corpus: late.estimated_corpus,
                    total_invested: late.total_invested,
                    loss: base.estimated_corpus - late.estimated_corpus,
                })
            })
            .collect()
    }
}

/// Projects one SIP plan.
///
/// # Errors
///
/// [`CalculatorError::Overflow`] when the corpus or inflation divisor leaves
/// `Decimal`'s range.
pub fn compute_sip(inputs: &SipInputs) -> Result<SipResult, CalculatorError> {
    SipPlanner::new(inputs).calculate()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn flat_plan(
        monthly_investment: Decimal,
        tenure_years: u32,
    ) -> SipInputs {
        SipInputs {
            monthly_investment,
            tenure_years,
            step_up_value: Decimal::ZERO,
            inflation_rate: None,
            ..SipInputs::default()
        }
    }

    // =========================================================================
    // step_up tests
    // =========================================================================

    #[test]
    fn step_up_percent_and_fixed() {
        assert_eq!(step_up(dec!(5000), StepUpMode::Percent, dec!(10)), dec!(5500));
        assert_eq!(step_up(dec!(5000), StepUpMode::Fixed, dec!(750)), dec!(5750));
    }

    #[test]
    fn step_up_ignores_non_positive_values() {
        assert_eq!(step_up(dec!(5000), StepUpMode::Fixed, dec!(-100)), dec!(5000));
        assert_eq!(step_up(dec!(5000), StepUpMode::Percent, Decimal::ZERO), dec!(5000));
    }

    // =========================================================================
    // projection tests
    // =========================================================================

    #[test]
    fn projection_defaults_with_ten_percent_step_up() {
        let result = compute_sip(&SipInputs::default()).unwrap();

        assert_eq!(result.estimated_corpus, dec!(9944358));
        assert_eq!(result.total_invested, dec!(3436500));
        assert_eq!(result.wealth_gained, dec!(6507858));
        assert_eq!(result.final_monthly_investment, dec!(30580));
        assert_eq!(result.purchasing_power, dec!(3100698));
        assert_eq!(result.absolute_return, dec!(189.37));
        assert_eq!(result.goal_gap, dec!(55642));
        assert_eq!(result.required_monthly_investment, Decimal::ZERO);
    }

    #[test]
    fn projection_rows_close_each_year() {
        let result = compute_sip(&SipInputs::default()).unwrap();

        assert_eq!(result.yearly.len(), 20);
        let first = &result.yearly[0];
        assert_eq!(first.year, 1);
        assert_eq!(first.yearly_investment, dec!(60000));
        assert_eq!(first.interest_earned, dec!(4047));
        assert_eq!(first.total_corpus, dec!(64047));
        assert_eq!(first.real_corpus, dec!(60421));
        assert_eq!(first.monthly_sip, dec!(5000));

        let last = &result.yearly[19];
        assert_eq!(last.yearly_investment, dec!(366955));
        assert_eq!(last.yearly_interest_earned, dec!(1099908));
    }

    #[test]
    fn flat_comparison_drops_step_ups() {
        let result = compute_sip(&SipInputs::default()).unwrap();

        assert_eq!(result.flat_corpus, dec!(4995740));
        assert_eq!(result.flat_wealth_gained, dec!(3795740));
        assert!(result.flat_yearly.iter().all(|y| y.monthly_sip == dec!(5000)));
    }

    #[test]
    fn single_year_without_inflation() {
        let result = compute_sip(&flat_plan(dec!(1000), 1)).unwrap();

        assert_eq!(result.estimated_corpus, dec!(12809));
        assert_eq!(result.purchasing_power, dec!(12809));
        assert_eq!(result.yearly.len(), 1);
    }

    #[test]
    fn zero_tenure_still_invests_one_month() {
        let result = compute_sip(&flat_plan(dec!(1000), 0)).unwrap();

        assert_eq!(result.total_invested, dec!(1000));
        assert_eq!(result.yearly.len(), 1);
        assert!(result.delay_costs.is_empty());
    }

    #[test]
    fn lumpsum_counts_as_invested() {
        let result = compute_sip(&SipInputs {
            lumpsum_amount: dec!(100000),
            ..flat_plan(dec!(1000), 1)
        })
        .unwrap();

        assert_eq!(result.total_invested, dec!(112000));
        assert!(result.estimated_corpus > dec!(112000));
    }

    // =========================================================================
    // goal, xirr and delay tests
    // =========================================================================

    #[test]
    fn goal_mode_finds_smallest_installment() {
        let inputs = SipInputs {
            mode: PlannerMode::Goal,
            ..SipInputs::default()
        };

        let result = compute_sip(&inputs).unwrap();

        assert_eq!(result.required_monthly_investment, dec!(5028));
        assert_eq!(result.estimated_corpus, dec!(10000046));
        assert_eq!(result.goal_gap, Decimal::ZERO);
    }

    #[test]
    fn goal_mode_without_target_needs_nothing() {
        let inputs = SipInputs {
            mode: PlannerMode::Goal,
            target_corpus: Decimal::ZERO,
            ..SipInputs::default()
        };

        let result = compute_sip(&inputs).unwrap();

        assert_eq!(result.required_monthly_investment, Decimal::ZERO);
        assert_eq!(result.total_invested, Decimal::ZERO);
        assert_eq!(result.xirr, Decimal::ZERO);
    }

    #[test]
    fn xirr_of_step_up_plan() {
        let result = compute_sip(&SipInputs::default()).unwrap();
        assert_eq!(result.xirr, dec!(12.79));
    }

    #[test]
    fn delay_costs_grow_with_delay() {
        let result = compute_sip(&SipInputs::default()).unwrap();

        let delays: Vec<u32> = result.delay_costs.iter().map(|d| d.delay_years).collect();
        assert_eq!(delays, vec![0, 1, 2, 3, 5, 10]);
        assert_eq!(result.delay_costs[0].loss, Decimal::ZERO);
        assert_eq!(result.delay_costs[1].corpus, dec!(8477496));
        assert_eq!(result.delay_costs[1].loss, dec!(1466862));
        assert_eq!(result.delay_costs[5].loss, dec!(8257195));
        assert!(
            result
                .delay_costs
                .windows(2)
                .all(|pair| pair[0].loss < pair[1].loss)
        );
    }

    #[test]
    fn delays_at_or_beyond_tenure_are_skipped() {
        let result = compute_sip(&flat_plan(dec!(1000), 3)).unwrap();

        let delays: Vec<u32> = result.delay_costs.iter().map(|d| d.delay_years).collect();
        assert_eq!(delays, vec![0, 1, 2]);
    }
}
