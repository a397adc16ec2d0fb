//! Real hourly wage model.
//!
//! Converts a nominal salary into what an hour of working life actually pays
//! once taxes, job-related costs and unpaid "shadow work" (commuting, getting
//! ready, decompressing, unpaid overtime) are accounted for.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::{WageInputs, compute_real_hourly_wage};
//!
//! let result = compute_real_hourly_wage(&WageInputs::default());
//!
//! assert!(result.error.is_none());
//! assert!(result.summary_metrics.real_wage < result.summary_metrics.nominal_wage);
//! assert_eq!(result.detailed_breakdown.total_annual_work_costs, dec!(9000));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::calculations::common::{max, ratio_or_zero};
use crate::models::{
    ChartData, DetailedBreakdown, HoursSegment, SummaryMetrics, TimeSegment, WageError,
    WageInputs, WageResult, WaterfallPoint, WaterfallStage,
};

const WEEKS_PER_YEAR: Decimal = dec!(52);
const MONTHS_PER_YEAR: Decimal = dec!(12);
const MINUTES_PER_HOUR: Decimal = dec!(60);
/// Shadow work is scaled by a fixed five-day week regardless of contracted hours.
const WORKDAYS_PER_WEEK: Decimal = dec!(5);
const HOURS_PER_WEEK: Decimal = dec!(168);
/// Eight hours a night, seven nights.
const SLEEP_HOURS_PER_WEEK: Decimal = dec!(56);

/// Computes nominal and real hourly wage plus the chart series.
///
/// Remote work zeroes commute time, commute cost and food cost before any
/// other step. Non-positive contracted hours yield an all-zero result carrying
/// [`WageError::NonPositiveHours`]; nothing else is validated.
pub fn compute_real_hourly_wage(raw_inputs: &WageInputs) -> WageResult {
    let inputs = effective_inputs(raw_inputs);

    if inputs.hours_per_week <= Decimal::ZERO {
        warn!(hours_per_week = %inputs.hours_per_week, "wage model needs positive weekly hours");
        return WageResult::failed(WageError::NonPositiveHours);
    }

    // Time aggregation
    let working_weeks = WEEKS_PER_YEAR - inputs.vacation_weeks;
    let weekly_shadow_hours = weekly_shadow_hours(&inputs);
    let contract_hours = working_weeks * inputs.hours_per_week;
    let total_annual_hours = working_weeks
        * (inputs.hours_per_week + weekly_shadow_hours + inputs.unpaid_overtime_weekly);

    // Financial netting
    let tax_deduction = inputs.gross_annual_salary * (inputs.tax_rate / dec!(100));
    let net_annual_income = inputs.gross_annual_salary - tax_deduction;
    let total_work_costs = annual_work_costs(&inputs);
    let adjusted_net_income = net_annual_income - total_work_costs;

    // Core metrics
    let nominal_annual_hours = WEEKS_PER_YEAR * inputs.hours_per_week;
    let nominal_wage = net_annual_income / nominal_annual_hours;
    let real_wage = ratio_or_zero(adjusted_net_income, total_annual_hours);
    let erosion_percentage = if nominal_wage > Decimal::ZERO {
        (nominal_wage - real_wage) / nominal_wage * dec!(100)
    } else {
        Decimal::ZERO
    };
    let remote_equivalent = real_wage * nominal_annual_hours;
    let total_unpaid_hours = total_annual_hours - contract_hours;

    debug!(
        %nominal_wage,
        %real_wage,
        %erosion_percentage,
        %total_annual_hours,
        "computed real hourly wage"
    );

    let time_cost = if nominal_wage > Decimal::ZERO {
        total_unpaid_hours * nominal_wage
    } else {
        Decimal::ZERO
    };

    WageResult {
        summary_metrics: SummaryMetrics {
            nominal_wage,
            real_wage,
            erosion_percentage,
            remote_equivalent,
        },
        detailed_breakdown: DetailedBreakdown {
            total_annual_hours_invested: total_annual_hours,
            total_unpaid_hours,
            total_annual_work_costs: total_work_costs,
            adjusted_take_home_pay: adjusted_net_income,
        },
        chart_data: ChartData {
            waterfall_series: waterfall_series(
                inputs.gross_annual_salary,
                tax_deduction,
                total_work_costs,
                time_cost,
                adjusted_net_income,
            ),
            hours_distribution: hours_distribution(
                inputs.hours_per_week,
                weekly_shadow_hours + inputs.unpaid_overtime_weekly,
            ),
        },
        error: None,
    }
}

/// Applies the remote toggle.
fn effective_inputs(raw: &WageInputs) -> WageInputs {
    let mut inputs = raw.clone();
    if inputs.is_remote {
        inputs.commute_daily_minutes = Decimal::ZERO;
        inputs.commute_cost_monthly = Decimal::ZERO;
        inputs.food_coffee_monthly = Decimal::ZERO;
    }
    inputs
}

fn weekly_shadow_hours(inputs: &WageInputs) -> Decimal {
    let daily_minutes = inputs.commute_daily_minutes
        + inputs.prep_daily_minutes
        + inputs.decompression_daily_minutes;
    daily_minutes / MINUTES_PER_HOUR * WORKDAYS_PER_WEEK
}

fn annual_work_costs(inputs: &WageInputs) -> Decimal {
    (inputs.commute_cost_monthly + inputs.food_coffee_monthly + inputs.misc_monthly_costs)
        * MONTHS_PER_YEAR
        + inputs.professional_upkeep_annual
}

/// Gross salary eroded step by step down to real income.
///
/// The last point is pinned to the adjusted net income rather than carried
/// from the running total, which also subtracts the notional time cost.
fn waterfall_series(
    gross: Decimal,
    taxes: Decimal,
    work_costs: Decimal,
    time_cost: Decimal,
    adjusted_net_income: Decimal,
) -> Vec<WaterfallPoint> {
    let after_taxes = gross - taxes;
    let after_costs = after_taxes - work_costs;

    vec![
        WaterfallPoint {
            stage: WaterfallStage::GrossSalary,
            value: gross,
            cumulative: gross,
        },
        WaterfallPoint {
            stage: WaterfallStage::Taxes,
            value: -taxes,
            cumulative: after_taxes,
        },
        WaterfallPoint {
            stage: WaterfallStage::WorkCosts,
            value: -work_costs,
            cumulative: after_costs,
        },
        WaterfallPoint {
            stage: WaterfallStage::TimeCost,
            value: -time_cost,
            cumulative: after_costs - time_cost,
        },
        WaterfallPoint {
            stage: WaterfallStage::RealIncome,
            value: adjusted_net_income,
            cumulative: adjusted_net_income,
        },
    ]
}

/// Splits the 168-hour week; each segment is floored at zero.
fn hours_distribution(
    paid_hours: Decimal,
    shadow_and_overtime: Decimal,
) -> Vec<HoursSegment> {
    let freedom = HOURS_PER_WEEK - paid_hours - shadow_and_overtime - SLEEP_HOURS_PER_WEEK;

    vec![
        HoursSegment {
            segment: TimeSegment::PaidWork,
            hours: max(paid_hours, Decimal::ZERO),
        },
        HoursSegment {
            segment: TimeSegment::ShadowWork,
            hours: max(shadow_and_overtime, Decimal::ZERO),
        },
        HoursSegment {
            segment: TimeSegment::Sleep,
            hours: SLEEP_HOURS_PER_WEEK,
        },
        HoursSegment {
            segment: TimeSegment::Freedom,
            hours: max(freedom, Decimal::ZERO),
        },
    ]
}
