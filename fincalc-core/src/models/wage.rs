use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Salary, time and cost figures for the real hourly wage model.
///
/// Time fields are per day or per week as named; cost fields are per month
/// except `professional_upkeep_annual`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WageInputs {
    // Financial
    pub gross_annual_salary: Decimal,
    /// Effective tax rate as a percentage (25 = 25%).
    pub tax_rate: Decimal,

    // Time
    pub hours_per_week: Decimal,
    pub vacation_weeks: Decimal,
    pub commute_daily_minutes: Decimal,
    pub prep_daily_minutes: Decimal,
    pub decompression_daily_minutes: Decimal,
    pub unpaid_overtime_weekly: Decimal,

    // Costs
    pub commute_cost_monthly: Decimal,
    pub food_coffee_monthly: Decimal,
    pub professional_upkeep_annual: Decimal,
    pub misc_monthly_costs: Decimal,

    /// Remote workers have no commute time, commute cost or bought meals.
    pub is_remote: bool,
}

impl Default for WageInputs {
    fn default() -> Self {
        Self {
            gross_annual_salary: dec!(75000),
            tax_rate: dec!(25),
            hours_per_week: dec!(40),
            vacation_weeks: dec!(2),
            commute_daily_minutes: dec!(60),
            prep_daily_minutes: dec!(30),
            decompression_daily_minutes: dec!(30),
            unpaid_overtime_weekly: dec!(5),
            commute_cost_monthly: dec!(300),
            food_coffee_monthly: dec!(200),
            professional_upkeep_annual: dec!(1200),
            misc_monthly_costs: dec!(150),
            is_remote: false,
        }
    }
}

/// The only condition the wage model refuses to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum WageError {
    #[error("Hours per week must be greater than 0")]
    NonPositiveHours,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub nominal_wage: Decimal,
    pub real_wage: Decimal,
    pub erosion_percentage: Decimal,
    pub remote_equivalent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetailedBreakdown {
    pub total_annual_hours_invested: Decimal,
    pub total_unpaid_hours: Decimal,
    pub total_annual_work_costs: Decimal,
    pub adjusted_take_home_pay: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaterfallStage {
    GrossSalary,
    Taxes,
    WorkCosts,
    TimeCost,
    RealIncome,
}

impl WaterfallStage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::GrossSalary => "Gross Salary",
            Self::Taxes => "Taxes",
            Self::WorkCosts => "Work Costs",
            Self::TimeCost => "Time Cost",
            Self::RealIncome => "Real Income",
        }
    }
}

/// A step of the salary erosion waterfall. Deductions carry negative values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterfallPoint {
    pub stage: WaterfallStage,
    pub value: Decimal,
    pub cumulative: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeSegment {
    PaidWork,
    ShadowWork,
    Sleep,
    Freedom,
}

impl TimeSegment {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PaidWork => "Paid Work",
            Self::ShadowWork => "Shadow Work",
            Self::Sleep => "Sleep",
            Self::Freedom => "Freedom",
        }
    }
}

/// A slice of the 168-hour week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursSegment {
    pub segment: TimeSegment,
    pub hours: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChartData {
    pub waterfall_series: Vec<WaterfallPoint>,
    pub hours_distribution: Vec<HoursSegment>,
}

/// Output of the wage model.
///
/// When `error` is set every metric is zero and both series are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageResult {
    pub summary_metrics: SummaryMetrics,
    pub detailed_breakdown: DetailedBreakdown,
    pub chart_data: ChartData,
    pub error: Option<WageError>,
}

impl WageResult {
    pub(crate) fn failed(error: WageError) -> Self {
        Self {
            summary_metrics: SummaryMetrics::default(),
            detailed_breakdown: DetailedBreakdown::default(),
            chart_data: ChartData::default(),
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
