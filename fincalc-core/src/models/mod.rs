mod calculator_error;
mod growth;
mod loan;
mod regime;
mod regime_config;
mod sip;
mod tax_bracket;
mod tax_breakdown;
mod tax_inputs;
mod wage;

pub use calculator_error::CalculatorError;
pub use growth::{
    CompoundInterestInputs, CompoundInterestResult, CompoundYear, CpiTable, InflationResult,
};
pub use loan::{
    AmortizationRow, LoanInputs, LoanResult, LoanSummary, MortgageInputs, MortgageResult,
    Prepayment, PrepaymentFrequency, PrepaymentStrategy,
};
pub use regime::Regime;
pub use regime_config::{DeductionCaps, RebateRule, RegimeConfig, SurchargeBand};
pub use sip::{DelayCost, PlannerMode, SipInputs, SipResult, SipYear, StepUpMode};
pub use tax_bracket::{BracketSchedule, BracketScheduleError, TaxBracket};
pub use tax_breakdown::{IncomeTaxPoint, Recommendation, SlabDetail, TaxBreakdown, TaxResult};
pub use tax_inputs::TaxInputs;
pub use wage::{
    ChartData, DetailedBreakdown, HoursSegment, SummaryMetrics, TimeSegment, WageError,
    WageInputs, WageResult, WaterfallPoint, WaterfallStage,
};
