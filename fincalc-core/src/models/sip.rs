use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// How the monthly installment grows at each anniversary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepUpMode {
    /// `step_up_value` is a percentage of the current installment.
    #[default]
    Percent,
    /// `step_up_value` is added to the installment.
    Fixed,
}

impl StepUpMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "percent" | "%" => Some(Self::Percent),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlannerMode {
    /// Project the corpus from the given installment.
    #[default]
    Wealth,
    /// Find the installment that reaches `target_corpus`.
    Goal,
}

/// Systematic investment plan. Rates are percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SipInputs {
    pub monthly_investment: Decimal,
    pub tenure_years: u32,
    pub annual_return: Decimal,
    pub lumpsum_amount: Decimal,
    pub step_up_mode: StepUpMode,
    pub step_up_value: Decimal,
    /// `None` reports real corpus equal to the nominal one.
    pub inflation_rate: Option<Decimal>,
    pub mode: PlannerMode,
    pub target_corpus: Decimal,
}

impl Default for SipInputs {
    fn default() -> Self {
        Self {
            monthly_investment: dec!(5000),
            tenure_years: 20,
            annual_return: dec!(12),
            lumpsum_amount: Decimal::ZERO,
            step_up_mode: StepUpMode::Percent,
            step_up_value: dec!(10),
            inflation_rate: Some(dec!(6)),
            mode: PlannerMode::Wealth,
            target_corpus: dec!(10000000),
        }
    }
}

/// Figures at the end of each plan year, rounded to whole units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SipYear {
    pub year: u32,
    pub yearly_investment: Decimal,
    pub total_invested: Decimal,
    pub interest_earned: Decimal,
    pub yearly_interest_earned: Decimal,
    pub total_corpus: Decimal,
    pub real_corpus: Decimal,
    pub monthly_sip: Decimal,
}

/// Corpus lost by starting the same plan `delay_years` later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayCost {
    pub delay_years: u32,
    pub corpus: Decimal,
    pub total_invested: Decimal,
    pub loss: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SipResult {
    pub estimated_corpus: Decimal,
    pub total_invested: Decimal,
    pub wealth_gained: Decimal,
    /// Final corpus in today's money.
    pub purchasing_power: Decimal,
    /// Zero outside goal mode.
    pub required_monthly_investment: Decimal,
    pub final_monthly_investment: Decimal,
    pub goal_gap: Decimal,
    pub yearly: Vec<SipYear>,
    /// The same plan without step-ups.
    pub flat_yearly: Vec<SipYear>,
    pub flat_corpus: Decimal,
    pub flat_wealth_gained: Decimal,
    /// Annualised internal rate of return, percent, two decimals.
    pub xirr: Decimal,
    /// Wealth gained over total invested, percent, two decimals.
    pub absolute_return: Decimal,
    pub delay_costs: Vec<DelayCost>,
}
