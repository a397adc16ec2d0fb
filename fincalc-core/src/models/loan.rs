use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// What the lender does with a prepayment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrepaymentStrategy {
    /// Keep the installment; the loan ends earlier.
    #[default]
    ReduceTenure,
    /// Keep the end date; the installment is recomputed over the months left.
    ReduceEmi,
}

impl PrepaymentStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "reduce-tenure" | "tenure" => Some(Self::ReduceTenure),
            "reduce-emi" | "emi" => Some(Self::ReduceEmi),
            _ => None,
        }
    }
}

/// How often a recurring prepayment repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrepaymentFrequency {
    Monthly,
    Quarterly,
    Yearly,
}

impl PrepaymentFrequency {
    pub fn interval_months(&self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Yearly => 12,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            "yearly" | "annually" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// A lump sum paid on top of the installment in `month` (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prepayment {
    pub month: u32,
    pub amount: Decimal,
    #[serde(default)]
    pub strategy: PrepaymentStrategy,
}

/// A reducing-balance loan. `annual_rate` is a percentage (8.5 = 8.5%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanInputs {
    pub principal: Decimal,
    pub annual_rate: Decimal,
    pub tenure_months: u32,
    pub prepayments: Vec<Prepayment>,
}

impl Default for LoanInputs {
    fn default() -> Self {
        Self {
            principal: dec!(5000000),
            annual_rate: dec!(8.5),
            tenure_months: 240,
            prepayments: Vec::new(),
        }
    }
}

/// One month of the amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    /// Installment due this month.
    pub emi: Decimal,
    pub principal: Decimal,
    pub interest: Decimal,
    pub prepayment: Decimal,
    /// Installment actually paid (principal + interest) plus any prepayment.
    pub total_payment: Decimal,
    pub remaining_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoanSummary {
    /// Installment at the start of the loan.
    pub emi: Decimal,
    /// Installment in force after the last prepayment.
    pub final_emi: Decimal,
    pub total_interest: Decimal,
    pub total_prepayment: Decimal,
    /// Principal plus total interest.
    pub total_amount: Decimal,
    pub actual_tenure_months: u32,
    /// Interest avoided compared with the same loan without prepayments.
    pub interest_saved: Decimal,
    pub months_saved: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanResult {
    pub summary: LoanSummary,
    pub schedule: Vec<AmortizationRow>,
}

/// A home purchase financed by a mortgage, with the usual monthly extras.
///
/// Rates are percentages; `home_insurance_monthly` and `hoa_monthly` are
/// flat monthly amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MortgageInputs {
    pub home_price: Decimal,
    pub down_payment: Decimal,
    pub term_years: u32,
    pub interest_rate: Decimal,
    pub property_tax_rate: Decimal,
    pub home_insurance_monthly: Decimal,
    /// Private mortgage insurance, charged while the down payment is below 20%.
    pub pmi_rate: Decimal,
    pub hoa_monthly: Decimal,
}

impl Default for MortgageInputs {
    fn default() -> Self {
        Self {
            home_price: dec!(400000),
            down_payment: dec!(80000),
            term_years: 30,
            interest_rate: dec!(6.5),
            property_tax_rate: dec!(1.2),
            home_insurance_monthly: dec!(150),
            pmi_rate: dec!(0.5),
            hoa_monthly: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MortgageResult {
    pub loan_amount: Decimal,
    pub down_payment_percentage: Decimal,
    pub monthly_principal_and_interest: Decimal,
    pub monthly_property_tax: Decimal,
    pub monthly_home_insurance: Decimal,
    pub monthly_pmi: Decimal,
    pub monthly_hoa: Decimal,
    pub total_monthly_payment: Decimal,
    /// Principal and interest over the whole term.
    pub total_payment: Decimal,
    pub total_interest: Decimal,
}
