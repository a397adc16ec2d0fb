use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Regime;

/// Income and tax attributed to one slab of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabDetail {
    pub label: String,
    pub rate: Decimal,
    pub taxable_amount: Decimal,
    pub tax: Decimal,
}

/// Full tax computation for a single regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub regime: Regime,
    pub gross_income: Decimal,
    pub total_deductions: Decimal,
    /// Never negative.
    pub taxable_income: Decimal,
    /// Slab tax before rebate, surcharge and cess.
    pub raw_tax: Decimal,
    /// Section 87A rebate; never exceeds `raw_tax`.
    pub rebate: Decimal,
    pub surcharge: Decimal,
    /// `raw_tax - rebate + surcharge`.
    pub tax_before_cess: Decimal,
    pub cess: Decimal,
    pub total_tax: Decimal,
    pub take_home_income: Decimal,
    /// `total_tax / gross_income` as a fraction.
    pub effective_rate: Decimal,
    pub marginal_rate: Decimal,
    /// Rounded to the rupee.
    pub monthly_tax: Decimal,
    /// Rounded to the rupee.
    pub monthly_take_home: Decimal,
    pub slab_breakdown: Vec<SlabDetail>,
}

/// Which regime is cheaper, and by how much.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommended: Regime,
    pub savings: Decimal,
}

/// One point of the salary-vs-tax curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxPoint {
    pub income: Decimal,
    pub old_tax: Decimal,
    pub new_tax: Decimal,
}

/// Both regimes side by side with the recommended choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub old_regime: TaxBreakdown,
    pub new_regime: TaxBreakdown,
    pub recommended_regime: Regime,
    pub savings: Decimal,
    pub income_wise_tax: Vec<IncomeTaxPoint>,
}

impl TaxResult {
    pub fn breakdown(&self, regime: Regime) -> &TaxBreakdown {
        match regime {
            Regime::Old => &self.old_regime,
            Regime::New => &self.new_regime,
        }
    }

    /// Breakdown of whichever regime was recommended.
    pub fn recommended(&self) -> &TaxBreakdown {
        self.breakdown(self.recommended_regime)
    }
}
