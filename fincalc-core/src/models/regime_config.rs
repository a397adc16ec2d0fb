use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{BracketSchedule, Regime};

/// Ceilings applied to itemized deductions before they reduce taxable income.
///
/// HRA exemption and "other" deductions are uncapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionCaps {
    /// Section 80C (PF, ELSS, life insurance premiums).
    pub section_80c: Decimal,
    /// Section 80D (health insurance premiums).
    pub section_80d: Decimal,
    /// Section 24(b) interest on a self-occupied home loan.
    pub home_loan_interest: Decimal,
    /// Section 80CCD(1B) additional NPS contribution.
    pub nps_80ccd_1b: Decimal,
}

/// Section 87A rebate parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebateRule {
    /// Taxable income at or below which the full rebate applies.
    pub threshold: Decimal,
    /// Largest rebate that can be granted below the threshold.
    pub ceiling: Decimal,
    /// Upper end of the band above `threshold` where tax owed is capped at
    /// the income in excess of the threshold. `None` disables the band.
    pub marginal_relief_limit: Option<Decimal>,
}

/// Surcharge rate applied once taxable income exceeds `threshold`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeBand {
    pub threshold: Decimal,
    pub rate: Decimal,
}

/// Every jurisdiction- and year-specific constant needed to tax one regime.
///
/// The engine reads nothing but this value, so alternative years can be
/// modelled by building a different config.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::{Regime, RegimeConfig};
///
/// let config = RegimeConfig::for_regime(Regime::New);
///
/// assert_eq!(config.standard_deduction, dec!(75000));
/// assert_eq!(config.rebate.threshold, dec!(1200000));
/// assert!(!config.itemized_deductions_allowed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeConfig {
    pub regime: Regime,
    pub schedule: BracketSchedule,
    /// Granted only to salaried filers.
    pub standard_deduction: Decimal,
    pub itemized_deductions_allowed: bool,
    pub deduction_caps: DeductionCaps,
    pub rebate: RebateRule,
    /// Sorted by ascending threshold.
    pub surcharge_bands: Vec<SurchargeBand>,
    /// Health and education cess on tax after rebate and surcharge.
    pub cess_rate: Decimal,
}

impl RegimeConfig {
    pub fn for_regime(regime: Regime) -> Self {
        match regime {
            Regime::Old => Self::old_regime(),
            Regime::New => Self::new_regime(),
        }
    }

    pub fn old_regime() -> Self {
        Self {
            regime: Regime::Old,
            schedule: BracketSchedule::old_regime(),
            standard_deduction: dec!(50000),
            itemized_deductions_allowed: true,
            deduction_caps: DeductionCaps::default(),
            rebate: RebateRule {
                threshold: dec!(500000),
                ceiling: dec!(12500),
                marginal_relief_limit: None,
            },
            surcharge_bands: surcharge_bands(dec!(0.37)),
            cess_rate: dec!(0.04),
        }
    }

    pub fn new_regime() -> Self {
        Self {
            regime: Regime::New,
            schedule: BracketSchedule::new_regime(),
            standard_deduction: dec!(75000),
            itemized_deductions_allowed: false,
            deduction_caps: DeductionCaps::default(),
            rebate: RebateRule {
                threshold: dec!(1200000),
                ceiling: dec!(60000),
                marginal_relief_limit: Some(dec!(1275000)),
            },
            surcharge_bands: surcharge_bands(dec!(0.25)),
            cess_rate: dec!(0.04),
        }
    }
}

impl Default for DeductionCaps {
    fn default() -> Self {
        Self {
            section_80c: dec!(150000),
            section_80d: dec!(100000),
            home_loan_interest: dec!(200000),
            nps_80ccd_1b: dec!(50000),
        }
    }
}

/// 50L / 1Cr / 2Cr / 5Cr bands; only the rate above 5Cr differs by regime.
fn surcharge_bands(top_rate: Decimal) -> Vec<SurchargeBand> {
    vec![
        SurchargeBand {
            threshold: dec!(5000000),
            rate: dec!(0.10),
        },
        SurchargeBand {
            threshold: dec!(10000000),
            rate: dec!(0.15),
        },
        SurchargeBand {
            threshold: dec!(20000000),
            rate: dec!(0.25),
        },
        SurchargeBand {
            threshold: dec!(50000000),
            rate: top_rate,
        },
    ]
}
