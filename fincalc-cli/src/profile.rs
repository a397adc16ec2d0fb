//! TOML profiles holding saved calculator inputs.
//!
//! ```toml
//! [tax]
//! annual_salary = 1800000
//! section_80c = 150000
//! is_salaried = true
//!
//! [wage]
//! gross_annual_salary = 90000
//! hours_per_week = 45
//! currency_symbol = "€"
//! ```
//!
//! Both tables are optional and any missing key keeps its default.

use std::{
    fs,
    path::{Path, PathBuf},
};

use fincalc_core::{
    TaxInputs, WageInputs,
    calculations::common::{MAX_AMOUNT, within_amount_range},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Symbol shown in front of wage amounts when none is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("cannot read profile '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid profile: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("profile value {field} = {value} is beyond the supported maximum of {}", MAX_AMOUNT)]
    OutOfRange { field: &'static str, value: Decimal },
}

/// Wage inputs plus the display currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WageProfile {
    #[serde(flatten)]
    pub inputs: WageInputs,
    pub currency_symbol: String,
}

impl Default for WageProfile {
    fn default() -> Self {
        Self {
            inputs: WageInputs::default(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub tax: TaxInputs,
    pub wage: WageProfile,
}

impl Profile {
    pub fn from_toml_str(input: &str) -> Result<Self, ProfileError> {
        let profile: Self = toml::from_str(input)?;
        profile.check_ranges()?;
        Ok(profile)
    }

    fn check_ranges(&self) -> Result<(), ProfileError> {
        let tax = &self.tax;
        let wage = &self.wage.inputs;
        let amounts = [
            ("tax.annual_salary", tax.annual_salary),
            ("tax.interest_income", tax.interest_income),
            ("tax.rental_income", tax.rental_income),
            ("tax.other_income", tax.other_income),
            ("tax.section_80c", tax.section_80c),
            ("tax.section_80d", tax.section_80d),
            ("tax.hra_exemption", tax.hra_exemption),
            ("tax.home_loan_interest", tax.home_loan_interest),
            ("tax.nps_80ccd_1b", tax.nps_80ccd_1b),
            ("tax.other_deductions", tax.other_deductions),
            ("wage.gross_annual_salary", wage.gross_annual_salary),
            ("wage.tax_rate", wage.tax_rate),
            ("wage.hours_per_week", wage.hours_per_week),
            ("wage.vacation_weeks", wage.vacation_weeks),
            ("wage.commute_daily_minutes", wage.commute_daily_minutes),
            ("wage.prep_daily_minutes", wage.prep_daily_minutes),
            ("wage.decompression_daily_minutes", wage.decompression_daily_minutes),
            ("wage.unpaid_overtime_weekly", wage.unpaid_overtime_weekly),
            ("wage.commute_cost_monthly", wage.commute_cost_monthly),
            ("wage.food_coffee_monthly", wage.food_coffee_monthly),
            ("wage.professional_upkeep_annual", wage.professional_upkeep_annual),
            ("wage.misc_monthly_costs", wage.misc_monthly_costs),
        ];
        match amounts.into_iter().find(|(_, value)| !within_amount_range(*value)) {
            Some((field, value)) => Err(ProfileError::OutOfRange { field, value }),
            None => Ok(()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let text = fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let profile = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded profile");
        Ok(profile)
    }

    /// Loads `path` when given, otherwise returns the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ProfileError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
