use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Income and deduction figures for one filer.
///
/// All amounts are annual rupee figures. The engine does not validate them;
/// callers clamp negative or missing values and reject magnitudes beyond
/// [`MAX_AMOUNT`](crate::calculations::common::MAX_AMOUNT) before computing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxInputs {
    // Income
    pub annual_salary: Decimal,
    pub interest_income: Decimal,
    pub rental_income: Decimal,
    pub other_income: Decimal,

    // Deductions (old regime only)
    pub section_80c: Decimal,
    pub section_80d: Decimal,
    pub hra_exemption: Decimal,
    pub home_loan_interest: Decimal,
    pub nps_80ccd_1b: Decimal,
    pub other_deductions: Decimal,

    /// Salaried filers receive the regime's standard deduction.
    pub is_salaried: bool,
}

impl TaxInputs {
    /// Salary plus every other income head.
    pub fn gross_income(&self) -> Decimal {
        self.annual_salary + self.interest_income + self.rental_income + self.other_income
    }

    /// Same filer with a different salary and no non-salary income.
    pub fn with_salary_only(&self, annual_salary: Decimal) -> Self {
        Self {
            annual_salary,
            interest_income: Decimal::ZERO,
            rental_income: Decimal::ZERO,
            other_income: Decimal::ZERO,
            ..self.clone()
        }
    }
}

impl Default for TaxInputs {
    fn default() -> Self {
        Self {
            annual_salary: dec!(1500000),
            interest_income: Decimal::ZERO,
            rental_income: Decimal::ZERO,
            other_income: Decimal::ZERO,
            section_80c: dec!(150000),
            section_80d: dec!(25000),
            hra_exemption: Decimal::ZERO,
            home_loan_interest: Decimal::ZERO,
            nps_80ccd_1b: Decimal::ZERO,
            other_deductions: Decimal::ZERO,
            is_salaried: true,
        }
    }
}
