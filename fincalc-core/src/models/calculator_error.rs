use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inputs the loan, growth and SIP calculators refuse to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CalculatorError {
    #[error("Tenure must be at least one month")]
    ZeroTenure,

    #[error("Down payment cannot exceed the home price")]
    DownPaymentExceedsPrice,

    #[error("No CPI figure for {0}")]
    MissingCpi(i32),

    #[error("Values grow beyond the representable range")]
    Overflow,
}
