//! Pure calculation routines for the tax engine, the wage model and the
//! loan and investment calculators.
//!
//! Nothing in this module performs I/O or keeps state between calls; every
//! function maps its inputs to a freshly built result.

pub mod brackets;
pub mod common;
pub mod compound_interest;
pub mod income_tax;
pub mod inflation;
pub mod loan;
pub mod real_wage;
pub mod sip;

pub use brackets::{BracketTax, compute_bracket_tax, marginal_rate};
pub use compound_interest::compute_compound_interest;
pub use income_tax::{
    IncomeTaxCalculator, RegimeCalculator, compute_regime_tax, income_wise_series,
    recommend_regime,
};
pub use inflation::{project_inflation, purchasing_power};
pub use loan::{LoanCalculator, compute_loan, compute_mortgage, emi, recurring_prepayments};
pub use real_wage::compute_real_hourly_wage;
pub use sip::{SipPlanner, compute_sip};
