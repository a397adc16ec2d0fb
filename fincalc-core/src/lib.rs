pub mod calculations;
pub mod models;

pub use calculations::{
    compute_bracket_tax, compute_compound_interest, compute_loan, compute_mortgage,
    compute_real_hourly_wage, compute_regime_tax, compute_sip, income_wise_series,
    marginal_rate, project_inflation, purchasing_power, recommend_regime,
};
pub use models::*;
