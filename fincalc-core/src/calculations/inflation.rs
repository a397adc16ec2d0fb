//! Purchasing power across CPI years, and projections at a constant rate.

use rust_decimal::{Decimal, MathematicalOps};

use crate::models::{CalculatorError, CpiTable, InflationResult};

/// Re-expresses `amount` in `start_year` money as `end_year` money:
/// `amount × CPI(end) / CPI(start)`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::{CpiTable, purchasing_power};
///
/// let result = purchasing_power(dec!(100), 2000, 2024, &CpiTable::us()).unwrap();
/// assert_eq!(result.future_value.round_dp(2), dec!(181.88));
/// ```
pub fn purchasing_power(
    amount: Decimal,
    start_year: i32,
    end_year: i32,
    table: &CpiTable,
) -> Result<InflationResult, CalculatorError> {
    let cpi_start = table
        .get(start_year)
        .ok_or(CalculatorError::MissingCpi(start_year))?;
    let cpi_end = table
        .get(end_year)
        .ok_or(CalculatorError::MissingCpi(end_year))?;

    let index_ratio = cpi_end
        .checked_div(cpi_start)
        .ok_or(CalculatorError::MissingCpi(start_year))?;
    let future_value = amount
        .checked_mul(index_ratio)
        .ok_or(CalculatorError::Overflow)?;

    Ok(InflationResult {
        future_value,
        total_inflation: future_value - amount,
        cumulative_rate: (index_ratio - Decimal::ONE) * Decimal::ONE_HUNDRED,
    })
}

/// `amount` grown for `years` at `annual_rate` percent a year.
pub fn project_inflation(
    amount: Decimal,
    years: u32,
    annual_rate: Decimal,
) -> Result<Decimal, CalculatorError> {
    (Decimal::ONE + annual_rate / Decimal::ONE_HUNDRED)
        .checked_powi(i64::from(years))
        .and_then(|factor| amount.checked_mul(factor))
        .ok_or(CalculatorError::Overflow)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn purchasing_power_between_known_years() {
        let result = purchasing_power(dec!(100), 2000, 2024, &CpiTable::us()).unwrap();

        assert_eq!(result.future_value.round_dp(2), dec!(181.88));
        assert_eq!(result.total_inflation.round_dp(2), dec!(81.88));
        assert_eq!(result.cumulative_rate.round_dp(2), dec!(81.88));
    }

    #[test]
    fn purchasing_power_backwards_shrinks_amount() {
        let result = purchasing_power(dec!(1000), 2024, 1990, &CpiTable::us()).unwrap();

        assert!(result.future_value < dec!(1000));
        assert!(result.cumulative_rate < Decimal::ZERO);
    }

    #[test]
    fn purchasing_power_same_year_is_identity() {
        let result = purchasing_power(dec!(250), 2015, 2015, &CpiTable::us()).unwrap();

        assert_eq!(result.future_value, dec!(250));
        assert_eq!(result.total_inflation, Decimal::ZERO);
        assert_eq!(result.cumulative_rate, Decimal::ZERO);
    }

    #[test]
    fn purchasing_power_unknown_year_names_it() {
        let err = purchasing_power(dec!(100), 1999, 2024, &CpiTable::us()).unwrap_err();

        assert_eq!(err, CalculatorError::MissingCpi(1999));
        assert_eq!(err.to_string(), "No CPI figure for 1999");
    }

    #[test]
    fn project_inflation_compounds_yearly() {
        let value = project_inflation(dec!(100000), 10, dec!(6)).unwrap();
        assert_eq!(value.round_dp(2), dec!(179084.77));
    }

    #[test]
    fn project_inflation_zero_years_is_unchanged() {
        assert_eq!(
            project_inflation(dec!(100000), 0, dec!(6)).unwrap(),
            dec!(100000)
        );
    }
}
