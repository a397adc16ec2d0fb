//! CSV batch runner: one tax scenario per row in, one comparison per row out.
//!
//! ## Input columns
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column               | Required | Type    | Notes                              |
//! |----------------------|----------|---------|------------------------------------|
//! | `name`               | no       | string  | Echoed to the output               |
//! | `annual_salary`      | yes      | decimal |                                    |
//! | `interest_income`    | no       | decimal | Column or cell may be left empty   |
//! | `rental_income`      | no       | decimal |                                    |
//! | `other_income`       | no       | decimal |                                    |
//! | `section_80c`        | no       | decimal |                                    |
//! | `section_80d`        | no       | decimal |                                    |
//! | `hra_exemption`      | no       | decimal |                                    |
//! | `home_loan_interest` | no       | decimal |                                    |
//! | `nps_80ccd_1b`       | no       | decimal |                                    |
//! | `other_deductions`   | no       | decimal |                                    |
//! | `is_salaried`        | no       | bool    | `true`/`false`; empty means `true` |
//!
//! Missing amounts are zero, not the interactive defaults, so a row
//! describes exactly the scenario written in it.
//!
//! ```csv
//! name,annual_salary,section_80c,section_80d
//! junior,600000,,
//! senior,3500000,150000,25000
//! ```
//!
//! ## Output columns
//!
//! `row,name,gross_income,old_taxable_income,old_total_tax,new_taxable_income,new_total_tax,recommended_regime,savings`

use std::io::{Read, Write};

use fincalc_core::{
    Regime, TaxBreakdown, TaxInputs,
    calculations::{
        IncomeTaxCalculator,
        common::{MAX_AMOUNT, within_amount_range},
    },
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Serde-compatible rows that mirror the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ScenarioRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    annual_salary: Decimal,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    interest_income: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    rental_income: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    other_income: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    section_80c: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    section_80d: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    hra_exemption: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    home_loan_interest: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    nps_80ccd_1b: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    other_deductions: Option<Decimal>,
    #[serde(default)]
    is_salaried: Option<bool>,
}

/// One comparison written to the output CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioOutcome {
    /// 1-based data row number (header = row 0).
    pub row: usize,
    pub name: String,
    pub gross_income: Decimal,
    pub old_taxable_income: Decimal,
    pub old_total_tax: Decimal,
    pub new_taxable_income: Decimal,
    pub new_total_tax: Decimal,
    pub recommended_regime: Regime,
    pub savings: Decimal,
}

/// A parsed input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub row: usize,
    pub name: String,
    pub inputs: TaxInputs,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum BatchError {
    /// Structurally invalid CSV, a missing required column, or a cell that
    /// does not parse as its column type.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An amount cell held a negative number. `row` is 1-based.
    #[error("negative {column} ({value}) on row {row}")]
    NegativeAmount {
        column: &'static str,
        value: Decimal,
        row: usize,
    },

    /// An amount cell exceeded [`MAX_AMOUNT`].
    #[error("{column} ({value}) on row {row} is beyond the supported maximum of {}", MAX_AMOUNT)]
    AmountOutOfRange {
        column: &'static str,
        value: Decimal,
        row: usize,
    },
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

fn amount(
    value: Option<Decimal>,
    column: &'static str,
    row: usize,
) -> Result<Decimal, BatchError> {
    let value = value.unwrap_or(Decimal::ZERO);
    if value.is_sign_negative() && !value.is_zero() {
        return Err(BatchError::NegativeAmount { column, value, row });
    }
    if !within_amount_range(value) {
        return Err(BatchError::AmountOutOfRange { column, value, row });
    }
    Ok(value)
}

fn convert_row(
    raw: ScenarioRow,
    row: usize,
) -> Result<Scenario, BatchError> {
    let inputs = TaxInputs {
        annual_salary: amount(Some(raw.annual_salary), "annual_salary", row)?,
        interest_income: amount(raw.interest_income, "interest_income", row)?,
        rental_income: amount(raw.rental_income, "rental_income", row)?,
        other_income: amount(raw.other_income, "other_income", row)?,
        section_80c: amount(raw.section_80c, "section_80c", row)?,
        section_80d: amount(raw.section_80d, "section_80d", row)?,
        hra_exemption: amount(raw.hra_exemption, "hra_exemption", row)?,
        home_loan_interest: amount(raw.home_loan_interest, "home_loan_interest", row)?,
        nps_80ccd_1b: amount(raw.nps_80ccd_1b, "nps_80ccd_1b", row)?,
        other_deductions: amount(raw.other_deductions, "other_deductions", row)?,
        is_salaried: raw.is_salaried.unwrap_or(true),
    };

    Ok(Scenario {
        row,
        name: raw.name.unwrap_or_else(|| format!("row {row}")),
        inputs,
    })
}

/// Parses every scenario from `reader`, in file order.
///
/// # Errors
///
/// * [`BatchError::Csv`] if the CSV is malformed or a cell cannot be
///   deserialised.
/// * [`BatchError::NegativeAmount`] if any amount is below zero.
/// * [`BatchError::AmountOutOfRange`] if any amount exceeds [`MAX_AMOUNT`].
pub fn read_scenarios<R: Read>(reader: R) -> Result<Vec<Scenario>, BatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);

    reader
        .deserialize::<ScenarioRow>()
        .enumerate()
        .map(|(idx, result)| convert_row(result?, idx + 1))
        .collect()
}

// ---------------------------------------------------------------------------
// Evaluating and writing
// ---------------------------------------------------------------------------

fn outcome(
    scenario: &Scenario,
    old: &TaxBreakdown,
    new: &TaxBreakdown,
) -> ScenarioOutcome {
    let recommendation = fincalc_core::recommend_regime(old, new);
    // Trailing zeros from the cess multiplication would otherwise leak into
    // the CSV as `0.00`.
    ScenarioOutcome {
        row: scenario.row,
        name: scenario.name.clone(),
        gross_income: old.gross_income.normalize(),
        old_taxable_income: old.taxable_income.normalize(),
        old_total_tax: old.total_tax.normalize(),
        new_taxable_income: new.taxable_income.normalize(),
        new_total_tax: new.total_tax.normalize(),
        recommended_regime: recommendation.recommended,
        savings: recommendation.savings.normalize(),
    }
}

/// Computes both regimes for every scenario.
pub fn evaluate(
    calculator: &IncomeTaxCalculator,
    scenarios: &[Scenario],
) -> Vec<ScenarioOutcome> {
    scenarios
        .iter()
        .map(|scenario| {
            let old = calculator.compute_regime_tax(&scenario.inputs, Regime::Old);
            let new = calculator.compute_regime_tax(&scenario.inputs, Regime::New);
            outcome(scenario, &old, &new)
        })
        .collect()
}

/// Writes outcomes with a header row.
pub fn write_outcomes<W: Write>(
    writer: W,
    outcomes: &[ScenarioOutcome],
) -> Result<(), BatchError> {
    let mut writer = csv::Writer::from_writer(writer);
    for outcome in outcomes {
        writer.serialize(outcome)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Reads scenarios from `input`, evaluates them and writes the comparison to
/// `output`. Returns the number of rows processed.
pub fn run<R: Read, W: Write>(
    input: R,
    output: W,
) -> Result<usize, BatchError> {
    let scenarios = read_scenarios(input)?;
    let outcomes = evaluate(&IncomeTaxCalculator::default(), &scenarios);
    write_outcomes(output, &outcomes)?;
    tracing::debug!(rows = outcomes.len(), "batch complete");
    Ok(outcomes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    // =========================================================================
    // reading
    // =========================================================================

    #[test]
    fn minimal_row_zeroes_optional_amounts() {
        let csv = "annual_salary\n600000\n";

        let scenarios = read_scenarios(csv.as_bytes()).unwrap();

        assert_eq!(scenarios.len(), 1);
        let s = &scenarios[0];
        assert_eq!(s.row, 1);
        assert_eq!(s.name, "row 1");
        assert_eq!(s.inputs.annual_salary, dec!(600000));
        assert_eq!(s.inputs.section_80c, Decimal::ZERO);
        assert!(s.inputs.is_salaried);
    }

    #[test]
    fn columns_matched_by_name_with_whitespace_trimmed() {
        let csv = "section_80c, annual_salary ,name,is_salaried\n 150000 ,1800000, alice ,false\n";

        let scenarios = read_scenarios(csv.as_bytes()).unwrap();

        let s = &scenarios[0];
        assert_eq!(s.name, "alice");
        assert_eq!(s.inputs.annual_salary, dec!(1800000));
        assert_eq!(s.inputs.section_80c, dec!(150000));
        assert!(!s.inputs.is_salaried);
    }

    #[test]
    fn missing_required_column_is_csv_error() {
        let err = read_scenarios("name,section_80c\nbob,1000\n".as_bytes()).unwrap_err();
        assert!(matches!(err, BatchError::Csv(_)));
    }

    #[test]
    fn negative_amount_reports_row_and_column() {
        let csv = "annual_salary,section_80d\n500000,0\n700000,-5\n";

        let err = read_scenarios(csv.as_bytes()).unwrap_err();

        match err {
            BatchError::NegativeAmount { column, row, .. } => {
                assert_eq!(column, "section_80d");
                assert_eq!(row, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn long_decimals_keep_every_digit() {
        let csv = "annual_salary,interest_income,section_80c\n\
                   1500000.0000000000000001,123456789012.3456789012,\n";

        let scenarios = read_scenarios(csv.as_bytes()).unwrap();

        let s = &scenarios[0].inputs;
        assert_eq!(s.annual_salary, dec!(1500000.0000000000000001));
        assert_eq!(s.interest_income, dec!(123456789012.3456789012));
        assert_eq!(s.section_80c, Decimal::ZERO);
    }

    #[test]
    fn oversized_amount_reports_row_and_column() {
        let csv = "annual_salary,other_income\n500000,50000000000000000000000000000\n";

        let err = read_scenarios(csv.as_bytes()).unwrap_err();

        match err {
            BatchError::AmountOutOfRange { column, row, .. } => {
                assert_eq!(column, "other_income");
                assert_eq!(row, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    // =========================================================================
    // evaluating and writing
    // =========================================================================

    #[test]
    fn run_writes_header_and_one_line_per_row() {
        let csv = "name,annual_salary\nedge,1275000\nabove,1280000\n";
        let mut out = Vec::new();

        let rows = run(csv.as_bytes(), &mut out).unwrap();

        assert_eq!(rows, 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "row,name,gross_income,old_taxable_income,old_total_tax,new_taxable_income,new_total_tax,recommended_regime,savings"
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("1,edge,1275000,"));
        assert!(lines[1].contains(",1200000,0,new,"));
    }

    #[test]
    fn evaluate_picks_cheaper_regime() {
        let scenarios = vec![Scenario {
            row: 1,
            name: "heavy deductions".into(),
            inputs: TaxInputs {
                annual_salary: dec!(1500000),
                section_80c: dec!(150000),
                section_80d: dec!(100000),
                home_loan_interest: dec!(200000),
                nps_80ccd_1b: dec!(50000),
                hra_exemption: dec!(200000),
                ..TaxInputs::default()
            },
        }];

        let outcomes = evaluate(&IncomeTaxCalculator::default(), &scenarios);

        let o = &outcomes[0];
        assert_eq!(o.old_taxable_income, dec!(750000));
        assert_eq!(o.old_total_tax, dec!(65000));
        assert_eq!(o.new_taxable_income, dec!(1425000));
        assert_eq!(o.new_total_tax, dec!(97500));
        assert_eq!(o.recommended_regime, Regime::Old);
        assert_eq!(o.savings, dec!(32500));
    }
}
