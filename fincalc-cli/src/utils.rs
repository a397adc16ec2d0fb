use fincalc_core::calculations::common::{MAX_AMOUNT, within_amount_range};
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
pub enum ParseDecimalError {
    #[error("invalid decimal '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("'{input}' is outside the supported range of ±{}", MAX_AMOUNT)]
    OutOfRange { input: String },
}

/// Strips whitespace, thousands separators (Western or Indian grouping) and
/// a leading rupee sign.
fn normalize_decimal_input(s: &str) -> String {
    s.trim().trim_start_matches('₹').replace([',', '_'], "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles commas in either grouping (`"1,234.56"`, `"15,00,000"`).
/// Empty or whitespace-only input is treated as 0. Values beyond
/// [`MAX_AMOUNT`] are rejected.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let value: Decimal = normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError::Invalid {
            input: s.to_string(),
            source: e,
        }
    })?;
    if !within_amount_range(value) {
        tracing::debug!(input = %s, "decimal out of range");
        return Err(ParseDecimalError::OutOfRange {
            input: s.to_string(),
        });
    }
    Ok(value)
}
