use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A contiguous income range taxed at a single rate.
///
/// `upper_bound` is inclusive. `None` marks the open-ended top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub label: String,
}

impl TaxBracket {
    pub fn bounded(upper_bound: Decimal, rate: Decimal, label: &str) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
            label: label.to_string(),
        }
    }

    pub fn open(rate: Decimal, label: &str) -> Self {
        Self {
            upper_bound: None,
            rate,
            label: label.to_string(),
        }
    }
}

/// Errors raised when a bracket schedule is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketScheduleError {
    /// The schedule contains no brackets at all.
    #[error("bracket schedule is empty")]
    Empty,

    /// A bracket's upper bound is not above the previous one.
    #[error("bracket {index} upper bound {bound} does not exceed the previous bound")]
    NonIncreasingBound { index: usize, bound: Decimal },

    /// A bracket rate lies outside `[0, 1]`.
    #[error("bracket {index} rate must be between 0 and 1, got {rate}")]
    InvalidRate { index: usize, rate: Decimal },

    /// An unbounded bracket appears before the end of the schedule.
    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedNotLast(usize),

    /// The final bracket has an upper bound.
    #[error("the last bracket must be unbounded")]
    MissingOpenTopBracket,
}

/// An ordered, validated sequence of brackets ending in an open top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketSchedule {
    brackets: Vec<TaxBracket>,
}

impl BracketSchedule {
    /// Builds a schedule after checking ordering, rates and the open top bracket.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketScheduleError> {
        let last = brackets.len().checked_sub(1).ok_or(BracketScheduleError::Empty)?;

        let mut previous = Decimal::ZERO;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketScheduleError::InvalidRate {
                    index,
                    rate: bracket.rate,
                });
            }

            match bracket.upper_bound {
                Some(bound) if bound <= previous => {
                    return Err(BracketScheduleError::NonIncreasingBound { index, bound });
                }
                Some(bound) => previous = bound,
                None if index != last => {
                    return Err(BracketScheduleError::UnboundedNotLast(index));
                }
                None => {}
            }
        }

        if brackets[last].upper_bound.is_some() {
            return Err(BracketScheduleError::MissingOpenTopBracket);
        }

        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// The bracket that catches all income above the last bound.
    pub fn top_bracket(&self) -> &TaxBracket {
        // `new` guarantees at least one bracket
        &self.brackets[self.brackets.len() - 1]
    }

    /// Old regime slabs: 0 / 5 / 20 / 30 percent.
    pub fn old_regime() -> Self {
        Self {
            brackets: vec![
                TaxBracket::bounded(dec!(250000), dec!(0.00), "0 - 2.5L"),
                TaxBracket::bounded(dec!(500000), dec!(0.05), "2.5L - 5L"),
                TaxBracket::bounded(dec!(1000000), dec!(0.20), "5L - 10L"),
                TaxBracket::open(dec!(0.30), "Above 10L"),
            ],
        }
    }

    /// New regime slabs for FY 2025-26, rising in steps of 4L.
    pub fn new_regime() -> Self {
        Self {
            brackets: vec![
                TaxBracket::bounded(dec!(400000), dec!(0.00), "0 - 4L"),
                TaxBracket::bounded(dec!(800000), dec!(0.05), "4L - 8L"),
                TaxBracket::bounded(dec!(1200000), dec!(0.10), "8L - 12L"),
                TaxBracket::bounded(dec!(1600000), dec!(0.15), "12L - 16L"),
                TaxBracket::bounded(dec!(2000000), dec!(0.20), "16L - 20L"),
                TaxBracket::bounded(dec!(2400000), dec!(0.25), "20L - 24L"),
                TaxBracket::open(dec!(0.30), "Above 24L"),
            ],
        }
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketSchedule {
    type Error = BracketScheduleError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketSchedule> for Vec<TaxBracket> {
    fn from(schedule: BracketSchedule) -> Self {
        schedule.brackets
    }
}
