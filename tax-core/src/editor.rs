//! Editing and validating bracket schedules.
//!
//! The calculations accept any bracket slice and never validate it. This
//! module is where input is checked: [`BracketEditor`] keeps a schedule
//! sorted while brackets are added and removed from user-entered text, and
//! [`validate_schedule`] checks a complete schedule (for example one read
//! from a file) before it is used.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::TaxBracket;
//! use tax_core::editor::{BracketEditError, BracketEditor};
//!
//! let mut editor = BracketEditor::new(vec![TaxBracket::new(dec!(0), dec!(10))]);
//! editor.add_bracket("50,000", "30").unwrap();
//! editor.add_bracket("30000", "20%").unwrap();
//!
//! let mins: Vec<_> = editor.brackets().iter().map(|b| b.min).collect();
//! assert_eq!(mins, [dec!(0), dec!(30000), dec!(50000)]);
//!
//! assert_eq!(
//!     editor.add_bracket("30000", "25"),
//!     Err(BracketEditError::DuplicateMin(dec!(30000)))
//! );
//! assert_eq!(editor.remove_bracket(0), Err(BracketEditError::CannotRemoveFloor));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::models::TaxBracket;
use crate::utils::parse_decimal;

/// Errors raised while editing a bracket schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketEditError {
    /// A required input field was left empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A field could not be parsed as a number.
    #[error("{field} must be a number, got '{input}'")]
    InvalidNumber { field: &'static str, input: String },

    /// The bracket's lower bound is below zero.
    #[error("minimum income must be non-negative, got {0}")]
    NegativeMin(Decimal),

    /// The rate is outside `[0, 100]`.
    #[error("tax rate must be between 0 and 100, got {0}")]
    RateOutOfRange(Decimal),

    /// Another bracket already starts at this amount.
    #[error("a bracket starting at {0} already exists")]
    DuplicateMin(Decimal),

    /// The first bracket is the schedule's floor and stays in place.
    #[error("the first bracket cannot be removed")]
    CannotRemoveFloor,

    #[error("no bracket at index {index} (schedule has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Problems found by [`validate_schedule`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("bracket schedule is empty")]
    Empty,

    /// Income below the first bound would not be allocated.
    #[error("first bracket must start at 0, got {0}")]
    MissingZeroFloor(Decimal),

    #[error("bracket {index} starts at {min}, which is not above the previous bound {previous}")]
    NotAscending {
        index: usize,
        min: Decimal,
        previous: Decimal,
    },

    #[error("bracket {index} has rate {rate}; rates must be between 0 and 100")]
    RateOutOfRange { index: usize, rate: Decimal },
}

/// Returns true when `rate` is a percentage in `[0, 100]`.
pub fn is_valid_rate(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate <= Decimal::ONE_HUNDRED
}

/// Checks that a schedule is complete and well formed.
///
/// A valid schedule is non-empty, starts at 0, has strictly ascending
/// bounds (so no duplicates) and only rates in `[0, 100]`.
pub fn validate_schedule(brackets: &[TaxBracket]) -> Result<(), ScheduleError> {
    let first = brackets.first().ok_or(ScheduleError::Empty)?;
    if !first.min.is_zero() {
        return Err(ScheduleError::MissingZeroFloor(first.min));
    }

    for (index, bracket) in brackets.iter().enumerate() {
        if !is_valid_rate(bracket.rate) {
            return Err(ScheduleError::RateOutOfRange {
                index,
                rate: bracket.rate,
            });
        }
        if index > 0 {
            let previous = brackets[index - 1].min;
            if bracket.min <= previous {
                return Err(ScheduleError::NotAscending {
                    index,
                    min: bracket.min,
                    previous,
                });
            }
        }
    }

    Ok(())
}

/// An editable bracket schedule that is always sorted by `min`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketEditor {
    brackets: Vec<TaxBracket>,
}

impl BracketEditor {
    /// Creates an editor, sorting `brackets` ascending by `min`.
    pub fn new(mut brackets: Vec<TaxBracket>) -> Self {
        brackets.sort_by(|a, b| a.min.cmp(&b.min));
        Self { brackets }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn into_brackets(self) -> Vec<TaxBracket> {
        self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Replaces the whole schedule, e.g. when a preset is selected.
    pub fn replace(
        &mut self,
        brackets: Vec<TaxBracket>,
    ) {
        *self = Self::new(brackets);
    }

    /// Parses and inserts a bracket from user-entered text.
    ///
    /// Both fields are required. Thousands separators, a leading `$` on the
    /// minimum and a trailing `%` on the rate are accepted.
    pub fn add_bracket(
        &mut self,
        min: &str,
        rate: &str,
    ) -> Result<(), BracketEditError> {
        let min = parse_field("minimum income", min)?;
        let rate = parse_field("tax rate", rate)?;
        self.insert(TaxBracket::new(min, rate))
    }

    /// Inserts a bracket at its sorted position.
    pub fn insert(
        &mut self,
        bracket: TaxBracket,
    ) -> Result<(), BracketEditError> {
        if bracket.min < Decimal::ZERO {
            return Err(BracketEditError::NegativeMin(bracket.min));
        }
        if !is_valid_rate(bracket.rate) {
            return Err(BracketEditError::RateOutOfRange(bracket.rate));
        }

        match self.brackets.binary_search_by(|b| b.min.cmp(&bracket.min)) {
            Ok(_) => Err(BracketEditError::DuplicateMin(bracket.min)),
            Err(position) => {
                debug!(min = %bracket.min, rate = %bracket.rate, position, "Inserted bracket");
                self.brackets.insert(position, bracket);
                Ok(())
            }
        }
    }

    /// Removes and returns the bracket at `index`.
    ///
    /// The first bracket cannot be removed.
    pub fn remove_bracket(
        &mut self,
        index: usize,
    ) -> Result<TaxBracket, BracketEditError> {
        if index >= self.brackets.len() {
            return Err(BracketEditError::IndexOutOfRange {
                index,
                len: self.brackets.len(),
            });
        }
        if index == 0 {
            return Err(BracketEditError::CannotRemoveFloor);
        }
        Ok(self.brackets.remove(index))
    }
}

fn parse_field(
    field: &'static str,
    input: &str,
) -> Result<Decimal, BracketEditError> {
    if input.trim().is_empty() {
        return Err(BracketEditError::MissingField(field));
    }
    parse_decimal(input).map_err(|_| BracketEditError::InvalidNumber {
        field,
        input: input.to_string(),
    })
}
