//! Text cleaners applied to raw responses before coding.
//!
//! Every cleaner is a pure function from raw text to either a normalized value
//! or [`CleanedValue::NotCoded`]. Cleaners never fail.

mod age;
mod gender;
mod numbers;

use std::fmt;

use survey_model::{Cleaner, ControlCode};

pub use age::{clean_age, clean_age_with_range_filter};
pub use gender::clean_gender;

/// Output of a cleaner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CleanedValue {
    Value(String),
    /// No valid value could be determined.
    NotCoded,
}

impl CleanedValue {
    pub fn as_str(&self) -> &str {
        match self {
            CleanedValue::Value(value) => value,
            CleanedValue::NotCoded => ControlCode::NotCoded.as_str(),
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            CleanedValue::Value(value) => Some(value),
            CleanedValue::NotCoded => None,
        }
    }

    pub fn is_not_coded(&self) -> bool {
        matches!(self, CleanedValue::NotCoded)
    }
}

impl fmt::Display for CleanedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apply `cleaner` to `text`.
pub fn clean(cleaner: Cleaner, text: &str) -> CleanedValue {
    match cleaner {
        Cleaner::AgeWithRangeFilter => clean_age_with_range_filter(text),
        Cleaner::Gender => clean_gender(text),
    }
}

/// Lowercase alphanumeric tokens of `text`.
fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}
