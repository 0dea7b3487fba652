//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A forecast day does not have the shape the selector relies on
    #[error("Malformed forecast day {day}: {reason}")]
    MalformedInput { day: usize, reason: String },

    /// The dataset does not cover enough hours to fill the window
    #[error("Forecast out of range: selected {selected} of {required} hours")]
    OutOfRange { selected: usize, required: usize },

    /// Unknown IANA timezone name
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

impl DomainError {
    /// Create a malformed input error for the given day index
    pub fn malformed(day: usize, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            day,
            reason: reason.into(),
        }
    }
}
