//! Timezone value object

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// A validated IANA timezone (e.g. "Europe/London")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timezone(Tz);

impl Timezone {
    /// Parse an IANA timezone name
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if the name is not in the IANA database.
    pub fn new(name: &str) -> Result<Self, DomainError> {
        Tz::from_str(name.trim())
            .map(Self)
            .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
    }

    /// Get the timezone name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        self.0.name()
    }

    /// Format an epoch timestamp as a 12-hour clock label, e.g. "3:00 PM"
    ///
    /// Returns `None` if the timestamp is out of chrono's range.
    #[must_use]
    pub fn format_hour(&self, epoch: i64) -> Option<String> {
        let utc = DateTime::from_timestamp(epoch, 0)?;
        Some(utc.with_timezone(&self.0).format("%-I:%M %p").to_string())
    }

    /// Format a calendar date as a short day label, e.g. "15 Mon"
    #[must_use]
    pub fn format_day(date: NaiveDate) -> String {
        date.format("%-d %a").to_string()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(Tz::UTC)
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for Timezone {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<Timezone> for String {
    fn from(tz: Timezone) -> Self {
        tz.as_str().to_string()
    }
}
