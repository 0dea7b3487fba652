//! Forecast entities
//!
//! Hourly records grouped by calendar day, as delivered by the weather
//! provider for a single query.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of hourly records in a complete forecast day
pub const HOURS_PER_DAY: usize = 24;

/// One hour of forecast data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourRecord {
    /// Start of the hour in epoch seconds
    pub timestamp: i64,
    /// Condition icon URL
    pub condition_icon: String,
    /// Condition description (e.g. "Patchy rain possible")
    pub condition_text: String,
    /// Temperature in Fahrenheit
    pub temperature_f: f64,
    /// Temperature in Celsius
    pub temperature_c: f64,
}

impl HourRecord {
    /// Create an hour record without temperature data
    pub fn new(
        timestamp: i64,
        condition_icon: impl Into<String>,
        condition_text: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            condition_icon: condition_icon.into(),
            condition_text: condition_text.into(),
            temperature_f: 0.0,
            temperature_c: 0.0,
        }
    }

    /// Attach temperatures (Fahrenheit, Celsius)
    #[must_use]
    pub const fn with_temperature(mut self, temperature_f: f64, temperature_c: f64) -> Self {
        self.temperature_f = temperature_f;
        self.temperature_c = temperature_c;
        self
    }
}

/// One calendar day of hourly records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Local calendar date
    pub date: NaiveDate,
    /// Hourly records in chronological order
    pub hours: Vec<HourRecord>,
}

impl ForecastDay {
    /// Create a forecast day
    #[must_use]
    pub const fn new(date: NaiveDate, hours: Vec<HourRecord>) -> Self {
        Self { date, hours }
    }

    /// Check that the day holds exactly 24 strictly increasing hours
    ///
    /// Returns a description of the first problem found.
    pub fn shape_problem(&self) -> Option<String> {
        if self.hours.len() != HOURS_PER_DAY {
            return Some(format!(
                "expected {HOURS_PER_DAY} hours, found {}",
                self.hours.len()
            ));
        }
        self.hours
            .windows(2)
            .position(|pair| pair[0].timestamp >= pair[1].timestamp)
            .map(|i| format!("hour {} does not follow hour {i}", i + 1))
    }

    /// First and last timestamp covered by this day
    #[must_use]
    pub fn span(&self) -> Option<(i64, i64)> {
        Some((self.hours.first()?.timestamp, self.hours.last()?.timestamp))
    }
}

/// Forecast data for one location query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDataset {
    /// Local "now" at the queried location, in epoch seconds
    pub current_timestamp: i64,
    /// Days starting with today
    pub days: Vec<ForecastDay>,
}

impl ForecastDataset {
    /// Create a dataset
    #[must_use]
    pub const fn new(current_timestamp: i64, days: Vec<ForecastDay>) -> Self {
        Self {
            current_timestamp,
            days,
        }
    }

    /// Whether the current timestamp falls inside the first day
    ///
    /// The day ends one hour after its last hourly record starts.
    #[must_use]
    pub fn current_within_today(&self) -> bool {
        self.days
            .first()
            .and_then(ForecastDay::span)
            .is_some_and(|(start, last)| (start..last + 3600).contains(&self.current_timestamp))
    }
}
