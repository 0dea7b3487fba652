//! Hourly window selection
//!
//! Picks the next seven hourly records at or after the dataset's current
//! timestamp. The scan runs over today's hours first and continues into
//! tomorrow's when today runs out; it never reaches a third day.

use serde::Serialize;

use crate::entities::{ForecastDataset, HourRecord};
use crate::errors::DomainError;

/// Number of hourly records in a window
pub const WINDOW_HOURS: usize = 7;

/// The selected hours, in chronological order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyWindow {
    records: Vec<HourRecord>,
}

impl HourlyWindow {
    /// Selected records
    #[must_use]
    pub fn records(&self) -> &[HourRecord] {
        &self.records
    }

    /// Number of records (always [`WINDOW_HOURS`])
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a window produced by the selector
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the selected records
    pub fn iter(&self) -> std::slice::Iter<'_, HourRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a HourlyWindow {
    type Item = &'a HourRecord;
    type IntoIter = std::slice::Iter<'a, HourRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Selects the upcoming hourly window from a forecast dataset
#[derive(Debug, Clone, Copy, Default)]
pub struct HourlyWindowSelector;

impl HourlyWindowSelector {
    /// Select the next [`WINDOW_HOURS`] records starting at the current hour
    ///
    /// # Errors
    ///
    /// - [`DomainError::MalformedInput`] if any day does not hold exactly 24
    ///   strictly increasing hours.
    /// - [`DomainError::OutOfRange`] if the window cannot be completed from
    ///   the first two days.
    pub fn select(dataset: &ForecastDataset) -> Result<HourlyWindow, DomainError> {
        for (index, day) in dataset.days.iter().enumerate() {
            if let Some(reason) = day.shape_problem() {
                return Err(DomainError::malformed(index, reason));
            }
        }

        let now = dataset.current_timestamp;
        let mut records = Vec::with_capacity(WINDOW_HOURS);

        // Phase 1: today.
        if let Some(today) = dataset.days.first() {
            Self::take_upcoming(&today.hours, now, &mut records);
        }

        // Phase 2: tomorrow, only when today ran out.
        if records.len() < WINDOW_HOURS {
            let tomorrow = dataset.days.get(1).ok_or(DomainError::OutOfRange {
                selected: records.len(),
                required: WINDOW_HOURS,
            })?;
            Self::take_upcoming(&tomorrow.hours, now, &mut records);
        }

        if records.len() < WINDOW_HOURS {
            return Err(DomainError::OutOfRange {
                selected: records.len(),
                required: WINDOW_HOURS,
            });
        }

        Ok(HourlyWindow { records })
    }

    /// Append hours at or after `now` until the window is full
    fn take_upcoming(hours: &[HourRecord], now: i64, records: &mut Vec<HourRecord>) {
        let remaining = WINDOW_HOURS - records.len();
        records.extend(
            hours
                .iter()
                .filter(|hour| hour.timestamp >= now)
                .take(remaining)
                .cloned(),
        );
    }
}
