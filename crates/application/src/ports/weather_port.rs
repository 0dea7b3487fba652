//! Weather service port
//!
//! Defines the interface for weather data retrieval and the report shape
//! the dashboard is built from.

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{ForecastDataset, LocationQuery, Timezone};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Provider condition (text, icon URL and numeric code)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Human-readable description
    pub text: String,
    /// Icon URL
    pub icon: String,
    /// Provider condition code (e.g. 1000 for sunny)
    pub code: u32,
}

/// Resolved location of a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLocation {
    /// Place name
    pub name: String,
    /// Region or state
    pub region: String,
    /// Country
    pub country: String,
    /// Local timezone
    pub timezone: Timezone,
    /// Local "now" in epoch seconds
    pub localtime_epoch: i64,
}

/// Current weather conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Provider's last update time, local ("2024-01-15 14:45")
    pub last_updated: String,
    /// Temperature in Fahrenheit
    pub temperature_f: f64,
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Whether it is daytime at the location
    pub is_day: bool,
    /// Current condition
    pub condition: Condition,
    /// Wind speed in mph
    pub wind_mph: f64,
    /// Wind speed in km/h
    pub wind_kph: f64,
    /// Compass wind direction ("NW")
    pub wind_dir: String,
    /// Relative humidity in percent (0-100)
    pub humidity: u8,
    /// Precipitation in inches
    pub precip_in: f64,
    /// Precipitation in millimetres
    pub precip_mm: f64,
}

/// Day-level summary for one forecast day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyOutlook {
    /// Local date
    pub date: NaiveDate,
    /// Maximum temperature in Fahrenheit
    pub max_temp_f: f64,
    /// Minimum temperature in Fahrenheit
    pub min_temp_f: f64,
    /// Maximum temperature in Celsius
    pub max_temp_c: f64,
    /// Minimum temperature in Celsius
    pub min_temp_c: f64,
    /// Dominant condition
    pub condition: Condition,
    /// Local sunrise ("07:12 AM")
    pub sunrise: String,
    /// Local sunset ("04:48 PM")
    pub sunset: String,
}

/// Weather alert issued for the location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherAlert {
    /// Event name ("Winter Storm Warning")
    pub event: String,
    /// Headline
    pub headline: String,
    /// Severity ("Moderate", "Severe", ...)
    pub severity: String,
}

/// Everything the provider returned for one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Resolved location
    pub location: ReportLocation,
    /// Current conditions
    pub current: CurrentConditions,
    /// Day summaries, starting with today
    pub daily: Vec<DailyOutlook>,
    /// Active alerts
    pub alerts: Vec<WeatherAlert>,
    /// Hourly forecast data
    pub forecast: ForecastDataset,
}

impl WeatherReport {
    /// First alert that names an event
    #[must_use]
    pub fn first_alert_event(&self) -> Option<&str> {
        self.alerts
            .first()
            .map(|alert| alert.event.as_str())
            .filter(|event| !event.trim().is_empty())
    }
}

/// Port for weather service operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherPort: Send + Sync {
    /// Get the forecast report for a location
    ///
    /// # Arguments
    /// * `location` - Free-text location
    /// * `days` - Number of forecast days (the dashboard uses 3)
    async fn get_forecast(
        &self,
        location: &LocationQuery,
        days: u8,
    ) -> Result<WeatherReport, ApplicationError>;

    /// Check if the weather service is available
    async fn is_available(&self) -> bool;
}
