//! Weather data models
//!
//! Types mirroring the weatherapi.com `forecast.json` response.

use chrono::NaiveDate;
use domain::{DomainError, ForecastDataset, ForecastDay, HourRecord};
use serde::{Deserialize, Serialize};

/// Weather condition as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Description, e.g. "Partly cloudy"
    pub text: String,
    /// Icon URL, usually protocol-relative (`//cdn.weatherapi.com/...`)
    pub icon: String,
    /// Provider condition code
    pub code: u32,
}

impl Condition {
    /// Icon URL with an explicit scheme
    #[must_use]
    pub fn icon_url(&self) -> String {
        normalize_icon_url(&self.icon)
    }
}

/// Prefix protocol-relative URLs with `https:`
pub(crate) fn normalize_icon_url(icon: &str) -> String {
    if icon.starts_with("//") {
        format!("https:{icon}")
    } else {
        icon.to_string()
    }
}

/// Resolved location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    /// IANA timezone
    pub tz_id: String,
    /// Local "now" in epoch seconds
    pub localtime_epoch: i64,
    /// Local "now" as text ("2024-01-15 14:52")
    #[serde(default)]
    pub localtime: String,
}

/// Current conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentData {
    #[serde(default)]
    pub last_updated_epoch: i64,
    #[serde(default)]
    pub last_updated: String,
    pub temp_c: f64,
    pub temp_f: f64,
    /// 1 during daytime, 0 at night
    pub is_day: u8,
    pub condition: Condition,
    #[serde(default)]
    pub wind_mph: f64,
    #[serde(default)]
    pub wind_kph: f64,
    #[serde(default)]
    pub wind_degree: u16,
    #[serde(default)]
    pub wind_dir: String,
    #[serde(default)]
    pub pressure_mb: f64,
    #[serde(default)]
    pub precip_mm: f64,
    #[serde(default)]
    pub precip_in: f64,
    #[serde(default)]
    pub humidity: u8,
    #[serde(default)]
    pub cloud: u8,
    #[serde(default)]
    pub feelslike_c: f64,
    #[serde(default)]
    pub feelslike_f: f64,
    #[serde(default)]
    pub uv: f64,
}

/// Day-level aggregates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayData {
    pub maxtemp_c: f64,
    pub maxtemp_f: f64,
    pub mintemp_c: f64,
    pub mintemp_f: f64,
    #[serde(default)]
    pub avgtemp_c: f64,
    #[serde(default)]
    pub avgtemp_f: f64,
    #[serde(default)]
    pub totalprecip_mm: f64,
    #[serde(default)]
    pub totalprecip_in: f64,
    #[serde(default)]
    pub avghumidity: f64,
    #[serde(default)]
    pub daily_chance_of_rain: u8,
    #[serde(default)]
    pub daily_chance_of_snow: u8,
    pub condition: Condition,
    #[serde(default)]
    pub uv: f64,
}

/// Sun and moon times (local, "07:12 AM")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Astro {
    #[serde(default)]
    pub sunrise: String,
    #[serde(default)]
    pub sunset: String,
    #[serde(default)]
    pub moonrise: String,
    #[serde(default)]
    pub moonset: String,
    #[serde(default)]
    pub moon_phase: String,
}

/// One hour of forecast data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourData {
    pub time_epoch: i64,
    #[serde(default)]
    pub time: String,
    pub temp_c: f64,
    pub temp_f: f64,
    #[serde(default)]
    pub is_day: u8,
    pub condition: Condition,
    #[serde(default)]
    pub wind_mph: f64,
    #[serde(default)]
    pub wind_kph: f64,
    #[serde(default)]
    pub humidity: u8,
    #[serde(default)]
    pub chance_of_rain: u8,
    #[serde(default)]
    pub chance_of_snow: u8,
}

/// One forecast day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDayData {
    /// Local date ("2024-01-15")
    pub date: String,
    #[serde(default)]
    pub date_epoch: i64,
    pub day: DayData,
    #[serde(default)]
    pub astro: Astro,
    #[serde(default)]
    pub hour: Vec<HourData>,
}

impl ForecastDayData {
    /// Parse the local date
    ///
    /// # Errors
    ///
    /// Returns the raw text if it is not a `YYYY-MM-DD` date.
    pub fn parsed_date(&self) -> Result<NaiveDate, String> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|e| format!("Invalid date {:?}: {e}", self.date))
    }
}

/// Forecast section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastData {
    #[serde(default)]
    pub forecastday: Vec<ForecastDayData>,
}

/// Weather alert
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub areas: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub effective: String,
    #[serde(default)]
    pub expires: String,
}

/// Alerts section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Alerts {
    #[serde(default)]
    pub alert: Vec<Alert>,
}

/// Complete `forecast.json` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub location: Location,
    pub current: CurrentData,
    #[serde(default)]
    pub forecast: ForecastData,
    #[serde(default)]
    pub alerts: Alerts,
}

impl ForecastResponse {
    /// Build the hourly forecast dataset used by the window selector
    ///
    /// `current_timestamp` is the location's local "now".
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MalformedInput` if a day's date cannot be parsed.
    pub fn to_dataset(&self) -> Result<ForecastDataset, DomainError> {
        let days = self
            .forecast
            .forecastday
            .iter()
            .enumerate()
            .map(|(index, day)| {
                let date = day
                    .parsed_date()
                    .map_err(|reason| DomainError::malformed(index, reason))?;
                let hours = day.hour.iter().map(HourData::to_record).collect();
                Ok(ForecastDay::new(date, hours))
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(ForecastDataset::new(self.location.localtime_epoch, days))
    }
}

impl HourData {
    /// Convert to a domain hour record
    #[must_use]
    pub fn to_record(&self) -> HourRecord {
        HourRecord::new(
            self.time_epoch,
            self.condition.icon_url(),
            self.condition.text.clone(),
        )
        .with_temperature(self.temp_f, self.temp_c)
    }
}

/// Error payload returned with 4xx responses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub message: String,
}
