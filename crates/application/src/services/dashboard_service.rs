//! Dashboard Service
//!
//! Fetches a forecast report for a location and turns it into the view model
//! the HTML templates render: current conditions, the next seven hours and
//! the day-by-day outlook.

use std::fmt;
use std::sync::Arc;

use domain::{HourlyWindow, HourlyWindowSelector, LocationQuery, Timezone};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{CurrentConditions, DailyOutlook, WeatherPort, WeatherReport};

/// Default number of forecast days requested from the provider
pub const DEFAULT_FORECAST_DAYS: u8 = 3;

/// Unit system used for displayed values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnits {
    /// Fahrenheit, mph, inches
    #[default]
    Imperial,
    /// Celsius, km/h, millimetres
    Metric,
}

impl DisplayUnits {
    /// Pick the value matching this unit system
    const fn pick(self, imperial: f64, metric: f64) -> f64 {
        match self {
            Self::Imperial => imperial,
            Self::Metric => metric,
        }
    }

    /// Temperature unit label
    #[must_use]
    pub const fn temperature_label(self) -> &'static str {
        match self {
            Self::Imperial => "°F",
            Self::Metric => "°C",
        }
    }

    /// Wind speed unit label
    #[must_use]
    pub const fn speed_label(self) -> &'static str {
        match self {
            Self::Imperial => "mph",
            Self::Metric => "km/h",
        }
    }

    /// Precipitation unit label
    #[must_use]
    pub const fn precipitation_label(self) -> &'static str {
        match self {
            Self::Imperial => "in",
            Self::Metric => "mm",
        }
    }
}

impl std::str::FromStr for DisplayUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "imperial" | "us" | "f" => Ok(Self::Imperial),
            "metric" | "si" | "c" => Ok(Self::Metric),
            _ => Err(format!("Invalid units: {s}. Use 'imperial' or 'metric'")),
        }
    }
}

/// Background image selection for the current conditions card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Background {
    /// Daytime flag (selects the day/night image set)
    pub is_day: bool,
    /// Provider condition code
    pub condition_code: u32,
}

impl Background {
    const fn day_segment(self) -> u8 {
        if self.is_day { 1 } else { 0 }
    }

    /// Image for the current condition
    #[must_use]
    pub fn image_path(self) -> String {
        format!(
            "/assets/background/{}/{}.png",
            self.day_segment(),
            self.condition_code
        )
    }

    /// Image used when no condition-specific image exists
    #[must_use]
    pub fn fallback_path(self) -> String {
        format!("/assets/background/{}/default.png", self.day_segment())
    }
}

/// Card header for the resolved location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationHeader {
    /// Place name
    pub name: String,
    /// Region or state
    pub region: String,
    /// Country
    pub country: String,
    /// Provider's last update time
    pub last_updated: String,
}

/// Current conditions panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentPanel {
    /// Rounded temperature
    pub temperature: i64,
    /// Condition description
    pub condition_text: String,
    /// Condition icon URL
    pub condition_icon: String,
    /// Today's rounded high
    pub high: i64,
    /// Today's rounded low
    pub low: i64,
    /// Rounded wind speed with unit and direction ("8 mph, SW")
    pub wind: String,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Precipitation with unit ("0.02 in")
    pub precipitation: String,
    /// Local sunrise
    pub sunrise: String,
    /// Local sunset
    pub sunset: String,
    /// First active alert event
    pub alert: Option<String>,
}

/// One card of the hourly forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySlot {
    /// Local time label ("3:00 PM")
    pub label: String,
    /// Epoch seconds of the hour
    pub timestamp: i64,
    /// Rounded temperature
    pub temperature: i64,
    /// Condition icon URL
    pub icon: String,
    /// Condition description
    pub text: String,
}

/// One card of the daily forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySlot {
    /// Day label ("15 Mon")
    pub label: String,
    /// Rounded high
    pub high: i64,
    /// Rounded low
    pub low: i64,
    /// Condition icon URL
    pub icon: String,
    /// Condition description
    pub text: String,
}

/// Complete view model for one dashboard render
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    /// Location header
    pub location: LocationHeader,
    /// Current conditions
    pub current: CurrentPanel,
    /// Background image selection
    pub background: Background,
    /// Next seven hours
    pub hourly: Vec<HourlySlot>,
    /// Day-by-day outlook
    pub daily: Vec<DailySlot>,
    /// Unit system of all displayed values
    pub units: DisplayUnits,
}

/// Builds dashboards from weather reports
pub struct DashboardService {
    weather: Arc<dyn WeatherPort>,
    forecast_days: u8,
    units: DisplayUnits,
}

impl fmt::Debug for DashboardService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardService")
            .field("forecast_days", &self.forecast_days)
            .field("units", &self.units)
            .finish_non_exhaustive()
    }
}

impl DashboardService {
    /// Create a service over the given weather port
    #[must_use]
    pub fn new(weather: Arc<dyn WeatherPort>) -> Self {
        Self {
            weather,
            forecast_days: DEFAULT_FORECAST_DAYS,
            units: DisplayUnits::default(),
        }
    }

    /// Set the number of forecast days requested
    #[must_use]
    pub const fn with_forecast_days(mut self, days: u8) -> Self {
        self.forecast_days = days;
        self
    }

    /// Set the display unit system
    #[must_use]
    pub const fn with_units(mut self, units: DisplayUnits) -> Self {
        self.units = units;
        self
    }

    /// Fetch the forecast for `raw_location` and build the dashboard
    ///
    /// The location is whitespace-trimmed and otherwise passed through to the
    /// provider unchanged.
    ///
    /// # Errors
    ///
    /// Returns the port's error if the fetch fails, or a domain error if the
    /// hourly data cannot fill the seven-hour window.
    #[instrument(skip(self), fields(days = self.forecast_days))]
    pub async fn build(&self, raw_location: &str) -> Result<Dashboard, ApplicationError> {
        let location = LocationQuery::new(raw_location);
        debug!(location = %location, "Fetching forecast");

        let report = self
            .weather
            .get_forecast(&location, self.forecast_days)
            .await?;

        let dashboard = Self::assemble(&report, self.units)?;
        info!(
            location = %report.location.name,
            hours = dashboard.hourly.len(),
            days = dashboard.daily.len(),
            "Dashboard built"
        );
        Ok(dashboard)
    }

    /// Turn a report into a dashboard view model
    ///
    /// # Errors
    ///
    /// Returns a domain error if the hourly window cannot be selected, or an
    /// internal error if the report has no day summaries.
    pub fn assemble(
        report: &WeatherReport,
        units: DisplayUnits,
    ) -> Result<Dashboard, ApplicationError> {
        if !report.forecast.current_within_today() {
            warn!(
                now = report.forecast.current_timestamp,
                "Current time is outside the first forecast day"
            );
        }

        let window = HourlyWindowSelector::select(&report.forecast)?;
        let hourly = Self::hourly_slots(&window, report.location.timezone, units)?;

        let today = report
            .daily
            .first()
            .ok_or_else(|| ApplicationError::Internal("Report has no forecast days".into()))?;

        let daily = report
            .daily
            .iter()
            .map(|day| Self::daily_slot(day, units))
            .collect();

        Ok(Dashboard {
            location: LocationHeader {
                name: report.location.name.clone(),
                region: report.location.region.clone(),
                country: report.location.country.clone(),
                last_updated: report.current.last_updated.clone(),
            },
            current: Self::current_panel(&report.current, today, report, units),
            background: Background {
                is_day: report.current.is_day,
                condition_code: report.current.condition.code,
            },
            hourly,
            daily,
            units,
        })
    }

    fn hourly_slots(
        window: &HourlyWindow,
        timezone: Timezone,
        units: DisplayUnits,
    ) -> Result<Vec<HourlySlot>, ApplicationError> {
        window
            .iter()
            .map(|hour| {
                let label = timezone.format_hour(hour.timestamp).ok_or_else(|| {
                    ApplicationError::Internal(format!(
                        "Timestamp out of range: {}",
                        hour.timestamp
                    ))
                })?;
                Ok(HourlySlot {
                    label,
                    timestamp: hour.timestamp,
                    temperature: round(units.pick(hour.temperature_f, hour.temperature_c)),
                    icon: hour.condition_icon.clone(),
                    text: hour.condition_text.clone(),
                })
            })
            .collect()
    }

    fn daily_slot(day: &DailyOutlook, units: DisplayUnits) -> DailySlot {
        DailySlot {
            label: Timezone::format_day(day.date),
            high: round(units.pick(day.max_temp_f, day.max_temp_c)),
            low: round(units.pick(day.min_temp_f, day.min_temp_c)),
            icon: day.condition.icon.clone(),
            text: day.condition.text.clone(),
        }
    }

    fn current_panel(
        current: &CurrentConditions,
        today: &DailyOutlook,
        report: &WeatherReport,
        units: DisplayUnits,
    ) -> CurrentPanel {
        let wind = round(units.pick(current.wind_mph, current.wind_kph));
        let precipitation = units.pick(current.precip_in, current.precip_mm);

        CurrentPanel {
            temperature: round(units.pick(current.temperature_f, current.temperature_c)),
            condition_text: current.condition.text.clone(),
            condition_icon: current.condition.icon.clone(),
            high: round(units.pick(today.max_temp_f, today.max_temp_c)),
            low: round(units.pick(today.min_temp_f, today.min_temp_c)),
            wind: format!("{wind} {}, {}", units.speed_label(), current.wind_dir),
            humidity: current.humidity,
            precipitation: format!("{precipitation} {}", units.precipitation_label()),
            sunrise: today.sunrise.clone(),
            sunset: today.sunset.clone(),
            alert: report.first_alert_event().map(str::to_string),
        }
    }
}

/// Round a measurement to the nearest whole number for display
#[allow(clippy::cast_possible_truncation)]
fn round(value: f64) -> i64 {
    value.round() as i64
}
