//! Weather adapter - Implements WeatherPort using integration_weather

use application::error::ApplicationError;
use application::ports::{
    Condition, CurrentConditions, DailyOutlook, ReportLocation, WeatherAlert, WeatherPort,
    WeatherReport,
};
use async_trait::async_trait;
use domain::{DomainError, LocationQuery, Timezone};
use integration_weather::{
    Alert, Condition as IntegrationCondition, CurrentData, ForecastDayData, ForecastResponse,
    WeatherApiClient, WeatherApiConfig, WeatherClient, WeatherError,
};
use tracing::{debug, instrument};

/// Adapter for the weatherapi.com forecast service
pub struct WeatherAdapter {
    client: WeatherApiClient,
}

impl std::fmt::Debug for WeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAdapter")
            .field("client", &"WeatherApiClient")
            .finish()
    }
}

impl WeatherAdapter {
    /// Create with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: WeatherApiConfig) -> Result<Self, ApplicationError> {
        let client = WeatherApiClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self { client })
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::ConnectionFailed(e)
            | WeatherError::RequestFailed(e)
            | WeatherError::ServiceUnavailable(e) => ApplicationError::ExternalService(e),
            WeatherError::ParseError(e) => ApplicationError::Internal(e),
            WeatherError::LocationNotFound(e) => ApplicationError::NotFound(e),
            WeatherError::Unauthorized(e) => ApplicationError::NotAuthorized(e),
            WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
        }
    }

    /// Convert an integration condition, normalizing the icon URL
    fn map_condition(condition: &IntegrationCondition) -> Condition {
        Condition {
            text: condition.text.clone(),
            icon: condition.icon_url(),
            code: condition.code,
        }
    }

    fn map_current(current: &CurrentData) -> CurrentConditions {
        CurrentConditions {
            last_updated: current.last_updated.clone(),
            temperature_f: current.temp_f,
            temperature_c: current.temp_c,
            is_day: current.is_day == 1,
            condition: Self::map_condition(&current.condition),
            wind_mph: current.wind_mph,
            wind_kph: current.wind_kph,
            wind_dir: current.wind_dir.clone(),
            humidity: current.humidity,
            precip_in: current.precip_in,
            precip_mm: current.precip_mm,
        }
    }

    fn map_daily(index: usize, day: &ForecastDayData) -> Result<DailyOutlook, DomainError> {
        let date = day
            .parsed_date()
            .map_err(|reason| DomainError::malformed(index, reason))?;
        Ok(DailyOutlook {
            date,
            max_temp_f: day.day.maxtemp_f,
            min_temp_f: day.day.mintemp_f,
            max_temp_c: day.day.maxtemp_c,
            min_temp_c: day.day.mintemp_c,
            condition: Self::map_condition(&day.day.condition),
            sunrise: day.astro.sunrise.clone(),
            sunset: day.astro.sunset.clone(),
        })
    }

    fn map_alert(alert: &Alert) -> WeatherAlert {
        WeatherAlert {
            event: alert.event.clone(),
            headline: alert.headline.clone(),
            severity: alert.severity.clone(),
        }
    }

    /// Convert a provider response into a report
    fn map_report(response: &ForecastResponse) -> Result<WeatherReport, ApplicationError> {
        let timezone = Timezone::new(&response.location.tz_id)?;
        let daily = response
            .forecast
            .forecastday
            .iter()
            .enumerate()
            .map(|(index, day)| Self::map_daily(index, day))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WeatherReport {
            location: ReportLocation {
                name: response.location.name.clone(),
                region: response.location.region.clone(),
                country: response.location.country.clone(),
                timezone,
                localtime_epoch: response.location.localtime_epoch,
            },
            current: Self::map_current(&response.current),
            daily,
            alerts: response.alerts.alert.iter().map(Self::map_alert).collect(),
            forecast: response.to_dataset()?,
        })
    }
}

#[async_trait]
impl WeatherPort for WeatherAdapter {
    #[instrument(skip(self, location), fields(location = %location))]
    async fn get_forecast(
        &self,
        location: &LocationQuery,
        days: u8,
    ) -> Result<WeatherReport, ApplicationError> {
        let result = self
            .client
            .get_forecast(location.as_str(), days)
            .await
            .map_err(Self::map_error);

        match &result {
            Ok(response) => {
                debug!(
                    resolved = %response.location.name,
                    days = response.forecast.forecastday.len(),
                    "Retrieved weather forecast"
                );
            },
            Err(e) => {
                debug!(error = %e, "Failed to get weather forecast");
            },
        }

        Self::map_report(&result?)
    }

    #[instrument(skip(self))]
    async fn is_available(&self) -> bool {
        self.client.is_healthy().await
    }
}
