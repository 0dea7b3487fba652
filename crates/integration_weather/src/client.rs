//! weatherapi.com client
//!
//! HTTP client for the weatherapi.com forecast endpoint, reached through
//! RapidAPI.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::models::{ApiErrorResponse, ForecastResponse};

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// API key missing or rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The provider could not resolve the location
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherApiConfig {
    /// API base URL (default: <https://weatherapi-com.p.rapidapi.com>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value of the `X-RapidAPI-Host` header
    #[serde(default = "default_api_host")]
    pub api_host: String,

    /// Value of the `X-RapidAPI-Key` header
    #[serde(skip_serializing, default = "empty_secret")]
    pub api_key: SecretString,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Ask the provider for weather alerts (default: true)
    #[serde(default = "default_include_alerts")]
    pub include_alerts: bool,
}

fn default_base_url() -> String {
    "https://weatherapi-com.p.rapidapi.com".to_string()
}

fn default_api_host() -> String {
    "weatherapi-com.p.rapidapi.com".to_string()
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

const fn default_timeout() -> u64 {
    30
}

const fn default_include_alerts() -> bool {
    true
}

impl Default for WeatherApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_host: default_api_host(),
            api_key: empty_secret(),
            timeout_secs: default_timeout(),
            include_alerts: default_include_alerts(),
        }
    }
}

impl WeatherApiConfig {
    /// Default configuration with the given API key
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            ..Self::default()
        }
    }
}

/// Weather client trait for fetching weather data
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Get the forecast for a free-text location
    async fn get_forecast(&self, location: &str, days: u8)
    -> Result<ForecastResponse, WeatherError>;

    /// Check if the weather service is healthy
    async fn is_healthy(&self) -> bool;
}

/// weatherapi.com HTTP client implementation
#[derive(Debug)]
pub struct WeatherApiClient {
    client: Client,
    config: WeatherApiConfig,
}

impl WeatherApiClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherApiConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Build the forecast endpoint URL
    fn forecast_url(&self) -> String {
        format!("{}/forecast.json", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the query parameters for a forecast request
    fn forecast_query(&self, location: &str, days: u8) -> [(&'static str, String); 3] {
        let days = days.clamp(1, 14);
        let alerts = if self.config.include_alerts { "yes" } else { "no" };
        [
            ("q", location.to_string()),
            ("days", days.to_string()),
            ("alerts", alerts.to_string()),
        ]
    }

    /// Map a non-success response to an error
    fn status_error(status: reqwest::StatusCode, body: &str) -> WeatherError {
        let message = serde_json::from_str::<ApiErrorResponse>(body).map_or_else(
            |_| format!("HTTP {status}"),
            |e| format!("{} (code {})", e.error.message, e.error.code),
        );

        match status {
            reqwest::StatusCode::TOO_MANY_REQUESTS => WeatherError::RateLimitExceeded,
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                WeatherError::Unauthorized(message)
            },
            reqwest::StatusCode::BAD_REQUEST => WeatherError::LocationNotFound(message),
            s if s.is_server_error() => WeatherError::ServiceUnavailable(message),
            _ => WeatherError::RequestFailed(message),
        }
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    #[instrument(skip(self), fields(days = %days))]
    async fn get_forecast(
        &self,
        location: &str,
        days: u8,
    ) -> Result<ForecastResponse, WeatherError> {
        let url = self.forecast_url();
        debug!(url = %url, "Fetching weather forecast");

        if self.config.api_key.expose_secret().is_empty() {
            warn!("No API key configured; the provider will likely reject the request");
        }

        let response = self
            .client
            .get(&url)
            .query(&self.forecast_query(location, days))
            .header("X-RapidAPI-Key", self.config.api_key.expose_secret())
            .header("X-RapidAPI-Host", &self.config.api_host)
            .send()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status, &body));
        }

        let forecast: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        debug!(
            location = %forecast.location.name,
            days = forecast.forecast.forecastday.len(),
            alerts = forecast.alerts.alert.len(),
            "Received weather forecast"
        );

        Ok(forecast)
    }

    async fn is_healthy(&self) -> bool {
        // Simple health check using a well-known location
        self.get_forecast("London", 1).await.is_ok()
    }
}
