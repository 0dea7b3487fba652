//! Weather provider configuration and API key loading.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use integration_weather::WeatherApiConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Accepted forecast lengths; the hourly window may reach into tomorrow
const FORECAST_DAYS_RANGE: RangeInclusive<u8> = 2..=14;

use super::ConfigError;

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherAppConfig {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// RapidAPI host header value
    #[serde(default = "default_api_host")]
    pub api_host: String,

    /// API key (takes precedence over `api_key_file`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// File holding the API key
    #[serde(default = "default_api_key_file")]
    pub api_key_file: PathBuf,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Number of forecast days requested
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    /// Request weather alerts
    #[serde(default = "super::default_true")]
    pub include_alerts: bool,
}

fn default_base_url() -> String {
    "https://weatherapi-com.p.rapidapi.com".to_string()
}

fn default_api_host() -> String {
    "weatherapi-com.p.rapidapi.com".to_string()
}

fn default_api_key_file() -> PathBuf {
    PathBuf::from("api-key.txt")
}

const fn default_timeout() -> u64 {
    30
}

const fn default_forecast_days() -> u8 {
    3
}

impl Default for WeatherAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_host: default_api_host(),
            api_key: None,
            api_key_file: default_api_key_file(),
            timeout_secs: default_timeout(),
            forecast_days: default_forecast_days(),
            include_alerts: true,
        }
    }
}

impl WeatherAppConfig {
    /// Check values the provider would accept but the dashboard cannot use
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `forecast_days` is outside 2..=14.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !FORECAST_DAYS_RANGE.contains(&self.forecast_days) {
            return Err(ConfigError::Invalid(format!(
                "weather.forecast_days must be between {} and {}, got {}",
                FORECAST_DAYS_RANGE.start(),
                FORECAST_DAYS_RANGE.end(),
                self.forecast_days
            )));
        }
        Ok(())
    }

    /// Resolve the API key from configuration or the key file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::KeyFile` if the key file exists but cannot be
    /// read, and `ConfigError::MissingApiKey` if no non-empty key is found.
    pub fn resolve_api_key(&self) -> Result<SecretString, ConfigError> {
        if let Some(key) = &self.api_key {
            let trimmed = key.expose_secret().trim();
            if !trimmed.is_empty() {
                debug!("Using API key from configuration");
                return Ok(SecretString::from(trimmed.to_string()));
            }
        }
        read_key_file(&self.api_key_file)
    }

    /// Build the client configuration, resolving the API key
    ///
    /// # Errors
    ///
    /// Propagates API key resolution errors.
    pub fn to_client_config(&self) -> Result<WeatherApiConfig, ConfigError> {
        Ok(WeatherApiConfig {
            base_url: self.base_url.clone(),
            api_host: self.api_host.clone(),
            api_key: self.resolve_api_key()?,
            timeout_secs: self.timeout_secs,
            include_alerts: self.include_alerts,
        })
    }
}

/// Read the first non-empty line of a key file
fn read_key_file(path: &Path) -> Result<SecretString, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingApiKey(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::KeyFile {
        path: path.to_path_buf(),
        source,
    })?;

    let Some(key) = contents.lines().map(str::trim).find(|line| !line.is_empty()) else {
        return Err(ConfigError::MissingApiKey(path.to_path_buf()));
    };

    debug!(path = %path.display(), "Loaded API key from file");
    Ok(SecretString::from(key.to_string()))
}
