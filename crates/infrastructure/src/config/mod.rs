//! Application configuration
//!
//! Values are layered: built-in defaults, then an optional `config.toml`
//! (or an explicit file), then `WEATHER_DASHBOARD_*` environment variables
//! with `__` separating nested keys, e.g. `WEATHER_DASHBOARD_WEATHER__API_KEY`.

mod weather;

use std::path::{Path, PathBuf};

use application::DisplayUnits;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use weather::WeatherAppConfig;

use crate::templates::TemplateConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "WEATHER_DASHBOARD";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sources could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A loaded value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// No API key configured and the key file is missing or empty
    #[error("No API key configured and {} is missing or empty", .0.display())]
    MissingApiKey(PathBuf),

    /// The key file exists but could not be read
    #[error("Failed to read API key file {}: {source}", path.display())]
    KeyFile {
        /// Key file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Display settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Unit system for rendered values
    #[serde(default)]
    pub units: DisplayUnits,
}

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherAppConfig,

    /// Template engine settings
    #[serde(default)]
    pub templates: TemplateConfig,

    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if a source is malformed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of the default file
    ///
    /// An explicit path must exist; the default `config.toml` is optional.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if the file is missing or a source is
    /// malformed, and `ConfigError::Invalid` if a value is out of range.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = path.map_or_else(
            || config::File::with_name("config").required(false),
            |path| config::File::from(path).required(true),
        );

        let config = config::Config::builder()
            .add_source(file)
            // Override with environment variables (e.g., WEATHER_DASHBOARD_WEATHER__FORECAST_DAYS)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.weather.validate()?;
        debug!(
            base_url = %loaded.weather.base_url,
            forecast_days = loaded.weather.forecast_days,
            units = ?loaded.display.units,
            "Configuration loaded"
        );
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.weather.forecast_days, 3);
        assert_eq!(config.display.units, DisplayUnits::Imperial);
        assert!(config.templates.use_embedded_fallback);
    }

    #[test]
    fn loads_explicit_file() {
        let file = write_config(
            r#"
[weather]
api_key = "from-toml"
forecast_days = 2
include_alerts = false

[display]
units = "metric"
"#,
        );

        let config = AppConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.weather.forecast_days, 2);
        assert!(!config.weather.include_alerts);
        assert_eq!(config.display.units, DisplayUnits::Metric);
        assert_eq!(
            config.weather.resolve_api_key().unwrap().expose_secret(),
            "from-toml"
        );
        // Unset keys keep their defaults
        assert_eq!(config.weather.api_host, "weatherapi-com.p.rapidapi.com");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = AppConfig::load_from(Some(Path::new("/nonexistent/dashboard.toml")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn single_forecast_day_is_rejected() {
        let file = write_config("[weather]\nforecast_days = 1\n");
        let result = AppConfig::load_from(Some(file.path()));
        match result {
            Err(ConfigError::Invalid(message)) => assert!(message.contains("forecast_days")),
            other => panic!("Expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn invalid_units_are_rejected() {
        let file = write_config("[display]\nunits = \"kelvin\"\n");
        assert!(AppConfig::load_from(Some(file.path())).is_err());
    }

    #[test]
    fn serialization_skips_api_key() {
        let mut config = AppConfig::default();
        config.weather.api_key = Some("hidden".to_string().into());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hidden"));
    }

    #[test]
    fn error_messages_name_the_file() {
        let err = ConfigError::MissingApiKey(PathBuf::from("api-key.txt"));
        assert!(err.to_string().contains("api-key.txt"));
    }
}
