//! Weather dashboard CLI
//!
//! Fetches a forecast for a location and renders the dashboard HTML, or
//! prints the upcoming seven hours.

#![allow(clippy::print_stdout)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use application::{Dashboard, DashboardService, DisplayUnits, HourlySlot};
use clap::{Parser, Subcommand};
use infrastructure::{AppConfig, TemplateEngine, WeatherAdapter};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Weather dashboard CLI
#[derive(Parser)]
#[command(name = "weather-dashboard")]
#[command(author, version, about = "Weather dashboard renderer", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, global = true, env = "WEATHER_DASHBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Unit system (imperial or metric), overrides the configuration
    #[arg(long, global = true)]
    units: Option<DisplayUnits>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the dashboard HTML for a location
    ///
    /// Example: weather-dashboard forecast "London" --output dashboard.html
    Forecast {
        /// Location (city, postcode, "lat,lon", ...)
        location: String,

        /// Write the HTML to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of forecast days (default: from configuration)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(2..=14))]
        days: Option<u8>,
    },

    /// Print the next seven hours for a location
    Hourly {
        /// Location (city, postcode, "lat,lon", ...)
        location: String,

        /// Print JSON instead of text lines
        #[arg(long)]
        json: bool,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Format one hourly slot as a text line
fn hourly_line(slot: &HourlySlot, units: DisplayUnits) -> String {
    format!(
        "{:>8}  {:>4}{}  {}",
        slot.label,
        slot.temperature,
        units.temperature_label(),
        slot.text
    )
}

/// Wire the weather adapter into a dashboard service
fn dashboard_service(
    config: &AppConfig,
    days: Option<u8>,
    units: DisplayUnits,
) -> anyhow::Result<DashboardService> {
    let client_config = config
        .weather
        .to_client_config()
        .context("Weather API key is not configured")?;
    let adapter = WeatherAdapter::with_config(client_config)?;

    Ok(DashboardService::new(Arc::new(adapter))
        .with_forecast_days(days.unwrap_or(config.weather.forecast_days))
        .with_units(units))
}

/// Write rendered HTML to a file
fn write_output(path: &Path, html: &str) -> anyhow::Result<()> {
    std::fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = html.len(), "Dashboard written");
    Ok(())
}

async fn forecast(
    config: &AppConfig,
    units: DisplayUnits,
    location: &str,
    output: Option<&Path>,
    days: Option<u8>,
) -> anyhow::Result<()> {
    // Fail on template problems before spending a request
    let engine = TemplateEngine::with_config(config.templates.clone())?;
    let service = dashboard_service(config, days, units)?;

    let dashboard: Dashboard = service.build(location).await?;
    let html = engine.render_dashboard(&dashboard)?;

    match output {
        Some(path) => write_output(path, &html)?,
        None => println!("{html}"),
    }
    Ok(())
}

async fn hourly(
    config: &AppConfig,
    units: DisplayUnits,
    location: &str,
    json: bool,
) -> anyhow::Result<()> {
    let service = dashboard_service(config, None, units)?;
    let dashboard = service.build(location).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard.hourly)?);
    } else {
        println!(
            "{}, {}, {}",
            dashboard.location.name, dashboard.location.region, dashboard.location.country
        );
        for slot in &dashboard.hourly {
            println!("{}", hourly_line(slot, units));
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load_from(cli.config.as_deref())?;
    let units = cli.units.unwrap_or(config.display.units);

    match cli.command {
        Commands::Forecast {
            location,
            output,
            days,
        } => forecast(&config, units, &location, output.as_deref(), days).await,
        Commands::Hourly { location, json } => hourly(&config, units, &location, json).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        error!(error = %e, "Command failed");
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_verbosity_zero() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
    }

    #[test]
    fn log_filter_verbosity_one() {
        assert_eq!(log_filter_from_verbosity(1), "info");
    }

    #[test]
    fn log_filter_verbosity_two() {
        assert_eq!(log_filter_from_verbosity(2), "debug");
    }

    #[test]
    fn log_filter_verbosity_three_or_more() {
        assert_eq!(log_filter_from_verbosity(3), "trace");
        assert_eq!(log_filter_from_verbosity(10), "trace");
    }

    #[test]
    fn hourly_line_aligns_columns() {
        let slot = HourlySlot {
            label: "3:00 PM".to_string(),
            timestamp: 0,
            temperature: 41,
            icon: String::new(),
            text: "Light rain".to_string(),
        };
        assert_eq!(
            hourly_line(&slot, DisplayUnits::Imperial),
            " 3:00 PM    41°F  Light rain"
        );
        assert_eq!(
            hourly_line(&slot, DisplayUnits::Metric),
            " 3:00 PM    41°C  Light rain"
        );
    }

    #[test]
    fn cli_parses_forecast_with_options() {
        let cli = Cli::try_parse_from([
            "weather-dashboard",
            "forecast",
            "New York",
            "--output",
            "out.html",
            "--days",
            "5",
            "--units",
            "metric",
        ])
        .unwrap();
        assert_eq!(cli.units, Some(DisplayUnits::Metric));
        match cli.command {
            Commands::Forecast {
                location,
                output,
                days,
            } => {
                assert_eq!(location, "New York");
                assert_eq!(output, Some(PathBuf::from("out.html")));
                assert_eq!(days, Some(5));
            },
            Commands::Hourly { .. } => unreachable!("Expected Forecast command"),
        }
    }

    #[test]
    fn cli_rejects_single_day_forecast() {
        assert!(Cli::try_parse_from(["weather-dashboard", "forecast", "Paris", "--days", "1"]).is_err());
    }

    #[test]
    fn cli_config_is_global() {
        let cli = Cli::try_parse_from([
            "weather-dashboard",
            "hourly",
            "Paris",
            "--json",
            "--config",
            "dashboard.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("dashboard.toml")));
        assert!(matches!(cli.command, Commands::Hourly { json: true, .. }));
    }

    #[test]
    fn service_requires_api_key() {
        let mut config = AppConfig::default();
        config.weather.api_key_file = PathBuf::from("/nonexistent/api-key.txt");
        assert!(dashboard_service(&config, None, DisplayUnits::Imperial).is_err());
    }

    #[test]
    fn write_output_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.html");
        write_output(&path, "<div></div>").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<div></div>");
    }
}
