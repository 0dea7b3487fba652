//! Integration tests for CLI
//!
//! These tests verify CLI functionality without running actual commands,
//! but instead test the command parsing and structure.

#![allow(clippy::panic)] // Allow panic! in tests for clear failure messages

use std::ffi::OsString;
use std::path::PathBuf;

use application::DisplayUnits;
use clap::Parser;

// Mock CLI structure for testing (mirrors main.rs)
#[derive(Parser)]
#[command(name = "weather-dashboard")]
#[command(author, version, about = "Weather dashboard renderer", long_about = None)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    units: Option<DisplayUnits>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    Forecast {
        location: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(2..=14))]
        days: Option<u8>,
    },
    Hourly {
        location: String,
        #[arg(long)]
        json: bool,
    },
}

fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
    let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
    Cli::try_parse_from(os_args)
}

#[test]
fn cli_parses_forecast_command() {
    let cli = parse_args(&["weather-dashboard", "forecast", "London"]).unwrap();
    if let Commands::Forecast {
        location,
        output,
        days,
    } = cli.command
    {
        assert_eq!(location, "London");
        assert!(output.is_none());
        assert!(days.is_none());
    } else {
        panic!("Expected Forecast command");
    }
}

#[test]
fn cli_parses_forecast_with_short_flags() {
    let cli = parse_args(&[
        "weather-dashboard",
        "forecast",
        "90210",
        "-o",
        "dashboard.html",
        "-d",
        "3",
    ])
    .unwrap();
    if let Commands::Forecast { output, days, .. } = cli.command {
        assert_eq!(output, Some(PathBuf::from("dashboard.html")));
        assert_eq!(days, Some(3));
    } else {
        panic!("Expected Forecast command");
    }
}

#[test]
fn cli_keeps_location_text_verbatim() {
    let cli = parse_args(&["weather-dashboard", "forecast", "  48.85,2.35 "]).unwrap();
    if let Commands::Forecast { location, .. } = cli.command {
        assert_eq!(location, "  48.85,2.35 ");
    } else {
        panic!("Expected Forecast command");
    }
}

#[test]
fn cli_rejects_out_of_range_days() {
    assert!(parse_args(&["weather-dashboard", "forecast", "London", "--days", "1"]).is_err());
    assert!(parse_args(&["weather-dashboard", "forecast", "London", "--days", "15"]).is_err());
    assert!(parse_args(&["weather-dashboard", "forecast", "London", "--days", "x"]).is_err());
}

#[test]
fn cli_parses_hourly_command() {
    let cli = parse_args(&["weather-dashboard", "hourly", "Tokyo"]).unwrap();
    if let Commands::Hourly { location, json } = cli.command {
        assert_eq!(location, "Tokyo");
        assert!(!json);
    } else {
        panic!("Expected Hourly command");
    }
}

#[test]
fn cli_parses_hourly_json() {
    let cli = parse_args(&["weather-dashboard", "hourly", "Tokyo", "--json"]).unwrap();
    assert!(matches!(cli.command, Commands::Hourly { json: true, .. }));
}

#[test]
fn cli_requires_location() {
    assert!(parse_args(&["weather-dashboard", "forecast"]).is_err());
    assert!(parse_args(&["weather-dashboard", "hourly"]).is_err());
}

#[test]
fn cli_requires_subcommand() {
    assert!(parse_args(&["weather-dashboard"]).is_err());
}

#[test]
fn cli_rejects_unknown_command() {
    assert!(parse_args(&["weather-dashboard", "status"]).is_err());
}

#[test]
fn cli_verbosity_counts() {
    let cli = parse_args(&["weather-dashboard", "-vvv", "hourly", "Oslo"]).unwrap();
    assert_eq!(cli.verbose, 3);

    let cli = parse_args(&["weather-dashboard", "hourly", "Oslo"]).unwrap();
    assert_eq!(cli.verbose, 0);
}

#[test]
fn cli_global_options_after_subcommand() {
    let cli = parse_args(&[
        "weather-dashboard",
        "forecast",
        "Oslo",
        "--config",
        "custom.toml",
        "--units",
        "metric",
    ])
    .unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    assert_eq!(cli.units, Some(DisplayUnits::Metric));
}

#[test]
fn cli_rejects_unknown_units() {
    let result = parse_args(&["weather-dashboard", "--units", "kelvin", "hourly", "Oslo"]);
    let err = result.err().unwrap();
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}

#[test]
fn cli_help_is_available() {
    let err = parse_args(&["weather-dashboard", "--help"]).err().unwrap();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}
