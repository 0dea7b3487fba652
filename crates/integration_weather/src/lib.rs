//! weatherapi.com weather integration
//!
//! Client for the weatherapi.com forecast API (<https://www.weatherapi.com>),
//! reached through RapidAPI. Provides current conditions, daily summaries,
//! hourly forecasts and alerts for a free-text location.

pub mod client;
mod models;

pub use client::{WeatherApiClient, WeatherApiConfig, WeatherClient, WeatherError};
pub use models::{
    Alert, Alerts, Astro, Condition, CurrentData, DayData, ForecastData, ForecastDayData,
    ForecastResponse, HourData, Location,
};
