//! Infrastructure layer - Adapters for external systems
//!
//! Implements the weather port over the weatherapi.com client, loads
//! layered configuration and renders dashboards with Tera templates.

pub mod adapters;
pub mod config;
pub mod templates;

pub use adapters::*;
pub use config::{AppConfig, ConfigError, DisplayConfig, WeatherAppConfig};
pub use templates::{DashboardSection, TemplateConfig, TemplateContext, TemplateEngine, TemplateError};
