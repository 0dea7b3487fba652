//! Template engine for the weather dashboard
//!
//! Renders a [`Dashboard`] view model to HTML using Tera. The dashboard is
//! split into sections (current conditions, hourly forecast, daily
//! forecast) that can be rendered together or one at a time.
//!
//! # Template Locations
//!
//! Templates can be loaded from:
//! - Embedded templates (compile-time)
//! - File system (runtime, configurable); files override embedded
//!   templates with the same name, e.g. `<dir>/dashboard/hourly.html`
//!
//! # Example
//!
//! ```rust,ignore
//! use infrastructure::templates::TemplateEngine;
//!
//! let engine = TemplateEngine::new()?;
//! let html = engine.render_dashboard(&dashboard)?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use application::Dashboard;
use serde::{Deserialize, Serialize};
use tera::{Context, Tera, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::default_true;

/// Error type for template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template not found
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Template rendering failed
    #[error("Template rendering failed: {0}")]
    Render(String),

    /// Template compilation failed
    #[error("Template compilation failed: {0}")]
    Compile(String),
}

impl From<tera::Error> for TemplateError {
    fn from(e: tera::Error) -> Self {
        match e.kind {
            tera::ErrorKind::TemplateNotFound(name) => Self::NotFound(name),
            _ => Self::Render(render_chain(&e)),
        }
    }
}

/// Tera nests the useful message in the error source chain
fn render_chain(e: &tera::Error) -> String {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

/// Template context wrapper for type-safe context building
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    inner: Context,
}

impl TemplateContext {
    /// Create a new empty template context
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Context::new(),
        }
    }

    /// Insert a value into the context
    pub fn insert<T: Serialize>(&mut self, key: &str, value: &T) {
        self.inner.insert(key, value);
    }

    /// Build the context for a dashboard render
    #[must_use]
    pub fn for_dashboard(dashboard: &Dashboard) -> Self {
        let mut ctx = Self::new();
        ctx.insert("location", &dashboard.location);
        ctx.insert("current", &dashboard.current);
        ctx.insert("hourly", &dashboard.hourly);
        ctx.insert("daily", &dashboard.daily);
        ctx.insert("units", &dashboard.units);
        ctx.insert(
            "background",
            &BackgroundData {
                image: dashboard.background.image_path(),
                fallback: dashboard.background.fallback_path(),
                is_day: dashboard.background.is_day,
            },
        );
        ctx
    }
}

/// Background image paths as seen by templates
#[derive(Debug, Clone, Serialize)]
struct BackgroundData {
    image: String,
    fallback: String,
    is_day: bool,
}

/// Renderable dashboard sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardSection {
    /// Location header and current conditions
    Current,
    /// Seven-hour forecast strip
    Hourly,
    /// Day-by-day forecast
    Daily,
}

impl DashboardSection {
    /// Template rendering this section
    #[must_use]
    pub const fn template_name(self) -> &'static str {
        match self {
            Self::Current => "dashboard/current.html",
            Self::Hourly => "dashboard/hourly.html",
            Self::Daily => "dashboard/daily.html",
        }
    }
}

/// Template engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Path to custom templates directory (optional)
    #[serde(default)]
    pub templates_dir: Option<String>,

    /// Whether to use embedded templates as fallback
    #[serde(default = "default_true")]
    pub use_embedded_fallback: bool,

    /// Whether to auto-escape HTML by default
    #[serde(default = "default_true")]
    pub auto_escape: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            templates_dir: None,
            use_embedded_fallback: true,
            auto_escape: true,
        }
    }
}

/// Embedded templates - compiled into the binary
mod embedded {
    pub const PAGE: &str = r#"<div class="row mx-auto my-4 text-shadow">
  <div class="col currentWeather text-white px-0">
{% include "dashboard/current.html" %}
{% include "dashboard/hourly.html" %}
{% include "dashboard/daily.html" %}
  </div>
</div>
"#;

    pub const BACKGROUND: &str = r#"data-daytime="{{ background.is_day }}" style="background-image: url('{{ background.image | safe }}'), url('{{ background.fallback | safe }}'); background-position: 100%; background-size: cover;""#;

    pub const CURRENT: &str = r#"<section class="card rounded dashboard-background" {% include "dashboard/background.html" %}>
  <section class="card-header currentWeather-header rounded-top fs-3 fw-bold">
    {{ location.name }}, {{ location.region }}, {{ location.country }}
    <p class="fs-6 fw-normal mb-2">Last Update: {{ location.last_updated }}</p>
  </section>
  <section class="card-body d-flex flex-column text-center">
    <h1 class="m-0">{{ location.name }}</h1>
    <h1 class="h1-currentWeather fw-light">{{ current.temperature | degrees }}</h1>
    <h3 class="text-capitalize mb-0">{{ current.condition_text }}
      <img src="{{ current.condition_icon }}" width="64" height="64" alt="{{ current.condition_text }}">
    </h3>
{% if current.alert %}
    <div class="d-flex justify-content-center fs-6">
      <i class="my-2 alert alert-warning bi bi-exclamation-triangle-fill"> {{ current.alert }}</i>
    </div>
{% endif %}
    <div class="d-flex justify-content-center fs-5">
      <span class="mx-2"><i class="bi bi-sunrise"></i> {{ current.sunrise }}</span>
      <span class="mx-2"><i class="bi bi-sunset"></i> {{ current.sunset }}</span>
    </div>
  </section>
  <section class="card-footer d-flex justify-content-around text-center rounded-bottom">
    <div><p class="mb-0">High | Low</p><p class="fs-5 mb-0">{{ current.high | degrees }} | {{ current.low | degrees }}</p></div>
    <div><p class="mb-0">Wind</p><p class="fs-5 mb-0">{{ current.wind }}</p></div>
    <div><p class="mb-0">Humidity</p><p class="fs-5 mb-0">{{ current.humidity }}%</p></div>
    <div><p class="mb-0">Precipitation</p><p class="fs-5 mb-0">{{ current.precipitation }}</p></div>
  </section>
</section>
"#;

    pub const HOURLY: &str = r#"<section class="card weatherForecast my-4" {% include "dashboard/background.html" %}>
  <section class="card-header p-3"><h2 class="m-0">Hourly Forecast</h2></section>
  <section class="card-body d-flex flex-row weatherForecast text-white pt-0 pb-3 px-2">
{% for hour in hourly %}
    <div class="card align-items-center text-center mx-2" data-timestamp="{{ hour.timestamp }}">
      <p class="fs-5 m-0"><b>{{ hour.label }}</b></p>
      <p class="fs-1 mt-2 mb-0">{{ hour.temperature | degrees }}</p>
      <img src="{{ hour.icon }}" width="64" height="64" alt="{{ hour.text }}">
      <p class="text-capitalize text-wrap mb-2">{{ hour.text }}</p>
    </div>
{% endfor %}
  </section>
</section>
"#;

    pub const DAILY: &str = r#"<section class="card weatherForecast my-4" {% include "dashboard/background.html" %}>
  <section class="card-header p-3"><h2 class="m-0">{{ daily | length }}-Day Forecast</h2></section>
  <section class="card-body d-flex flex-row weatherForecast text-white pt-0 pb-3 px-2">
{% for day in daily %}
    <div class="card align-items-center text-center mx-2">
      <p class="fs-5 m-0"><b>{{ day.label }}</b></p>
      <p class="fs-4 mt-2 mb-0">{{ day.high | degrees }} | {{ day.low | degrees }}</p>
      <img src="{{ day.icon }}" width="64" height="64" alt="{{ day.text }}">
      <p class="text-capitalize text-wrap mb-2">{{ day.text }}</p>
    </div>
{% endfor %}
  </section>
</section>
"#;
}

const EMBEDDED: [(&str, &str); 5] = [
    ("dashboard/page.html", embedded::PAGE),
    ("dashboard/background.html", embedded::BACKGROUND),
    ("dashboard/current.html", embedded::CURRENT),
    ("dashboard/hourly.html", embedded::HOURLY),
    ("dashboard/daily.html", embedded::DAILY),
];

/// Template engine using Tera
#[derive(Clone)]
pub struct TemplateEngine {
    tera: Arc<Tera>,
    config: TemplateConfig,
}

impl fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TemplateEngine {
    /// Create a new template engine with default configuration
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Compile` if an embedded template is invalid.
    pub fn new() -> Result<Self, TemplateError> {
        Self::with_config(TemplateConfig::default())
    }

    /// Create a new template engine with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Compile` if a template fails to parse and
    /// embedded fallback is disabled.
    pub fn with_config(config: TemplateConfig) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(EMBEDDED)
            .map_err(|e| TemplateError::Compile(render_chain(&e)))?;

        if let Some(ref dir) = config.templates_dir {
            if Path::new(dir).exists() {
                match load_custom(dir, &tera) {
                    Ok(merged) => {
                        info!(dir = %dir, "Loaded custom templates");
                        tera = merged;
                    },
                    Err(e) => {
                        if !config.use_embedded_fallback {
                            return Err(e);
                        }
                        warn!(error = %e, "Custom templates failed to load, using embedded");
                    },
                }
            } else {
                warn!(dir = %dir, "Templates directory does not exist, using embedded");
            }
        }

        // Set auto-escape based on config
        tera.autoescape_on(if config.auto_escape {
            vec![".html", ".htm", ".xml"]
        } else {
            vec![]
        });

        tera.register_filter("degrees", degrees_filter);

        Ok(Self {
            tera: Arc::new(tera),
            config,
        })
    }

    /// Render a template with the given context
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::NotFound` for unknown templates and
    /// `TemplateError::Render` if rendering fails.
    pub fn render(
        &self,
        template_name: &str,
        context: &TemplateContext,
    ) -> Result<String, TemplateError> {
        self.tera
            .render(template_name, &context.inner)
            .map_err(TemplateError::from)
    }

    /// Render the complete dashboard
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render_dashboard(&self, dashboard: &Dashboard) -> Result<String, TemplateError> {
        debug!(
            location = %dashboard.location.name,
            hours = dashboard.hourly.len(),
            days = dashboard.daily.len(),
            "Rendering dashboard"
        );
        self.render(
            "dashboard/page.html",
            &TemplateContext::for_dashboard(dashboard),
        )
    }

    /// Render one dashboard section
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render_section(
        &self,
        section: DashboardSection,
        dashboard: &Dashboard,
    ) -> Result<String, TemplateError> {
        self.render(
            section.template_name(),
            &TemplateContext::for_dashboard(dashboard),
        )
    }
}

/// Parse `dir` and layer its templates over `embedded`
fn load_custom(dir: &str, embedded: &Tera) -> Result<Tera, TemplateError> {
    let pattern = format!("{}/**/*", dir.trim_end_matches('/'));
    let mut custom = Tera::parse(&pattern).map_err(|e| TemplateError::Compile(render_chain(&e)))?;
    for name in custom.get_template_names() {
        debug!(template = %name, "Loaded custom template");
    }
    // Templates already in `custom` take precedence
    custom
        .extend(embedded)
        .map_err(|e| TemplateError::Compile(render_chain(&e)))?;
    custom
        .build_inheritance_chains()
        .map_err(|e| TemplateError::Compile(render_chain(&e)))?;
    Ok(custom)
}

/// Custom filter: append a degree sign
fn degrees_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let number = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => return Err(tera::Error::msg("degrees requires a number")),
    };
    Ok(Value::String(format!("{number}°")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use application::{
        Background, CurrentPanel, DailySlot, DisplayUnits, HourlySlot, LocationHeader,
    };

    fn dashboard() -> Dashboard {
        Dashboard {
            location: LocationHeader {
                name: "London".to_string(),
                region: "City of London, Greater London".to_string(),
                country: "United Kingdom".to_string(),
                last_updated: "2024-01-15 14:45".to_string(),
            },
            current: CurrentPanel {
                temperature: 41,
                condition_text: "Overcast".to_string(),
                condition_icon: "https://cdn.weatherapi.com/weather/64x64/day/122.png"
                    .to_string(),
                high: 44,
                low: 35,
                wind: "8 mph, SW".to_string(),
                humidity: 81,
                precipitation: "0.02 in".to_string(),
                sunrise: "07:58 AM".to_string(),
                sunset: "04:21 PM".to_string(),
                alert: Some("Flood Warning".to_string()),
            },
            background: Background {
                is_day: true,
                condition_code: 1009,
            },
            hourly: (0..7)
                .map(|i| HourlySlot {
                    label: format!("{}:00 PM", i + 3),
                    timestamp: 1_705_330_800 + i * 3600,
                    temperature: 40 - i,
                    icon: "https://cdn.weatherapi.com/weather/64x64/day/122.png".to_string(),
                    text: format!("Hour {i}"),
                })
                .collect(),
            daily: vec![
                DailySlot {
                    label: "15 Mon".to_string(),
                    high: 44,
                    low: 35,
                    icon: "https://cdn.weatherapi.com/weather/64x64/day/122.png".to_string(),
                    text: "Overcast".to_string(),
                },
                DailySlot {
                    label: "16 Tue".to_string(),
                    high: 40,
                    low: 30,
                    icon: "https://cdn.weatherapi.com/weather/64x64/day/113.png".to_string(),
                    text: "Sunny".to_string(),
                },
                DailySlot {
                    label: "17 Wed".to_string(),
                    high: 38,
                    low: 29,
                    icon: "https://cdn.weatherapi.com/weather/64x64/day/116.png".to_string(),
                    text: "Partly cloudy".to_string(),
                },
            ],
            units: DisplayUnits::Imperial,
        }
    }

    #[test]
    fn engine_loads_embedded_templates() {
        let engine = TemplateEngine::new().unwrap();
        let context = TemplateContext::for_dashboard(&dashboard());
        for name in [
            "dashboard/page.html",
            "dashboard/background.html",
            "dashboard/current.html",
            "dashboard/hourly.html",
            "dashboard/daily.html",
        ] {
            assert!(engine.render(name, &context).is_ok(), "missing {name}");
        }
    }

    #[test]
    fn dashboard_contains_all_sections() {
        let engine = TemplateEngine::new().unwrap();
        let html = engine.render_dashboard(&dashboard()).unwrap();

        assert!(html.contains("London, City of London, Greater London, United Kingdom"));
        assert!(html.contains("Last Update: 2024-01-15 14:45"));
        assert!(html.contains("41°"));
        assert!(html.contains("44° | 35°"));
        assert!(html.contains("8 mph, SW"));
        assert!(html.contains("81%"));
        assert!(html.contains("0.02 in"));
        assert!(html.contains("07:58 AM"));
        assert!(html.contains("Flood Warning"));
        assert!(html.contains("Hourly Forecast"));
        assert!(html.contains("3-Day Forecast"));
        assert!(html.contains("16 Tue"));
    }

    #[test]
    fn hourly_section_renders_seven_cards_in_order() {
        let engine = TemplateEngine::new().unwrap();
        let html = engine
            .render_section(DashboardSection::Hourly, &dashboard())
            .unwrap();

        assert_eq!(html.matches("data-timestamp=").count(), 7);
        let first = html.find("Hour 0").unwrap();
        let last = html.find("Hour 6").unwrap();
        assert!(first < last);
        assert!(html.contains("3:00 PM"));
        assert!(html.contains("9:00 PM"));
    }

    #[test]
    fn background_uses_condition_and_fallback_images() {
        let engine = TemplateEngine::new().unwrap();
        let html = engine
            .render_section(DashboardSection::Current, &dashboard())
            .unwrap();

        assert!(html.contains("url('/assets/background/1/1009.png')"));
        assert!(html.contains("url('/assets/background/1/default.png')"));
    }

    #[test]
    fn forecast_cards_share_the_background() {
        let engine = TemplateEngine::new().unwrap();
        for section in [DashboardSection::Hourly, DashboardSection::Daily] {
            let html = engine.render_section(section, &dashboard()).unwrap();
            assert!(
                html.contains(r#"data-daytime="true""#),
                "{section:?} lacks daytime flag"
            );
            assert!(html.contains("url('/assets/background/1/1009.png')"));
        }

        let page = engine.render_dashboard(&dashboard()).unwrap();
        assert_eq!(page.matches("url('/assets/background/1/1009.png')").count(), 3);
    }

    #[test]
    fn alert_is_omitted_when_absent() {
        let engine = TemplateEngine::new().unwrap();
        let mut data = dashboard();
        data.current.alert = None;

        let html = engine
            .render_section(DashboardSection::Current, &data)
            .unwrap();
        assert!(!html.contains("alert-warning"));
    }

    #[test]
    fn provider_text_is_escaped() {
        let engine = TemplateEngine::new().unwrap();
        let mut data = dashboard();
        data.current.condition_text = "<script>alert(1)</script>".to_string();

        let html = engine
            .render_section(DashboardSection::Current, &data)
            .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn escaping_can_be_disabled() {
        let engine = TemplateEngine::with_config(TemplateConfig {
            auto_escape: false,
            ..Default::default()
        })
        .unwrap();
        let mut data = dashboard();
        data.current.condition_text = "<b>Overcast</b>".to_string();

        let html = engine
            .render_section(DashboardSection::Current, &data)
            .unwrap();
        assert!(html.contains("<b>Overcast</b>"));
    }

    #[test]
    fn unknown_template_is_not_found() {
        let engine = TemplateEngine::new().unwrap();
        let result = engine.render("dashboard/missing.html", &TemplateContext::new());
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn custom_directory_overrides_section() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("dashboard")).unwrap();
        std::fs::write(
            dir.path().join("dashboard/hourly.html"),
            "{% for hour in hourly %}[{{ hour.label }}]{% endfor %}",
        )
        .unwrap();

        let engine = TemplateEngine::with_config(TemplateConfig {
            templates_dir: Some(dir.path().to_string_lossy().into_owned()),
            ..Default::default()
        })
        .unwrap();

        let hourly = engine
            .render_section(DashboardSection::Hourly, &dashboard())
            .unwrap();
        assert!(hourly.starts_with("[3:00 PM][4:00 PM]"));

        // The page picks up the override through its include
        let page = engine.render_dashboard(&dashboard()).unwrap();
        assert!(page.contains("[9:00 PM]"));
        assert!(page.contains("3-Day Forecast"));
    }

    #[test]
    fn broken_custom_template_falls_back_to_embedded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.html"), "{% if %}").unwrap();

        let engine = TemplateEngine::with_config(TemplateConfig {
            templates_dir: Some(dir.path().to_string_lossy().into_owned()),
            ..Default::default()
        })
        .unwrap();
        assert!(engine.render_dashboard(&dashboard()).is_ok());
        let result = engine.render(
            "broken.html",
            &TemplateContext::for_dashboard(&dashboard()),
        );
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn broken_custom_template_without_fallback_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.html"), "{% if %}").unwrap();

        let result = TemplateEngine::with_config(TemplateConfig {
            templates_dir: Some(dir.path().to_string_lossy().into_owned()),
            use_embedded_fallback: false,
            ..Default::default()
        });
        assert!(matches!(result, Err(TemplateError::Compile(_))));
    }

    #[test]
    fn degrees_filter_formats_numbers() {
        let value = degrees_filter(&Value::from(72), &HashMap::new()).unwrap();
        assert_eq!(value, Value::String("72°".to_string()));
        assert!(degrees_filter(&Value::Bool(true), &HashMap::new()).is_err());
    }

    #[test]
    fn section_template_names() {
        assert_eq!(
            DashboardSection::Daily.template_name(),
            "dashboard/daily.html"
        );
    }
}
