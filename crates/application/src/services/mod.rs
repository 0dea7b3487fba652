//! Application services - Use case implementations

mod dashboard_service;

pub use dashboard_service::{
    Background, CurrentPanel, Dashboard, DailySlot, DashboardService, DisplayUnits,
    HourlySlot, LocationHeader, DEFAULT_FORECAST_DAYS,
};
