//! Domain entities

mod forecast;

pub use forecast::{ForecastDataset, ForecastDay, HOURS_PER_DAY, HourRecord};
