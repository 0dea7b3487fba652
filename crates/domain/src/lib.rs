//! Domain layer for the weather dashboard
//!
//! Contains the forecast entities, the hourly window selector, value objects
//! and domain errors. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod hourly_window;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use hourly_window::{HourlyWindow, HourlyWindowSelector, WINDOW_HOURS};
pub use value_objects::*;
