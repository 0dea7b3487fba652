//! Application layer - Use cases and orchestration
//!
//! Defines the weather port and the dashboard service that turns a
//! provider report into a renderable view model.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
