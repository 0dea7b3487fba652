//! Value Objects - Immutable, identity-less domain primitives

mod location_query;
mod timezone;

pub use location_query::LocationQuery;
pub use timezone::Timezone;
