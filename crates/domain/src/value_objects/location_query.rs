//! Location query value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Free-text location as entered by the user (city, postcode, "lat,lon", ...)
///
/// Surrounding whitespace is trimmed; nothing else is checked; the weather
/// provider decides whether the text names a place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationQuery(String);

impl LocationQuery {
    /// Create a query from raw input
    #[must_use]
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    /// Get the trimmed query text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether trimming left nothing behind
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LocationQuery {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for LocationQuery {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let query = LocationQuery::new("  London \n");
        assert_eq!(query.as_str(), "London");
    }

    #[test]
    fn keeps_inner_whitespace() {
        let query = LocationQuery::new(" New York ");
        assert_eq!(query.as_str(), "New York");
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert!(LocationQuery::new(" \t ").is_empty());
        assert!(!LocationQuery::new("Paris").is_empty());
    }

    #[test]
    fn display_shows_trimmed_text() {
        let query: LocationQuery = " 10001 ".into();
        assert_eq!(format!("{query}"), "10001");
    }

    #[test]
    fn serialization_round_trip() {
        let query = LocationQuery::new("Berlin");
        let json = serde_json::to_string(&query).expect("serialize");
        assert_eq!(json, "\"Berlin\"");
        let back: LocationQuery = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, query);
    }
}
