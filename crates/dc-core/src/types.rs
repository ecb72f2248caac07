//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::day::Day;

/// Validation errors for core types.
///
/// These are rejected at the construction boundary; the engine assumes
/// well-formed values once admitted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A date range was given with its bounds reversed.
    #[error("range start {start} is after stop {stop}")]
    InvertedRange { start: Day, stop: Day },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated category identifier.
    ///
    /// Category IDs must be non-empty strings. Uniqueness is enforced at the
    /// database level.
    CategoryId, "category ID"
);

define_string_id!(
    /// A validated event identifier.
    EventId, "event ID"
);

define_string_id!(
    /// A validated limit identifier.
    LimitId, "limit ID"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_id_rejects_empty() {
        assert!(CategoryId::new("").is_err());
        assert!(CategoryId::new("schengen").is_ok());
    }

    #[test]
    fn event_id_serde_roundtrip() {
        let id = EventId::new("event-123").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"event-123\"");
        let parsed: EventId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn limit_id_serde_rejects_empty() {
        let result: Result<LimitId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn event_id_as_ref() {
        let id = EventId::new("event-123").unwrap();
        let s: &str = id.as_ref();
        assert_eq!(s, "event-123");
    }
}
