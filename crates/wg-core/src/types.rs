//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// An hour setting fell outside a day.
    #[error("{field} must be between 0 and 23, got {value}")]
    HourOutOfRange { field: &'static str, value: u32 },

    /// The visible window would end before it starts.
    #[error("start hour {start} is after end hour {end}")]
    InvertedWindow { start: u32, end: u32 },

    /// A pixel measure was zero, negative, or not a number.
    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    /// The rotation period was zero or longer than a day.
    #[error("rotation interval must be between 1 and {max} seconds, got {value}")]
    PeriodOutOfRange { value: u64, max: u64 },

    /// A cluster identifier did not have the `YYYY-MM-DD#N` shape.
    #[error("invalid cluster id: {value}")]
    InvalidClusterId { value: String },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
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
    /// A validated event identifier.
    ///
    /// Event IDs are opaque, non-empty and stable across renders. Imported
    /// records carry prefixes such as `classroom-` or `gcal-`, which the engine
    /// never interprets.
    EventId, "event ID"
);
