//! Storage-assigned identifiers.
//!
//! Every persisted row is keyed by a monotonically assigned integer. User
//! rows get their own newtype so a user identifier cannot be confused with,
//! for example, an appointment identifier at a call site.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Primary key of a non-user record.
///
/// # Examples
/// ```
/// use clinic_backend::domain::RecordId;
///
/// let id: RecordId = "42".parse().expect("numeric id");
/// assert_eq!(id.get(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

/// Primary key of a user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

/// Error raised when an identifier cannot be parsed from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier must be a positive integer, got '{value}'")]
pub struct IdParseError {
    value: String,
}

macro_rules! integer_id {
    ($name:ident) => {
        impl $name {
            /// Wrap a raw storage key.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Return the raw storage key.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().parse::<i64>() {
                    Ok(raw) if raw > 0 => Ok(Self(raw)),
                    _ => Err(IdParseError {
                        value: s.to_owned(),
                    }),
                }
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

integer_id!(RecordId);
integer_id!(UserId);

impl From<UserId> for RecordId {
    fn from(value: UserId) -> Self {
        Self(value.0)
    }
}

impl From<RecordId> for UserId {
    fn from(value: RecordId) -> Self {
        Self(value.0)
    }
}
