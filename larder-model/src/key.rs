//! Primary-key values extracted from record fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The value of a record's primary-key field.
///
/// Only strings and integers that fit in an `i64` can serve as keys. The
/// key is extracted from the record's own fields at construction time, so
/// a [`RecordKey`] always corresponds to a real field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordKey {
    String(String),
    Int(i64),
}

impl RecordKey {
    /// Extracts a key from a JSON field value.
    ///
    /// Returns `None` for values that cannot serve as a key: null, booleans,
    /// non-integer numbers, integers outside the `i64` range, arrays, and
    /// objects.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Number(n) => n.as_i64().map(Self::Int),
            _ => None,
        }
    }

    /// Returns the key as a JSON value, the inverse of [`RecordKey::from_json`].
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Int(n) => Value::Number((*n).into()),
        }
    }
}

impl From<&str> for RecordKey {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for RecordKey {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for RecordKey {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}
