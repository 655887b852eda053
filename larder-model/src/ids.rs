//! Identifier types used throughout Larder.
//!
//! Store identifiers are opaque strings. Callers that integrate with an
//! existing application pass their own identifier; everyone else can ask
//! for a generated one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for one store instance.
///
/// The identifier is part of the durable key, so two stores that must not
/// share persisted state need distinct identifiers, and a store that wants
/// to find its own snapshot again after a restart needs a stable one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(String);

impl StoreId {
    /// Creates a store ID from a caller-supplied string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh, globally unique store ID.
    ///
    /// Uses UUID v7 so generated IDs sort by creation time.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StoreId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for StoreId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
