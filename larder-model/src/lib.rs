//! Record and mutation-event vocabulary for Larder.
//!
//! This crate defines the store-agnostic types shared by the in-memory
//! store and the persistence layer:
//! - Store and record identifiers
//! - Records with their persistence metadata
//! - The serialized record form used in snapshots
//! - Mutation events emitted on every store change
//!
//! Nothing here knows about tables, durability, or scheduling; those live
//! in `larder-store` and `larder-persist`.

mod event;
mod ids;
mod key;
mod record;

pub use event::{MutationEvent, MutationKind};
pub use ids::StoreId;
pub use key::RecordKey;
pub use record::{METADATA_KEY, Record, RecordMeta, SerializedRecord};

/// Result type alias using the crate's error type.
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Errors raised when assembling records from raw fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("record has no {field:?} field to use as its primary key")]
    MissingKeyField { field: String },

    #[error("field {field:?} cannot serve as a primary key: its value is {kind}")]
    UnusableKey { field: String, kind: &'static str },

    #[error("field name {field:?} is reserved for record metadata")]
    ReservedField { field: String },
}
