//! Error types for store operations.

use larder_model::{ModelError, RecordKey};
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur when mutating or reading a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The named table was never declared on this store.
    #[error("unknown table: {0:?}")]
    UnknownTable(String),

    /// A table name appeared twice in the store's declaration.
    #[error("table declared twice: {0:?}")]
    DuplicateTable(String),

    /// The record's metadata names a different table.
    #[error("record is tagged {actual:?} but was sent to table {table:?}")]
    EntityTypeMismatch { table: String, actual: String },

    /// The record's metadata names a different primary-key field than the
    /// table declares.
    #[error("table {table:?} keys on {expected:?}, record keys on {actual:?}")]
    KeyFieldMismatch {
        table: String,
        expected: String,
        actual: String,
    },

    /// A record with this key already exists in the table.
    #[error("duplicate key {key} in table {table:?}")]
    DuplicateKey { table: String, key: RecordKey },

    /// No record with this key exists in the table.
    #[error("no record with key {key} in table {table:?}")]
    NotFound { table: String, key: RecordKey },

    /// An update tried to move a record to a different primary key.
    #[error("update would change key {expected} to {actual} in table {table:?}")]
    KeyChanged {
        table: String,
        expected: RecordKey,
        actual: RecordKey,
    },

    /// Record validation failed.
    #[error("invalid record: {0}")]
    InvalidRecord(#[from] ModelError),
}
