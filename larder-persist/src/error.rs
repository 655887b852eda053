//! Error types for the persistence layer.

use thiserror::Error;

/// Result type for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Errors that can occur while hydrating or writing back a store.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Snapshot (de)serialization failed. On the read side this includes
    /// snapshots missing the reserved metadata property.
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A snapshot record could not be turned back into a store record.
    #[error("invalid snapshot record: {0}")]
    Record(#[from] larder_model::ModelError),

    /// The store rejected a replayed record.
    #[error("store error: {0}")]
    Store(#[from] larder_store::StoreError),

    /// The durable key-value backend failed.
    #[error("durable store error: {0}")]
    Backend(#[source] anyhow::Error),

    /// The write-back worker is no longer running.
    #[error("write-back scheduler stopped")]
    SchedulerStopped,
}

impl PersistError {
    /// Wraps a backend failure.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }
}
