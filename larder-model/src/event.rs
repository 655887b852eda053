//! Mutation events emitted by a store.
//!
//! Every mutation that changes store contents produces one event. The
//! write-back layer only cares *that* something changed, not what, so the
//! event carries just enough to identify the mutation: the kind, the table,
//! and the affected record's key.

use crate::key::RecordKey;

/// The kind of a mutation, without its addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Created,
    Updated,
    Deleted,
}

/// A change to store contents.
///
/// Events are dispatched to subscribers in mutation order, after the
/// mutation has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationEvent {
    /// A record was inserted.
    Created { table: String, key: RecordKey },

    /// An existing record's fields were replaced.
    Updated { table: String, key: RecordKey },

    /// A record was removed.
    Deleted { table: String, key: RecordKey },
}

impl MutationEvent {
    /// Creates a record-created event.
    #[must_use]
    pub fn created(table: impl Into<String>, key: impl Into<RecordKey>) -> Self {
        Self::Created {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Creates a record-updated event.
    #[must_use]
    pub fn updated(table: impl Into<String>, key: impl Into<RecordKey>) -> Self {
        Self::Updated {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Creates a record-deleted event.
    #[must_use]
    pub fn deleted(table: impl Into<String>, key: impl Into<RecordKey>) -> Self {
        Self::Deleted {
            table: table.into(),
            key: key.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Created { .. } => MutationKind::Created,
            Self::Updated { .. } => MutationKind::Updated,
            Self::Deleted { .. } => MutationKind::Deleted,
        }
    }

    /// The table the mutation touched.
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::Created { table, .. } | Self::Updated { table, .. } | Self::Deleted { table, .. } => {
                table
            }
        }
    }

    /// The affected record's primary key.
    #[must_use]
    pub fn key(&self) -> &RecordKey {
        match self {
            Self::Created { key, .. } | Self::Updated { key, .. } | Self::Deleted { key, .. } => key,
        }
    }
}
