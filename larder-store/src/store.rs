//! The store interface consumed by the persistence layer.

use crate::error::StoreResult;
use crate::subscription::{EventHandler, SubscriptionHandle};
use larder_model::{Record, StoreId};

/// What the write-back persistence layer needs from a store.
///
/// Anything that can identify itself, dump its full contents in a stable
/// order, replay record creations, and announce mutations can be persisted.
/// [`MemoryStore`](crate::MemoryStore) is the canonical implementation.
pub trait RecordStore: Send + Sync {
    /// The store's stable identifier. Part of the durable key, so it must
    /// not change across restarts.
    fn store_id(&self) -> &StoreId;

    /// Full store contents, tables in declaration order, records within
    /// each table in insertion order. Declared-but-empty tables are
    /// included with an empty record list.
    fn tables(&self) -> Vec<(String, Vec<Record>)>;

    /// Inserts a record into the named table.
    ///
    /// Fails when the table is unknown, when the record's metadata does
    /// not match the table, or when the key is already taken. Emits a
    /// created event on success.
    fn create(&self, table: &str, record: Record) -> StoreResult<Record>;

    /// Registers a mutation-event handler.
    fn subscribe(&self, handler: EventHandler) -> SubscriptionHandle;
}
