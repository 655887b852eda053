//! The in-memory record store.

use crate::error::{StoreError, StoreResult};
use crate::store::RecordStore;
use crate::subscription::{EventHandler, SubscriptionHandle, Subscriptions};
use crate::table::{Table, TableDef};
use indexmap::IndexMap;
use larder_model::{MutationEvent, Record, RecordKey, StoreId};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// An in-memory, table-oriented record store.
///
/// Tables are declared up front and keep their declaration order; records
/// keep insertion order within their table. All mutations emit a
/// [`MutationEvent`] to subscribers after the store's lock is released, so
/// handlers observe the store in its post-mutation state and may call back
/// into it.
pub struct MemoryStore {
    id: StoreId,
    tables: RwLock<IndexMap<String, Table>>,
    subscriptions: Arc<Subscriptions>,
}

impl MemoryStore {
    /// Creates a store with the given identifier and table declarations.
    ///
    /// Fails if a table name is declared twice.
    pub fn new(id: impl Into<StoreId>, tables: impl IntoIterator<Item = TableDef>) -> StoreResult<Self> {
        let mut map = IndexMap::new();
        for def in tables {
            if map.contains_key(&def.name) {
                return Err(StoreError::DuplicateTable(def.name));
            }
            map.insert(def.name, Table::new(def.primary_key));
        }
        Ok(Self {
            id: id.into(),
            tables: RwLock::new(map),
            subscriptions: Arc::new(Subscriptions::new()),
        })
    }

    /// The store's identifier.
    #[must_use]
    pub fn id(&self) -> &StoreId {
        &self.id
    }

    /// Declared table names, in declaration order.
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        self.read_tables().keys().cloned().collect()
    }

    /// Number of records in the named table.
    pub fn count(&self, table: &str) -> StoreResult<usize> {
        let tables = self.read_tables();
        let entry = tables
            .get(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_owned()))?;
        Ok(entry.records.len())
    }

    /// Looks up a record by key. `Ok(None)` when the table exists but holds
    /// no such record.
    pub fn get(&self, table: &str, key: &RecordKey) -> StoreResult<Option<Record>> {
        let tables = self.read_tables();
        let entry = tables
            .get(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_owned()))?;
        Ok(entry.records.get(key).cloned())
    }

    /// Replaces the fields of the record with the given key.
    ///
    /// The record keeps its metadata; the new fields must still contain the
    /// same key value. Emits an updated event on success.
    pub fn update(
        &self,
        table: &str,
        key: &RecordKey,
        fields: Map<String, Value>,
    ) -> StoreResult<Record> {
        let updated = {
            let mut tables = self.write_tables();
            let entry = tables
                .get_mut(table)
                .ok_or_else(|| StoreError::UnknownTable(table.to_owned()))?;
            let existing = entry.records.get(key).ok_or_else(|| StoreError::NotFound {
                table: table.to_owned(),
                key: key.clone(),
            })?;
            let replacement = Record::with_meta(existing.meta().clone(), fields)?;
            if replacement.key() != key {
                return Err(StoreError::KeyChanged {
                    table: table.to_owned(),
                    expected: key.clone(),
                    actual: replacement.key().clone(),
                });
            }
            // Inserting over an existing key keeps the record's position.
            entry.records.insert(key.clone(), replacement.clone());
            replacement
        };
        self.subscriptions
            .dispatch(&MutationEvent::updated(table, key.clone()));
        Ok(updated)
    }

    /// Removes the record with the given key and returns it.
    ///
    /// Remaining records keep their insertion order. Emits a deleted event
    /// on success.
    pub fn delete(&self, table: &str, key: &RecordKey) -> StoreResult<Record> {
        let removed = {
            let mut tables = self.write_tables();
            let entry = tables
                .get_mut(table)
                .ok_or_else(|| StoreError::UnknownTable(table.to_owned()))?;
            // shift_remove, not swap_remove: insertion order must survive.
            entry
                .records
                .shift_remove(key)
                .ok_or_else(|| StoreError::NotFound {
                    table: table.to_owned(),
                    key: key.clone(),
                })?
        };
        self.subscriptions
            .dispatch(&MutationEvent::deleted(table, key.clone()));
        Ok(removed)
    }

    fn read_tables(&self) -> RwLockReadGuard<'_, IndexMap<String, Table>> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tables(&self) -> RwLockWriteGuard<'_, IndexMap<String, Table>> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// Manual impl: `Subscriptions` holds `dyn Fn` handlers and cannot derive.
impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("id", &self.id)
            .field("tables", &self.tables)
            .finish_non_exhaustive()
    }
}

impl RecordStore for MemoryStore {
    fn store_id(&self) -> &StoreId {
        &self.id
    }

    fn tables(&self) -> Vec<(String, Vec<Record>)> {
        self.read_tables()
            .iter()
            .map(|(name, table)| (name.clone(), table.snapshot()))
            .collect()
    }

    fn create(&self, table: &str, record: Record) -> StoreResult<Record> {
        let created = {
            let mut tables = self.write_tables();
            let entry = tables
                .get_mut(table)
                .ok_or_else(|| StoreError::UnknownTable(table.to_owned()))?;
            if record.entity_type() != table {
                return Err(StoreError::EntityTypeMismatch {
                    table: table.to_owned(),
                    actual: record.entity_type().to_owned(),
                });
            }
            if record.primary_key_field() != entry.primary_key {
                return Err(StoreError::KeyFieldMismatch {
                    table: table.to_owned(),
                    expected: entry.primary_key.clone(),
                    actual: record.primary_key_field().to_owned(),
                });
            }
            let key = record.key().clone();
            if entry.records.contains_key(&key) {
                return Err(StoreError::DuplicateKey {
                    table: table.to_owned(),
                    key,
                });
            }
            entry.records.insert(key, record.clone());
            record
        };
        self.subscriptions
            .dispatch(&MutationEvent::created(table, created.key().clone()));
        Ok(created)
    }

    fn subscribe(&self, handler: EventHandler) -> SubscriptionHandle {
        Subscriptions::add(&self.subscriptions, handler)
    }
}
