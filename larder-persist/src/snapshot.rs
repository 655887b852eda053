//! Full-state snapshots of a store.

use crate::codec;
use crate::error::PersistResult;
use indexmap::IndexMap;
use larder_model::SerializedRecord;
use larder_store::RecordStore;
use serde::{Deserialize, Serialize};

/// The full contents of a store in serialized form: every declared table,
/// in declaration order, mapped to its records in insertion order.
///
/// A snapshot always describes the *entire* store. Tables with no records
/// appear with an empty list, so a snapshot taken after the last record is
/// deleted still overwrites the previous one.
///
/// Serializes as a single JSON object:
///
/// ```json
/// {"user": [{"id": 1, "name": "Ann", "__meta__": {...}}], "post": []}
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    tables: IndexMap<String, Vec<SerializedRecord>>,
}

impl Snapshot {
    /// Captures the current state of a store.
    ///
    /// The capture is a point-in-time copy; the returned snapshot does not
    /// change when the store does.
    #[must_use]
    pub fn capture(store: &dyn RecordStore) -> Self {
        let mut tables = IndexMap::new();
        for (name, records) in store.tables() {
            let serialized = records.iter().map(codec::encode).collect();
            tables.insert(name, serialized);
        }
        Self { tables }
    }

    /// Serializes the snapshot to its durable JSON form.
    pub fn to_json(&self) -> PersistResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a durable JSON document back into a snapshot.
    ///
    /// Fails on malformed JSON and on records missing the reserved
    /// metadata property.
    pub fn from_json(text: &str) -> PersistResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Records of one table, or `None` if the snapshot has no such table.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&[SerializedRecord]> {
        self.tables.get(name).map(Vec::as_slice)
    }

    /// Tables in snapshot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SerializedRecord])> {
        self.tables
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    /// Total number of records across all tables.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    /// True when the snapshot holds no records at all. Tables may still be
    /// present (empty).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

impl IntoIterator for Snapshot {
    type Item = (String, Vec<SerializedRecord>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<SerializedRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}
