//! Table declarations and per-table record storage.

use indexmap::IndexMap;
use larder_model::{Record, RecordKey};

/// Declaration of one table: its name and the field records key on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    pub name: String,
    pub primary_key: String,
}

impl TableDef {
    #[must_use]
    pub fn new(name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: primary_key.into(),
        }
    }
}

/// Records of one table, keyed by primary key in insertion order.
#[derive(Debug)]
pub(crate) struct Table {
    pub(crate) primary_key: String,
    pub(crate) records: IndexMap<RecordKey, Record>,
}

impl Table {
    pub(crate) fn new(primary_key: String) -> Self {
        Self {
            primary_key,
            records: IndexMap::new(),
        }
    }

    /// Records in insertion order.
    pub(crate) fn snapshot(&self) -> Vec<Record> {
        self.records.values().cloned().collect()
    }
}
