//! Records and their persistence metadata.

use crate::key::RecordKey;
use crate::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved property name under which record metadata is nested in the
/// serialized form. Public record fields must not use this name.
pub const METADATA_KEY: &str = "__meta__";

/// Metadata every record carries so its snapshot can be decoded without
/// consulting the store's schema.
///
/// Serializes with camelCase property names inside the reserved
/// [`METADATA_KEY`] object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    /// The table this record belongs to.
    pub entity_type: String,
    /// Name of the public field that holds the record's key.
    pub primary_key_field_name: String,
}

impl RecordMeta {
    #[must_use]
    pub fn new(entity_type: impl Into<String>, primary_key_field_name: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            primary_key_field_name: primary_key_field_name.into(),
        }
    }
}

/// A record held in a store.
///
/// Construction validates the fields against the metadata, so every
/// `Record` has a usable primary key and no collision with the reserved
/// metadata property. The extracted key is cached and exposed via
/// [`Record::key`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    meta: RecordMeta,
    fields: Map<String, Value>,
    key: RecordKey,
}

impl Record {
    /// Builds a record from its entity type, primary-key field name, and
    /// public fields.
    ///
    /// Fails when a field uses the reserved metadata name, when the named
    /// key field is absent, or when its value cannot serve as a key.
    pub fn new(
        entity_type: impl Into<String>,
        primary_key_field_name: impl Into<String>,
        fields: Map<String, Value>,
    ) -> ModelResult<Self> {
        Self::with_meta(RecordMeta::new(entity_type, primary_key_field_name), fields)
    }

    /// Builds a record from pre-assembled metadata, applying the same
    /// validation as [`Record::new`].
    pub fn with_meta(meta: RecordMeta, fields: Map<String, Value>) -> ModelResult<Self> {
        if fields.contains_key(METADATA_KEY) {
            return Err(ModelError::ReservedField {
                field: METADATA_KEY.to_owned(),
            });
        }
        let raw = fields
            .get(&meta.primary_key_field_name)
            .ok_or_else(|| ModelError::MissingKeyField {
                field: meta.primary_key_field_name.clone(),
            })?;
        let key = RecordKey::from_json(raw).ok_or_else(|| ModelError::UnusableKey {
            field: meta.primary_key_field_name.clone(),
            kind: json_kind(raw),
        })?;
        Ok(Self { meta, fields, key })
    }

    #[must_use]
    pub fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    /// The table this record belongs to.
    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.meta.entity_type
    }

    /// Name of the field holding the record's key.
    #[must_use]
    pub fn primary_key_field(&self) -> &str {
        &self.meta.primary_key_field_name
    }

    /// The record's primary-key value, extracted at construction.
    #[must_use]
    pub fn key(&self) -> &RecordKey {
        &self.key
    }

    /// The record's public fields.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Looks up a single public field by name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Splits the record into its metadata and fields.
    #[must_use]
    pub fn into_parts(self) -> (RecordMeta, Map<String, Value>) {
        (self.meta, self.fields)
    }
}

/// The serialized form of a record: its public fields flattened to the top
/// level, with metadata nested under the reserved [`METADATA_KEY`] property.
///
/// ```json
/// {"id": 1, "name": "Ann", "__meta__": {"entityType": "user", "primaryKeyFieldName": "id"}}
/// ```
///
/// Deserialization fails fast when the metadata property is missing, so a
/// document that was not written by this layer is rejected rather than
/// half-decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedRecord {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(rename = "__meta__")]
    pub meta: RecordMeta,
}

/// Human-readable description of a JSON value's type, for error messages.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.as_i64().is_none() && n.as_u64().is_some() => {
            "an integer out of range"
        }
        Value::Number(_) => "a non-integer number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
