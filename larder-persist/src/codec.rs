//! Record encoding and decoding for snapshots.
//!
//! A snapshot must be decodable on its own: the reader of a durable
//! document knows nothing about the store's table declarations. Encoding
//! therefore nests each record's metadata (its entity type and primary-key
//! field name) under the reserved [`METADATA_KEY`](larder_model::METADATA_KEY)
//! property, next to the record's own fields.
//!
//! Encoding is total: a [`Record`] is validated at construction, so it can
//! always be serialized. Decoding validates, since the snapshot may have
//! been corrupted or written by something else entirely.

use crate::error::PersistResult;
use larder_model::{Record, SerializedRecord};

/// Encodes a record into its snapshot form.
///
/// Does not mutate or consume the record; the serialized copy carries the
/// same public fields plus the nested metadata object.
#[must_use]
pub fn encode(record: &Record) -> SerializedRecord {
    SerializedRecord {
        fields: record.fields().clone(),
        meta: record.meta().clone(),
    }
}

/// Decodes a snapshot record back into a live [`Record`].
///
/// Fails when the metadata names a primary-key field that is absent from
/// the fields, or whose value cannot serve as a key. (A document missing
/// the metadata property altogether never gets here; it fails JSON
/// parsing into [`SerializedRecord`].)
pub fn decode(serialized: SerializedRecord) -> PersistResult<Record> {
    let SerializedRecord { fields, meta } = serialized;
    Ok(Record::with_meta(meta, fields)?)
}
