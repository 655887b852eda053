use larder_model::{Record, RecordKey, StoreId};
use larder_store::{MemoryStore, RecordStore, StoreError, TableDef};
use pretty_assertions::assert_eq;
use serde_json::json;

fn fields(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    value.as_object().cloned().unwrap()
}

fn user(id: i64, name: &str) -> Record {
    Record::new("user", "id", fields(json!({"id": id, "name": name}))).unwrap()
}

fn store() -> MemoryStore {
    MemoryStore::new(
        "abc",
        [TableDef::new("user", "id"), TableDef::new("post", "slug")],
    )
    .unwrap()
}

// ── Declaration ──────────────────────────────────────────────────

#[test]
fn tables_keep_declaration_order() {
    let s = store();
    assert_eq!(s.table_names(), vec!["user", "post"]);
}

#[test]
fn duplicate_table_declaration_is_rejected() {
    let err = MemoryStore::new(
        StoreId::generate(),
        [TableDef::new("user", "id"), TableDef::new("user", "id")],
    )
    .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateTable(name) if name == "user"));
}

#[test]
fn empty_tables_appear_in_dump() {
    let s = store();
    let tables = s.tables();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].0, "user");
    assert!(tables[0].1.is_empty());
    assert_eq!(tables[1].0, "post");
    assert!(tables[1].1.is_empty());
}

// ── Create ───────────────────────────────────────────────────────

#[test]
fn create_inserts_and_returns_record() {
    let s = store();
    let created = s.create("user", user(1, "Ann")).unwrap();
    assert_eq!(created.key(), &RecordKey::Int(1));
    assert_eq!(s.count("user").unwrap(), 1);
    let fetched = s.get("user", &RecordKey::Int(1)).unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[test]
fn create_rejects_unknown_table() {
    let s = store();
    let record = Record::new("ghost", "id", fields(json!({"id": 1}))).unwrap();
    let err = s.create("ghost", record).unwrap_err();
    assert!(matches!(err, StoreError::UnknownTable(name) if name == "ghost"));
}

#[test]
fn create_rejects_entity_type_mismatch() {
    let s = store();
    let err = s.create("post", user(1, "Ann")).unwrap_err();
    assert!(matches!(err, StoreError::EntityTypeMismatch { .. }));
}

#[test]
fn create_rejects_key_field_mismatch() {
    let s = store();
    let record = Record::new("post", "id", fields(json!({"id": 1}))).unwrap();
    let err = s.create("post", record).unwrap_err();
    assert!(matches!(
        err,
        StoreError::KeyFieldMismatch { expected, actual, .. }
            if expected == "slug" && actual == "id"
    ));
}

#[test]
fn create_rejects_duplicate_key() {
    let s = store();
    s.create("user", user(1, "Ann")).unwrap();
    let err = s.create("user", user(1, "Again")).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { key, .. } if key == RecordKey::Int(1)));
}

#[test]
fn records_keep_insertion_order() {
    let s = store();
    s.create("user", user(3, "Cid")).unwrap();
    s.create("user", user(1, "Ann")).unwrap();
    s.create("user", user(2, "Bea")).unwrap();

    let tables = s.tables();
    let keys: Vec<&RecordKey> = tables[0].1.iter().map(Record::key).collect();
    assert_eq!(
        keys,
        vec![&RecordKey::Int(3), &RecordKey::Int(1), &RecordKey::Int(2)]
    );
}

// ── Update ───────────────────────────────────────────────────────

#[test]
fn update_replaces_fields() {
    let s = store();
    s.create("user", user(1, "Ann")).unwrap();
    let updated = s
        .update("user", &RecordKey::Int(1), fields(json!({"id": 1, "name": "Anne"})))
        .unwrap();
    assert_eq!(updated.get("name"), Some(&json!("Anne")));
    let fetched = s.get("user", &RecordKey::Int(1)).unwrap().unwrap();
    assert_eq!(fetched.get("name"), Some(&json!("Anne")));
}

#[test]
fn update_keeps_record_position() {
    let s = store();
    s.create("user", user(1, "Ann")).unwrap();
    s.create("user", user(2, "Bea")).unwrap();
    s.update("user", &RecordKey::Int(1), fields(json!({"id": 1, "name": "Anne"})))
        .unwrap();

    let tables = s.tables();
    let keys: Vec<&RecordKey> = tables[0].1.iter().map(Record::key).collect();
    assert_eq!(keys, vec![&RecordKey::Int(1), &RecordKey::Int(2)]);
}

#[test]
fn update_rejects_missing_record() {
    let s = store();
    let err = s
        .update("user", &RecordKey::Int(9), fields(json!({"id": 9})))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn update_rejects_key_change() {
    let s = store();
    s.create("user", user(1, "Ann")).unwrap();
    let err = s
        .update("user", &RecordKey::Int(1), fields(json!({"id": 2, "name": "Ann"})))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::KeyChanged { expected, actual, .. }
            if expected == RecordKey::Int(1) && actual == RecordKey::Int(2)
    ));
}

#[test]
fn update_rejects_dropped_key_field() {
    let s = store();
    s.create("user", user(1, "Ann")).unwrap();
    let err = s
        .update("user", &RecordKey::Int(1), fields(json!({"name": "Ann"})))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidRecord(_)));
}

// ── Delete ───────────────────────────────────────────────────────

#[test]
fn delete_removes_and_returns_record() {
    let s = store();
    s.create("user", user(1, "Ann")).unwrap();
    let removed = s.delete("user", &RecordKey::Int(1)).unwrap();
    assert_eq!(removed.get("name"), Some(&json!("Ann")));
    assert_eq!(s.count("user").unwrap(), 0);
    assert!(s.get("user", &RecordKey::Int(1)).unwrap().is_none());
}

#[test]
fn delete_preserves_order_of_remaining_records() {
    let s = store();
    s.create("user", user(1, "Ann")).unwrap();
    s.create("user", user(2, "Bea")).unwrap();
    s.create("user", user(3, "Cid")).unwrap();
    s.delete("user", &RecordKey::Int(2)).unwrap();

    let tables = s.tables();
    let keys: Vec<&RecordKey> = tables[0].1.iter().map(Record::key).collect();
    assert_eq!(keys, vec![&RecordKey::Int(1), &RecordKey::Int(3)]);
}

#[test]
fn delete_rejects_missing_record() {
    let s = store();
    let err = s.delete("user", &RecordKey::Int(1)).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn deleting_last_record_leaves_empty_table_in_dump() {
    let s = store();
    s.create("user", user(1, "Ann")).unwrap();
    s.delete("user", &RecordKey::Int(1)).unwrap();

    let tables = s.tables();
    assert_eq!(tables[0].0, "user");
    assert!(tables[0].1.is_empty());
}

// ── Identity ─────────────────────────────────────────────────────

#[test]
fn store_id_is_stable() {
    let s = store();
    assert_eq!(s.id().as_str(), "abc");
    assert_eq!(RecordStore::store_id(&s).as_str(), "abc");
}
