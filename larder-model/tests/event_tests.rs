use larder_model::{MutationEvent, MutationKind, RecordKey};

#[test]
fn constructors_set_kind_table_and_key() {
    let created = MutationEvent::created("user", 1);
    assert_eq!(created.kind(), MutationKind::Created);
    assert_eq!(created.table(), "user");
    assert_eq!(created.key(), &RecordKey::Int(1));

    let updated = MutationEvent::updated("user", "u-2");
    assert_eq!(updated.kind(), MutationKind::Updated);
    assert_eq!(updated.key(), &RecordKey::String("u-2".to_owned()));

    let deleted = MutationEvent::deleted("post", 3);
    assert_eq!(deleted.kind(), MutationKind::Deleted);
    assert_eq!(deleted.table(), "post");
}

#[test]
fn events_with_same_addressing_but_different_kind_differ() {
    assert_ne!(
        MutationEvent::created("user", 1),
        MutationEvent::deleted("user", 1)
    );
}
