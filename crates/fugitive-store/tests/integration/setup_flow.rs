//! Transaction discipline of the setup operations.

use fugitive_core::{RawEntry, build, reference_samples};
use fugitive_store::{
    DOCTYPE_KIND, DocKey, DocumentStore, Error, SeedReport, SetupOutcome, add_sample_data,
    create_doctype, delete_record, insert_record,
};

use crate::common::{RecordingStore, schema};

#[tokio::test]
async fn test_create_doctype_commits_once() {
    let store = RecordingStore::new();
    let outcome = create_doctype(&store, &schema()).await.unwrap();

    assert_eq!(outcome, SetupOutcome::Created);
    assert_eq!(store.commits(), 1);
    assert_eq!(store.rollbacks(), 0);
    assert!(
        store
            .exists(DOCTYPE_KIND, &DocKey::name("Fugitive Simple"))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_create_doctype_twice_touches_nothing() {
    let store = RecordingStore::new();
    create_doctype(&store, &schema()).await.unwrap();
    store.reset_counts();

    let outcome = create_doctype(&store, &schema()).await.unwrap();
    assert_eq!(outcome, SetupOutcome::AlreadyExists);
    assert_eq!(store.commits(), 0);
    assert_eq!(store.rollbacks(), 0);
}

#[tokio::test]
async fn test_failing_save_rolls_back_once() {
    let store = RecordingStore::new();
    store.fail_saves();

    let err = create_doctype(&store, &schema()).await.unwrap_err();
    assert!(matches!(err, Error::Backend { .. }));
    assert_eq!(store.rollbacks(), 1);
    assert_eq!(store.commits(), 0);
    assert!(store.list(DOCTYPE_KIND).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failing_commit_rolls_back() {
    let store = RecordingStore::new();
    store.fail_commits();

    assert!(create_doctype(&store, &schema()).await.is_err());
    assert_eq!(store.commits(), 1);
    assert_eq!(store.rollbacks(), 1);
    assert_eq!(store.inner.pending_changes().await, 0);
}

#[tokio::test]
async fn test_seed_after_create() {
    let store = RecordingStore::new();
    let schema = schema();
    create_doctype(&store, &schema).await.unwrap();
    store.reset_counts();

    let report = add_sample_data(&store, &schema, reference_samples().unwrap())
        .await
        .unwrap();
    assert_eq!(report, SeedReport { inserted: 3, skipped: 0 });
    assert_eq!(store.commits(), 1);

    for s_no in 1..=3u32 {
        assert!(
            store
                .exists("Fugitive Simple", &DocKey::field("s_no", s_no))
                .await
                .unwrap()
        );
    }
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let store = RecordingStore::new();
    let schema = schema();
    create_doctype(&store, &schema).await.unwrap();
    add_sample_data(&store, &schema, reference_samples().unwrap())
        .await
        .unwrap();

    let again = add_sample_data(&store, &schema, reference_samples().unwrap())
        .await
        .unwrap();
    assert_eq!(again, SeedReport { inserted: 0, skipped: 3 });
    assert_eq!(store.list("Fugitive Simple").await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_seed_without_doctype_does_not_open_transaction() {
    let store = RecordingStore::new();
    let err = add_sample_data(&store, &schema(), reference_samples().unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DocTypeMissing { .. }));
    assert_eq!(store.commits(), 0);
    assert_eq!(store.rollbacks(), 0);
}

#[tokio::test]
async fn test_seed_save_failure_leaves_nothing_visible() {
    let store = RecordingStore::new();
    let schema = schema();
    create_doctype(&store, &schema).await.unwrap();
    store.reset_counts();
    store.fail_saves();

    assert!(
        add_sample_data(&store, &schema, reference_samples().unwrap())
            .await
            .is_err()
    );
    assert_eq!(store.rollbacks(), 1);
    assert_eq!(store.commits(), 0);
    assert!(store.list("Fugitive Simple").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_seed_keeps_earlier_rows() {
    let store = RecordingStore::new();
    let schema = schema();
    create_doctype(&store, &schema).await.unwrap();

    let first = reference_samples().unwrap().remove(0);
    add_sample_data(&store, &schema, vec![first]).await.unwrap();

    let report = add_sample_data(&store, &schema, reference_samples().unwrap())
        .await
        .unwrap();
    assert_eq!(report, SeedReport { inserted: 2, skipped: 1 });
}

#[tokio::test]
async fn test_missing_required_field_rejected_by_store() {
    let store = RecordingStore::new();
    let schema = schema();
    create_doctype(&store, &schema).await.unwrap();
    store.reset_counts();

    // no date or refrigerant
    let record = build(RawEntry::new(1.0, 10.0, "kg").with_s_no(7)).unwrap();
    let err = insert_record(&store, &schema, &record).await.unwrap_err();

    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(store.rollbacks(), 1);
}

#[tokio::test]
async fn test_delete_commits_once() {
    let store = RecordingStore::new();
    let schema = schema();
    create_doctype(&store, &schema).await.unwrap();
    add_sample_data(&store, &schema, reference_samples().unwrap())
        .await
        .unwrap();
    store.reset_counts();

    assert!(delete_record(&store, &schema, 3).await.unwrap().is_some());
    assert_eq!(store.commits(), 1);
    assert_eq!(store.rollbacks(), 0);
    assert_eq!(store.list("Fugitive Simple").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_unknown_serial_number_opens_no_transaction() {
    let store = RecordingStore::new();
    let schema = schema();
    create_doctype(&store, &schema).await.unwrap();
    store.reset_counts();

    assert_eq!(delete_record(&store, &schema, 42).await.unwrap(), None);
    assert_eq!(store.commits(), 0);
    assert_eq!(store.rollbacks(), 0);
}

#[tokio::test]
async fn test_failed_delete_commit_restores_entry() {
    let store = RecordingStore::new();
    let schema = schema();
    create_doctype(&store, &schema).await.unwrap();
    add_sample_data(&store, &schema, reference_samples().unwrap())
        .await
        .unwrap();
    store.reset_counts();
    store.fail_commits();

    let err = delete_record(&store, &schema, 1).await.unwrap_err();
    assert!(matches!(err, Error::Backend { .. }));
    assert_eq!(store.rollbacks(), 1);
    assert!(
        store
            .exists("Fugitive Simple", &DocKey::field("s_no", 1))
            .await
            .unwrap()
    );
}
