//! Durability of the JSON file store.

use fugitive_core::reference_samples;
use fugitive_store::{
    DOCTYPE_KIND, DocKey, DocumentStore, JsonFileStore, SetupOutcome, StoreBackend, StoreConfig,
    add_sample_data, create_doctype, create_store, delete_record,
};
use tempfile::TempDir;

use crate::common::{RecordingStore, schema};

#[tokio::test]
async fn test_setup_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fugitive.json");
    let schema = schema();

    {
        let store = JsonFileStore::open(&path).await.unwrap();
        create_doctype(&store, &schema).await.unwrap();
        add_sample_data(&store, &schema, reference_samples().unwrap())
            .await
            .unwrap();
    }

    let store = JsonFileStore::open(&path).await.unwrap();
    assert_eq!(
        create_doctype(&store, &schema).await.unwrap(),
        SetupOutcome::AlreadyExists
    );
    let records = store.list("Fugitive Simple").await.unwrap();
    assert_eq!(records.len(), 3);
    assert!(
        store
            .exists("Fugitive Simple", &DocKey::field("type_refrigeration", "R410A"))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_rolled_back_changes_never_reach_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fugitive.json");
    let schema = schema();

    {
        let store = RecordingStore::wrap(JsonFileStore::open(&path).await.unwrap());
        create_doctype(&store, &schema).await.unwrap();
        store.fail_saves();
        assert!(
            add_sample_data(&store, &schema, reference_samples().unwrap())
                .await
                .is_err()
        );
        assert_eq!(store.rollbacks(), 1);
    }

    let store = JsonFileStore::open(&path).await.unwrap();
    assert_eq!(store.list(DOCTYPE_KIND).await.unwrap().len(), 1);
    assert!(store.list("Fugitive Simple").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_factory_builds_json_store_at_configured_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db").join("fugitive.json");
    let config = StoreConfig {
        backend: StoreBackend::Json,
        path: Some(path.display().to_string()),
    };

    let store = create_store(&config).await.unwrap();
    create_doctype(store.as_ref(), &schema()).await.unwrap();
    assert!(path.exists());

    let content = std::fs::read_to_string(&path).unwrap();
    let db: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(db["tables"]["Fugitive Simple"].is_object());
    assert_eq!(db["tables"]["Fugitive Simple"]["module"], "Climoro Onboarding");
}

#[tokio::test]
async fn test_memory_backend_does_not_persist() {
    let config = StoreConfig {
        backend: StoreBackend::Memory,
        path: None,
    };
    let store = create_store(&config).await.unwrap();
    create_doctype(store.as_ref(), &schema()).await.unwrap();

    let fresh = create_store(&config).await.unwrap();
    assert!(fresh.list(DOCTYPE_KIND).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fugitive.json");
    let schema = schema();

    {
        let store = JsonFileStore::open(&path).await.unwrap();
        create_doctype(&store, &schema).await.unwrap();
        add_sample_data(&store, &schema, reference_samples().unwrap())
            .await
            .unwrap();
        assert!(delete_record(&store, &schema, 1).await.unwrap().is_some());
    }

    let store = JsonFileStore::open(&path).await.unwrap();
    assert_eq!(store.list("Fugitive Simple").await.unwrap().len(), 2);
    assert!(
        !store
            .exists("Fugitive Simple", &DocKey::field("s_no", 1))
            .await
            .unwrap()
    );
}
