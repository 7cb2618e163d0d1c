//! Document store persisted to a single JSON file.
//!
//! The file holds the committed [`Database`]. Staged changes live in memory
//! until `commit`, which writes the merged database to a sibling temp file
//! and renames it over the original. A failed write leaves both the file
//! and the in-memory committed state untouched; the transaction stays open
//! so the caller can roll it back.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fugitive_core::DocTypeSchema;
use tokio::sync::Mutex;

use crate::backend::DocumentStore;
use crate::document::{DocKey, Document, DocumentHandle, Fields};
use crate::error::{Error, Result};
use crate::state::{Database, StoreState};

/// Suffix of the temp file written before the atomic rename.
const TEMP_SUFFIX: &str = "tmp";

/// Document store backed by a JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl JsonFileStore {
    /// Opens the store at `path`, loading committed data if the file exists.
    ///
    /// A missing file is an empty database; it is created on first commit.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let db = load(&path).await?.unwrap_or_default();
        tracing::debug!(
            path = %path.display(),
            tables = db.tables.len(),
            documents = db.document_count(),
            "Opened JSON store"
        );
        Ok(Self {
            path,
            state: Mutex::new(StoreState::new(db)),
        })
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn load(path: &Path) -> Result<Option<Database>> {
    if !tokio::fs::try_exists(path)
        .await
        .map_err(|e| Error::io_with_path(e, path))?
    {
        return Ok(None);
    }
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io_with_path(e, path))?;
    let db = serde_json::from_str(&content)?;
    Ok(Some(db))
}

async fn write_atomic(path: &Path, db: &Database) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io_with_path(e, parent))?;
    }
    let content = serde_json::to_string_pretty(db)?;

    let mut temp = path.as_os_str().to_owned();
    temp.push(".");
    temp.push(TEMP_SUFFIX);
    let temp = PathBuf::from(temp);

    tokio::fs::write(&temp, content)
        .await
        .map_err(|e| Error::io_with_path(e, &temp))?;
    tokio::fs::rename(&temp, path)
        .await
        .map_err(|e| Error::io_with_path(e, path))?;
    Ok(())
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn exists(&self, kind: &str, key: &DocKey) -> Result<bool> {
        Ok(self.state.lock().await.exists(kind, key))
    }

    async fn create(&self, kind: &str, fields: Fields) -> Result<DocumentHandle> {
        self.state.lock().await.create(kind, fields)
    }

    async fn save(&self, handle: DocumentHandle) -> Result<String> {
        self.state.lock().await.save(handle)
    }

    async fn create_table(&self, schema: &DocTypeSchema) -> Result<()> {
        self.state.lock().await.create_table(schema)
    }

    async fn list(&self, kind: &str) -> Result<Vec<Document>> {
        Ok(self.state.lock().await.list(kind))
    }

    async fn delete(&self, kind: &str, name: &str) -> Result<bool> {
        Ok(self.state.lock().await.delete(kind, name))
    }

    async fn commit(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.pending_changes() == 0 {
            return Ok(());
        }
        let db = state.merged();
        write_atomic(&self.path, &db).await?;
        let changes = state.commit_to(db);
        tracing::debug!(path = %self.path.display(), changes, "Committed JSON store");
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        let changes = self.state.lock().await.rollback();
        tracing::debug!(path = %self.path.display(), changes, "Rolled back JSON store");
        Ok(())
    }

    fn name(&self) -> &str {
        "json"
    }
}
