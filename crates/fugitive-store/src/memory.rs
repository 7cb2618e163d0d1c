//! In-process document store.
//!
//! Holds everything in memory; dropped with the process. Used by tests and
//! for dry runs of the setup commands.

use async_trait::async_trait;
use fugitive_core::DocTypeSchema;
use tokio::sync::Mutex;

use crate::backend::DocumentStore;
use crate::document::{DocKey, Document, DocumentHandle, Fields};
use crate::error::Result;
use crate::state::{Database, StoreState};

/// Document store kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with `db` as committed data.
    pub fn with_database(db: Database) -> Self {
        Self {
            state: Mutex::new(StoreState::new(db)),
        }
    }

    /// Snapshot of the committed data.
    pub async fn snapshot(&self) -> Database {
        self.state.lock().await.committed().clone()
    }

    /// Number of staged, uncommitted changes.
    pub async fn pending_changes(&self) -> usize {
        self.state.lock().await.pending_changes()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
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
        let changes = self.state.lock().await.commit();
        tracing::debug!(changes, "Committed in-memory transaction");
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        let changes = self.state.lock().await.rollback();
        tracing::debug!(changes, "Rolled back in-memory transaction");
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
