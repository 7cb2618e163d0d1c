//! Common test utilities for fugitive-store integration tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use fugitive_core::DocTypeSchema;
use fugitive_store::{
    DocKey, Document, DocumentHandle, DocumentStore, Error, Fields, MemoryStore, Result,
};

/// Store wrapper that counts transaction calls and can fail on demand.
pub struct RecordingStore<S = MemoryStore> {
    /// Wrapped store
    pub inner: S,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    fail_save: AtomicBool,
    fail_commit: AtomicBool,
}

impl RecordingStore<MemoryStore> {
    /// Wraps a fresh in-memory store.
    pub fn new() -> Self {
        Self::wrap(MemoryStore::new())
    }
}

impl<S: DocumentStore> RecordingStore<S> {
    /// Wraps an existing store.
    pub fn wrap(inner: S) -> Self {
        Self {
            inner,
            commits: AtomicUsize::new(0),
            rollbacks: AtomicUsize::new(0),
            fail_save: AtomicBool::new(false),
            fail_commit: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent `save` fail with a backend error.
    pub fn fail_saves(&self) {
        self.fail_save.store(true, Ordering::SeqCst);
    }

    /// Makes every subsequent `commit` fail with a backend error.
    pub fn fail_commits(&self) {
        self.fail_commit.store(true, Ordering::SeqCst);
    }

    /// Number of `commit` calls so far.
    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Number of `rollback` calls so far.
    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }

    /// Resets both counters.
    pub fn reset_counts(&self) {
        self.commits.store(0, Ordering::SeqCst);
        self.rollbacks.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for RecordingStore<S> {
    async fn exists(&self, kind: &str, key: &DocKey) -> Result<bool> {
        self.inner.exists(kind, key).await
    }

    async fn create(&self, kind: &str, fields: Fields) -> Result<DocumentHandle> {
        self.inner.create(kind, fields).await
    }

    async fn save(&self, handle: DocumentHandle) -> Result<String> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(Error::backend("injected save failure"));
        }
        self.inner.save(handle).await
    }

    async fn create_table(&self, schema: &DocTypeSchema) -> Result<()> {
        self.inner.create_table(schema).await
    }

    async fn list(&self, kind: &str) -> Result<Vec<Document>> {
        self.inner.list(kind).await
    }

    async fn delete(&self, kind: &str, name: &str) -> Result<bool> {
        self.inner.delete(kind, name).await
    }

    async fn commit(&self) -> Result<()> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        if self.fail_commit.load(Ordering::SeqCst) {
            return Err(Error::backend("injected commit failure"));
        }
        self.inner.commit().await
    }

    async fn rollback(&self) -> Result<()> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        self.inner.rollback().await
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// The embedded Fugitive Simple schema.
pub fn schema() -> DocTypeSchema {
    DocTypeSchema::fugitive_simple().unwrap()
}
