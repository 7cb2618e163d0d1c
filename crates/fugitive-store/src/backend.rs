//! Document store trait and factory.
//!
//! `DocumentStore` is the persistence boundary the setup operations use.
//! The handle is created once by the caller and passed explicitly; nothing
//! in this crate holds a global connection.
//!
//! # Backends
//!
//! - `MemoryStore`: in-process, lost on drop
//! - `JsonFileStore`: a single JSON file, replaced atomically on commit
//!
//! # Example
//!
//! ```rust,ignore
//! use fugitive_store::{create_store, DocKey, StoreConfig, DOCTYPE_KIND};
//!
//! let store = create_store(&StoreConfig::default()).await?;
//! if !store.exists(DOCTYPE_KIND, &DocKey::name("Fugitive Simple")).await? {
//!     // ...
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use fugitive_core::DocTypeSchema;
use serde::{Deserialize, Serialize};

use crate::document::{DocKey, Document, DocumentHandle, Fields};
use crate::error::{Error, Result};
use crate::json_file::JsonFileStore;
use crate::memory::MemoryStore;

/// Default database file name under the data directory.
const DEFAULT_DB_FILE: &str = "fugitive.json";

/// Application directory name under platform data/config dirs.
pub const APP_DIR: &str = "fugitive-setup";

/// Abstract persistence service.
///
/// Writes are staged until [`commit`](Self::commit); reads see staged
/// writes. Each logical operation ends in exactly one `commit` on success
/// or one `rollback` on failure.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns `true` if a document of `kind` matches `key`.
    async fn exists(&self, kind: &str, key: &DocKey) -> Result<bool>;

    /// Allocates an unsaved document of `kind` holding `fields`.
    ///
    /// `kind` must be `DocType` or have a registered table.
    async fn create(&self, kind: &str, fields: Fields) -> Result<DocumentHandle>;

    /// Validates and stages the document; returns its name.
    async fn save(&self, handle: DocumentHandle) -> Result<String>;

    /// Stages the table for a DocType whose document has been saved.
    async fn create_table(&self, schema: &DocTypeSchema) -> Result<()>;

    /// Documents of `kind`, ordered by name.
    async fn list(&self, kind: &str) -> Result<Vec<Document>>;

    /// Stages removal of a document; `false` if it did not exist.
    async fn delete(&self, kind: &str, name: &str) -> Result<bool>;

    /// Publishes everything staged since the last commit or rollback.
    async fn commit(&self) -> Result<()>;

    /// Discards everything staged since the last commit or rollback.
    async fn rollback(&self) -> Result<()>;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;
}

/// Which backend [`create_store`] builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// In-process store.
    Memory,
    /// JSON file store.
    #[default]
    Json,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Json => write!(f, "json"),
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend type: "memory" or "json".
    #[serde(default)]
    pub backend: StoreBackend,

    /// Database file for the json backend. `~` is expanded. Defaults to
    /// `<data dir>/fugitive-setup/fugitive.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl StoreConfig {
    /// Resolves the database file path.
    pub fn resolved_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(PathBuf::from(shellexpand::tilde(path).as_ref())),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR).join(DEFAULT_DB_FILE))
                .ok_or_else(|| {
                    Error::Core(fugitive_core::Error::config(
                        "Could not determine data directory for this platform",
                    ))
                }),
        }
    }
}

/// Create a document store based on configuration.
///
/// # Errors
///
/// Returns an error if the database file exists but cannot be read or
/// parsed.
pub async fn create_store(config: &StoreConfig) -> Result<Box<dyn DocumentStore>> {
    match config.backend {
        StoreBackend::Memory => Ok(Box::new(MemoryStore::new())),
        StoreBackend::Json => {
            let path = config.resolved_path()?;
            Ok(Box::new(JsonFileStore::open(path).await?))
        }
    }
}
