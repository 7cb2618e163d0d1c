//! Configuration for `fugitive-setup`.
//!
//! Resolution order for the file: `--config`, then `FUGITIVE_CONFIG` (both
//! arrive through clap), then `<config dir>/fugitive-setup/config.toml`.
//! Every section and field has a default, so an empty or missing default
//! file is a valid configuration.

use std::path::{Path, PathBuf};

use fugitive_core::{DocTypeSchema, Error, Result};
use fugitive_store::StoreConfig;
use fugitive_store::backend::APP_DIR;
use serde::{Deserialize, Serialize};

/// Config file name under the platform config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetupConfig {
    /// Document store selection.
    #[serde(default)]
    pub store: StoreConfig,

    /// DocType schema source.
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Log filtering.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the DocType definition comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// TOML schema file; the embedded definition is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl SetupConfig {
    /// Platform default config path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// The explicit path (tilde-expanded) or the platform default.
    pub fn resolve_path(explicit: Option<&str>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(expand(path)),
            None => Self::default_path(),
        }
    }

    /// Loads the configuration.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let Some(path) = Self::resolve_path(explicit) else {
            tracing::debug!("No config directory on this platform, using defaults");
            return Ok(Self::default());
        };
        if !path.exists() {
            if explicit.is_some() {
                return Err(Error::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::from_path(&path)
    }

    /// Parses a config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// The configured DocType schema, falling back to the embedded one.
    pub fn load_schema(&self) -> Result<DocTypeSchema> {
        match &self.schema.path {
            Some(path) => DocTypeSchema::from_path(&expand(path)),
            None => DocTypeSchema::fugitive_simple(),
        }
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
