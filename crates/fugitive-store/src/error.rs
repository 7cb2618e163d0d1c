//! Error types for fugitive-store.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the document store.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from fugitive-core (record build, schema parse)
    #[error("Core error: {0}")]
    Core(#[from] fugitive_core::Error),

    /// No table is registered for the document kind
    #[error("Unknown document kind: {kind}")]
    UnknownKind {
        /// Requested kind
        kind: String,
    },

    /// The DocType has not been created yet
    #[error("DocType '{doctype}' does not exist")]
    DocTypeMissing {
        /// DocType name
        doctype: String,
    },

    /// A document with the same name or unique value exists
    #[error("Duplicate {kind}: {detail}")]
    Duplicate {
        /// Document kind
        kind: String,
        /// What collided
        detail: String,
    },

    /// Document failed validation against its DocType
    #[error("Validation failed for {kind}.{field}: {message}")]
    Validation {
        /// Document kind
        kind: String,
        /// Offending field
        field: String,
        /// What went wrong
        message: String,
    },

    /// Handle does not refer to an unsaved document
    #[error("Document handle {id} not found")]
    HandleNotFound {
        /// Handle id
        id: u64,
    },

    /// Backend failure
    #[error("Store backend error: {message}")]
    Backend {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O error with the file involved
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns whether this error is retryable.
    ///
    /// Backend and I/O failures may be transient; everything else is a
    /// property of the input.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Backend { .. } => true,
            Error::Io { .. } => true,
            Error::Core(e) => e.is_retryable(),
            Error::UnknownKind { .. } => false,
            Error::DocTypeMissing { .. } => false,
            Error::Duplicate { .. } => false,
            Error::Validation { .. } => false,
            Error::HandleNotFound { .. } => false,
            Error::Serialization(_) => false,
        }
    }

    /// Creates an unknown-kind error.
    pub fn unknown_kind<S: Into<String>>(kind: S) -> Self {
        Error::UnknownKind { kind: kind.into() }
    }

    /// Creates a DocType-missing error.
    pub fn doctype_missing<S: Into<String>>(doctype: S) -> Self {
        Error::DocTypeMissing {
            doctype: doctype.into(),
        }
    }

    /// Creates a duplicate error.
    pub fn duplicate<K: Into<String>, D: Into<String>>(kind: K, detail: D) -> Self {
        Error::Duplicate {
            kind: kind.into(),
            detail: detail.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation<K, F, M>(kind: K, field: F, message: M) -> Self
    where
        K: Into<String>,
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            kind: kind.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a backend error with a message.
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Error::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a backend error with a message and source error.
    pub fn backend_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Backend {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Wraps an I/O error with the path it occurred on.
    pub fn io_with_path(source: std::io::Error, path: &std::path::Path) -> Self {
        Error::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
