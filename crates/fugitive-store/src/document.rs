//! Documents, handles and lookup keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Field map of a document.
pub type Fields = Map<String, Value>;

/// A saved document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document kind (DocType name).
    pub kind: String,
    /// Unique name within the kind.
    pub name: String,
    /// Field values.
    pub fields: Fields,
}

/// Opaque reference to an unsaved document created by
/// [`DocumentStore::create`](crate::DocumentStore::create).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentHandle {
    pub(crate) id: u64,
    pub(crate) kind: String,
}

impl DocumentHandle {
    /// Kind the document will be saved under.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Handle id, unique per store instance.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

/// How [`DocumentStore::exists`](crate::DocumentStore::exists) identifies a
/// document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocKey {
    /// Exact document name.
    Name(String),
    /// Every listed field must equal the given value.
    Filter(Fields),
}

impl DocKey {
    /// Key by document name.
    pub fn name(name: impl Into<String>) -> Self {
        DocKey::Name(name.into())
    }

    /// Key by a single field value.
    pub fn field(field: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut filter = Fields::new();
        filter.insert(field.into(), value.into());
        DocKey::Filter(filter)
    }

    /// Returns `true` if the named document with `fields` matches this key.
    pub fn matches(&self, name: &str, fields: &Fields) -> bool {
        match self {
            DocKey::Name(wanted) => wanted == name,
            DocKey::Filter(filter) => filter
                .iter()
                .all(|(field, value)| fields.get(field) == Some(value)),
        }
    }
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocKey::Name(name) => write!(f, "{name}"),
            DocKey::Filter(filter) => write!(f, "{}", Value::Object(filter.clone())),
        }
    }
}
