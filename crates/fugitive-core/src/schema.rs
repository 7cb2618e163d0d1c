//! Declarative DocType schema.
//!
//! A [`DocTypeSchema`] describes one document kind for the metadata-driven
//! store: its fields, permission rows and behaviour flags. The Fugitive
//! Simple declaration ships embedded in this crate as TOML; callers parse it
//! once at startup and pass it by reference.
//!
//! # Example
//!
//! ```rust
//! use fugitive_core::{DocTypeSchema, FieldType};
//!
//! let schema = DocTypeSchema::fugitive_simple()?;
//! assert_eq!(schema.name, "Fugitive Simple");
//! assert_eq!(schema.field("gwp").map(|f| f.fieldtype), Some(FieldType::Float));
//! # Ok::<(), fugitive_core::Error>(())
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Kind under which DocType definitions themselves are stored.
pub const DOCTYPE_KIND: &str = "DocType";

/// Embedded Fugitive Simple declaration.
const FUGITIVE_SIMPLE_TOML: &str = include_str!("../data/fugitive_simple.toml");

/// Storage type of a DocType field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Integer.
    Int,
    /// Floating point number.
    Float,
    /// Short free text.
    Data,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// One of a newline-separated option list.
    Select,
    /// File attachment reference.
    Attach,
    /// Name of a document of another kind.
    Link,
    /// Layout-only separator; holds no value.
    #[serde(rename = "Section Break")]
    SectionBreak,
}

impl FieldType {
    /// Returns `true` for fields that only affect form layout.
    pub fn is_layout(&self) -> bool {
        matches!(self, FieldType::SectionBreak)
    }

    /// Returns `true` if `value` is storable in a field of this type.
    ///
    /// `Null` is always accepted; required-ness is checked separately.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        match self {
            FieldType::Int => value.is_i64() || value.is_u64(),
            FieldType::Float => value.is_number(),
            FieldType::Data | FieldType::Select | FieldType::Attach | FieldType::Link => {
                value.is_string()
            }
            FieldType::Date => value
                .as_str()
                .is_some_and(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
            FieldType::SectionBreak => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::SectionBreak => write!(f, "Section Break"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// One field of a DocType.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Column name.
    pub fieldname: String,

    /// Form label.
    pub label: String,

    /// Storage type.
    pub fieldtype: FieldType,

    /// Select options (newline-separated) or Link target kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,

    /// Value must be present on save.
    #[serde(default)]
    pub reqd: bool,

    /// Value must be unique across documents of the kind.
    #[serde(default)]
    pub unique: bool,

    /// Not editable in forms.
    #[serde(default)]
    pub read_only: bool,

    /// Shown in list views.
    #[serde(default)]
    pub in_list_view: bool,

    /// Offered as a standard list filter.
    #[serde(default)]
    pub in_standard_filter: bool,

    /// Value applied when the field is missing on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// 1-based position in the form.
    pub idx: u32,
}

impl FieldSpec {
    /// Select options as a list; empty for non-select fields.
    pub fn select_options(&self) -> Vec<&str> {
        match (self.fieldtype, &self.options) {
            (FieldType::Select, Some(options)) => options
                .lines()
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Role permission row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Permission {
    pub role: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
    #[serde(default)]
    pub create: bool,
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub submit: bool,
    #[serde(default)]
    pub cancel: bool,
    #[serde(default)]
    pub amend: bool,
    #[serde(default)]
    pub report: bool,
    #[serde(default)]
    pub export: bool,
    #[serde(default)]
    pub share: bool,
    #[serde(default)]
    pub print: bool,
    #[serde(default)]
    pub email: bool,
}

/// A document kind declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocTypeSchema {
    /// DocType name, also the kind of its documents.
    pub name: String,

    /// Owning module.
    pub module: String,

    /// Child table DocType.
    #[serde(default)]
    pub istable: bool,

    /// Single-document DocType.
    #[serde(default)]
    pub issingle: bool,

    /// Tree-structured DocType.
    #[serde(default)]
    pub istree: bool,

    /// Allow quick entry dialog.
    #[serde(default)]
    pub quick_entry: bool,

    /// Keep a version history.
    #[serde(default)]
    pub track_changes: bool,

    /// Documents may be renamed.
    #[serde(default)]
    pub allow_rename: bool,

    /// Data import allowed.
    #[serde(default)]
    pub allow_import: bool,

    /// Data export allowed.
    #[serde(default)]
    pub allow_export: bool,

    /// Printing allowed.
    #[serde(default)]
    pub allow_print: bool,

    /// Emailing allowed.
    #[serde(default)]
    pub allow_email: bool,

    /// Copying allowed.
    #[serde(default)]
    pub allow_copy: bool,

    /// Grid rows editable inline.
    #[serde(default)]
    pub editable_grid: bool,

    /// Table engine.
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Fields in form order.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,

    /// Role permissions.
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

fn default_engine() -> String {
    "InnoDB".to_string()
}

impl DocTypeSchema {
    /// Parses and validates the embedded Fugitive Simple declaration.
    pub fn fugitive_simple() -> Result<Self> {
        Self::from_toml_str(FUGITIVE_SIMPLE_TOML)
    }

    /// Parses and validates a declaration from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let schema: Self = toml::from_str(s)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Reads, parses and validates a declaration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let schema = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), doctype = %schema.name, "Loaded DocType schema");
        Ok(schema)
    }

    /// Parses and validates a declaration from a stored DocType document.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self> {
        let schema: Self = serde_json::from_value(Value::Object(fields.clone()))?;
        schema.validate()?;
        Ok(schema)
    }

    /// Checks the declaration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] when a fieldname repeats, `idx` does not run
    /// 1, 2, 3, ..., a Select field has no options, a Link field has no
    /// target, or a Select default is not one of its options.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::schema("DocType name must not be empty"));
        }

        let mut seen = HashSet::new();
        for (position, field) in self.fields.iter().enumerate() {
            if !seen.insert(field.fieldname.as_str()) {
                return Err(Error::schema(format!(
                    "duplicate fieldname '{}'",
                    field.fieldname
                )));
            }
            let expected = position as u32 + 1;
            if field.idx != expected {
                return Err(Error::schema(format!(
                    "field '{}' has idx {}, expected {expected}",
                    field.fieldname, field.idx
                )));
            }
            match field.fieldtype {
                FieldType::Select => {
                    let options = field.select_options();
                    if options.is_empty() {
                        return Err(Error::schema(format!(
                            "select field '{}' has no options",
                            field.fieldname
                        )));
                    }
                    if let Some(default) = field.default.as_ref().and_then(Value::as_str)
                        && !options.contains(&default)
                    {
                        return Err(Error::schema(format!(
                            "default '{default}' of '{}' is not an option",
                            field.fieldname
                        )));
                    }
                }
                FieldType::Link
                    if field.options.as_deref().is_none_or(|o| o.trim().is_empty()) =>
                {
                    return Err(Error::schema(format!(
                        "link field '{}' has no target",
                        field.fieldname
                    )));
                }
                _ => {}
            }
            if let Some(default) = &field.default
                && !field.fieldtype.accepts(default)
            {
                return Err(Error::schema(format!(
                    "default of '{}' is not a valid {}",
                    field.fieldname, field.fieldtype
                )));
            }
        }
        Ok(())
    }

    /// Looks up a field by name.
    pub fn field(&self, fieldname: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.fieldname == fieldname)
    }

    /// Fields that hold values, skipping layout fields.
    pub fn data_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| !f.fieldtype.is_layout())
    }

    /// Select options of a field; empty if absent or not a select.
    pub fn select_options(&self, fieldname: &str) -> Vec<&str> {
        self.field(fieldname)
            .map(FieldSpec::select_options)
            .unwrap_or_default()
    }

    /// The DocType document payload stored under [`DOCTYPE_KIND`].
    pub fn to_fields(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(Error::schema("DocType did not serialize to an object")),
        }
    }
}
