//! DocType-driven document validation.
//!
//! Applied on every save, mirroring what the host framework does before an
//! insert: defaults fill missing values, then required fields, field types
//! and select options are checked. Uniqueness needs the other documents of
//! the kind and is checked by [`StoreState`](crate::state::StoreState).

use fugitive_core::{DocTypeSchema, FieldType};
use serde_json::Value;

use crate::document::Fields;
use crate::error::{Error, Result};

/// Field every stored document may carry besides its DocType fields.
const NAME_FIELD: &str = "name";

/// Validates `fields` against `schema`, filling defaults in place.
pub fn validate_document(schema: &DocTypeSchema, fields: &mut Fields) -> Result<()> {
    let kind = schema.name.as_str();

    if let Some(unknown) = fields
        .keys()
        .find(|key| *key != NAME_FIELD && schema.data_fields().all(|f| &f.fieldname != *key))
    {
        return Err(Error::validation(kind, unknown.as_str(), "unknown field"));
    }

    for field in schema.data_fields() {
        let name = field.fieldname.as_str();

        if let Some(default) = &field.default
            && fields.get(name).is_none_or(Value::is_null)
        {
            fields.insert(name.to_string(), default.clone());
        }

        match fields.get(name) {
            None | Some(Value::Null) => {
                if field.reqd {
                    return Err(Error::validation(kind, name, "is required"));
                }
            }
            Some(Value::String(s)) if s.trim().is_empty() && field.reqd => {
                return Err(Error::validation(kind, name, "is required"));
            }
            Some(value) => {
                if !field.fieldtype.accepts(value) {
                    return Err(Error::validation(
                        kind,
                        name,
                        format!("expected {}, got {value}", field.fieldtype),
                    ));
                }
                if field.fieldtype == FieldType::Select {
                    let options = field.select_options();
                    let chosen = value.as_str().unwrap_or_default();
                    if !options.contains(&chosen) {
                        return Err(Error::validation(
                            kind,
                            name,
                            format!("'{chosen}' is not one of: {}", options.join(", ")),
                        ));
                    }
                }
            }
        }
    }
    Ok(())
}
