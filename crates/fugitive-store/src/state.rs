//! Committed database plus the open transaction.
//!
//! Both backends keep a [`StoreState`] behind a mutex. Reads see committed
//! documents overlaid with the pending transaction; `commit` folds the
//! pending changes in and `rollback` drops them. Backends decide what
//! committing means durably.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use fugitive_core::DocTypeSchema;
use fugitive_core::schema::DOCTYPE_KIND;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::document::{DocKey, Document, DocumentHandle, Fields};
use crate::error::{Error, Result};
use crate::validate::validate_document;

/// Length of generated document names.
const GENERATED_NAME_LEN: usize = 10;

/// Everything a store has committed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    /// Registered tables by kind.
    #[serde(default)]
    pub tables: BTreeMap<String, DocTypeSchema>,
    /// Documents by kind, then name.
    #[serde(default)]
    pub documents: BTreeMap<String, BTreeMap<String, Fields>>,
}

impl Database {
    /// Number of documents across all kinds.
    pub fn document_count(&self) -> usize {
        self.documents.values().map(BTreeMap::len).sum()
    }
}

#[derive(Debug, Default)]
struct Pending {
    tables: BTreeMap<String, DocTypeSchema>,
    inserts: BTreeMap<String, BTreeMap<String, Fields>>,
    deletes: BTreeMap<String, BTreeSet<String>>,
}

impl Pending {
    fn change_count(&self) -> usize {
        self.tables.len()
            + self.inserts.values().map(BTreeMap::len).sum::<usize>()
            + self.deletes.values().map(BTreeSet::len).sum::<usize>()
    }
}

/// Committed data, staged changes and unsaved drafts.
#[derive(Debug, Default)]
pub struct StoreState {
    committed: Database,
    pending: Pending,
    drafts: HashMap<u64, (String, Fields)>,
    next_handle: u64,
}

impl StoreState {
    /// State over an existing database with no open changes.
    pub fn new(committed: Database) -> Self {
        Self {
            committed,
            ..Default::default()
        }
    }

    /// The committed database.
    pub fn committed(&self) -> &Database {
        &self.committed
    }

    /// Number of staged changes (tables, inserts, deletes).
    pub fn pending_changes(&self) -> usize {
        self.pending.change_count()
    }

    /// The table registered for `kind`, staged or committed.
    pub fn table(&self, kind: &str) -> Option<&DocTypeSchema> {
        self.pending
            .tables
            .get(kind)
            .or_else(|| self.committed.tables.get(kind))
    }

    /// Documents of `kind` as seen inside the open transaction.
    fn view(&self, kind: &str) -> BTreeMap<&str, &Fields> {
        let deleted = self.pending.deletes.get(kind);
        let mut view: BTreeMap<&str, &Fields> = self
            .committed
            .documents
            .get(kind)
            .into_iter()
            .flatten()
            .filter(|(name, _)| deleted.is_none_or(|d| !d.contains(*name)))
            .map(|(name, fields)| (name.as_str(), fields))
            .collect();
        if let Some(inserts) = self.pending.inserts.get(kind) {
            view.extend(inserts.iter().map(|(name, fields)| (name.as_str(), fields)));
        }
        view
    }

    /// Returns `true` if a document of `kind` matches `key`.
    pub fn exists(&self, kind: &str, key: &DocKey) -> bool {
        self.view(kind)
            .into_iter()
            .any(|(name, fields)| key.matches(name, fields))
    }

    /// Documents of `kind`, ordered by name.
    pub fn list(&self, kind: &str) -> Vec<Document> {
        self.view(kind)
            .into_iter()
            .map(|(name, fields)| Document {
                kind: kind.to_string(),
                name: name.to_string(),
                fields: fields.clone(),
            })
            .collect()
    }

    /// Allocates an unsaved draft.
    pub fn create(&mut self, kind: &str, fields: Fields) -> Result<DocumentHandle> {
        if kind != DOCTYPE_KIND && self.table(kind).is_none() {
            return Err(Error::unknown_kind(kind));
        }
        self.next_handle += 1;
        let id = self.next_handle;
        self.drafts.insert(id, (kind.to_string(), fields));
        Ok(DocumentHandle {
            id,
            kind: kind.to_string(),
        })
    }

    /// Validates and stages a draft, returning the document name.
    ///
    /// The draft is consumed whether or not validation succeeds.
    pub fn save(&mut self, handle: DocumentHandle) -> Result<String> {
        let (kind, mut fields) = self
            .drafts
            .remove(&handle.id)
            .ok_or(Error::HandleNotFound { id: handle.id })?;

        let name = if kind == DOCTYPE_KIND {
            DocTypeSchema::from_fields(&fields)?.name
        } else {
            let schema = self
                .table(&kind)
                .cloned()
                .ok_or_else(|| Error::unknown_kind(&kind))?;
            validate_document(&schema, &mut fields)?;
            self.check_unique(&schema, &fields)?;
            match fields.get("name").and_then(Value::as_str) {
                Some(name) => name.to_string(),
                None => generate_name(),
            }
        };

        if self.exists(&kind, &DocKey::name(&name)) {
            return Err(Error::duplicate(&kind, &name));
        }

        tracing::debug!(kind = %kind, name = %name, "Staged document");
        self.pending
            .inserts
            .entry(kind)
            .or_default()
            .insert(name.clone(), fields);
        Ok(name)
    }

    fn check_unique(&self, schema: &DocTypeSchema, fields: &Fields) -> Result<()> {
        for field in schema.data_fields().filter(|f| f.unique) {
            let Some(value) = fields.get(&field.fieldname).filter(|v| !v.is_null()) else {
                continue;
            };
            if self.exists(&schema.name, &DocKey::field(&field.fieldname, value.clone())) {
                return Err(Error::duplicate(
                    &schema.name,
                    format!("{} = {value}", field.fieldname),
                ));
            }
        }
        Ok(())
    }

    /// Stages a table for `schema`; its DocType document must exist.
    pub fn create_table(&mut self, schema: &DocTypeSchema) -> Result<()> {
        if !self.exists(DOCTYPE_KIND, &DocKey::name(&schema.name)) {
            return Err(Error::doctype_missing(&schema.name));
        }
        tracing::debug!(kind = %schema.name, fields = schema.fields.len(), "Staged table");
        self.pending
            .tables
            .insert(schema.name.clone(), schema.clone());
        Ok(())
    }

    /// Stages a deletion; returns `false` if no such document is visible.
    pub fn delete(&mut self, kind: &str, name: &str) -> bool {
        if let Some(inserts) = self.pending.inserts.get_mut(kind)
            && inserts.remove(name).is_some()
        {
            return true;
        }
        let committed = self
            .committed
            .documents
            .get(kind)
            .is_some_and(|docs| docs.contains_key(name));
        if !committed {
            return false;
        }
        self.pending
            .deletes
            .entry(kind.to_string())
            .or_default()
            .insert(name.to_string())
    }

    /// The database as it would look after `commit`.
    pub fn merged(&self) -> Database {
        let mut db = self.committed.clone();
        for (kind, schema) in &self.pending.tables {
            db.tables.insert(kind.clone(), schema.clone());
        }
        for (kind, names) in &self.pending.deletes {
            if let Some(docs) = db.documents.get_mut(kind) {
                for name in names {
                    docs.remove(name);
                }
            }
        }
        for (kind, inserts) in &self.pending.inserts {
            db.documents
                .entry(kind.clone())
                .or_default()
                .extend(inserts.iter().map(|(n, f)| (n.clone(), f.clone())));
        }
        db
    }

    /// Publishes the pending changes; returns how many there were.
    pub fn commit(&mut self) -> usize {
        let changes = self.pending.change_count();
        self.committed = self.merged();
        self.pending = Pending::default();
        changes
    }

    /// Replaces the committed database after a durable write of `db`.
    pub fn commit_to(&mut self, db: Database) -> usize {
        let changes = self.pending.change_count();
        self.committed = db;
        self.pending = Pending::default();
        changes
    }

    /// Discards the pending changes; returns how many there were.
    pub fn rollback(&mut self) -> usize {
        let changes = self.pending.change_count();
        self.pending = Pending::default();
        changes
    }
}

fn generate_name() -> String {
    let mut name = Uuid::new_v4().simple().to_string();
    name.truncate(GENERATED_NAME_LEN);
    name
}
