//! DocType registration and seeding.
//!
//! Every operation here is one transaction: it ends in a single `commit` on
//! success, or a single `rollback` (logged, then returned) once anything
//! has been staged and a step fails.

use std::future::Future;

use fugitive_core::schema::DOCTYPE_KIND;
use fugitive_core::{DocTypeSchema, EmissionRecord, RawEntry, build};
use serde_json::Value;

use crate::backend::DocumentStore;
use crate::document::{DocKey, Fields};
use crate::error::{Error, Result};

/// Result of [`create_doctype`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    /// The DocType was registered by this call.
    Created,
    /// The DocType was already registered; nothing changed.
    AlreadyExists,
}

/// Result of [`add_sample_data`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Samples inserted by this call.
    pub inserted: usize,
    /// Samples skipped because their `s_no` was already stored.
    pub skipped: usize,
}

/// Runs `op`, then commits; rolls back and logs if either fails.
async fn in_transaction<T, F>(store: &dyn DocumentStore, operation: &str, op: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let outcome = match op.await {
        Ok(value) => store.commit().await.map(|()| value),
        Err(e) => Err(e),
    };
    if let Err(e) = &outcome {
        tracing::error!(operation, store = store.name(), error = %e, "Operation failed, rolling back");
        if let Err(rollback_err) = store.rollback().await {
            tracing::error!(operation, error = %rollback_err, "Rollback failed");
        }
    }
    outcome
}

/// Registers `schema` as a DocType and creates its table.
///
/// Returns [`SetupOutcome::AlreadyExists`] without touching the store if a
/// DocType of that name is present.
pub async fn create_doctype(store: &dyn DocumentStore, schema: &DocTypeSchema) -> Result<SetupOutcome> {
    if store.exists(DOCTYPE_KIND, &DocKey::name(&schema.name)).await? {
        tracing::info!(doctype = %schema.name, "DocType already exists");
        return Ok(SetupOutcome::AlreadyExists);
    }

    tracing::info!(doctype = %schema.name, module = %schema.module, "Creating DocType");
    in_transaction(store, "create_doctype", async {
        let handle = store.create(DOCTYPE_KIND, schema.to_fields()?).await?;
        store.save(handle).await?;
        store.create_table(schema).await?;
        Ok(())
    })
    .await?;

    tracing::info!(doctype = %schema.name, fields = schema.fields.len(), "DocType created");
    Ok(SetupOutcome::Created)
}

/// Builds and inserts `samples`, skipping any whose `s_no` is already
/// stored.
///
/// # Errors
///
/// [`Error::DocTypeMissing`] if the DocType has not been created. Build and
/// save failures roll back every sample staged by this call.
pub async fn add_sample_data(
    store: &dyn DocumentStore,
    schema: &DocTypeSchema,
    samples: Vec<RawEntry>,
) -> Result<SeedReport> {
    if !store.exists(DOCTYPE_KIND, &DocKey::name(&schema.name)).await? {
        tracing::warn!(doctype = %schema.name, "Cannot seed before the DocType exists");
        return Err(Error::doctype_missing(&schema.name));
    }

    let report = in_transaction(store, "add_sample_data", async {
        let mut report = SeedReport::default();
        for raw in samples {
            let record = build(raw)?;
            if let Some(s_no) = record.s_no
                && store.exists(&schema.name, &DocKey::field("s_no", s_no)).await?
            {
                tracing::debug!(s_no, "Sample already present");
                report.skipped += 1;
                continue;
            }
            stage_record(store, schema, &record).await?;
            tracing::info!(
                refrigerant = ?record.refrigerant,
                amount = record.purchased_amount,
                unit = %record.unit,
                "Added sample"
            );
            report.inserted += 1;
        }
        Ok(report)
    })
    .await?;

    tracing::info!(inserted = report.inserted, skipped = report.skipped, "Sample data done");
    Ok(report)
}

/// Saves one built record and commits; returns the document name.
pub async fn insert_record(
    store: &dyn DocumentStore,
    schema: &DocTypeSchema,
    record: &EmissionRecord,
) -> Result<String> {
    let name = in_transaction(store, "insert_record", stage_record(store, schema, record)).await?;
    tracing::info!(doctype = %schema.name, name = %name, s_no = ?record.s_no, "Inserted record");
    Ok(name)
}

/// Deletes the entry with serial number `s_no` and commits.
///
/// Returns the deleted document's name, or `None` without touching the
/// store when no entry has that serial number.
///
/// # Errors
///
/// [`Error::DocTypeMissing`] if the DocType has not been created. A failed
/// delete or commit is rolled back.
pub async fn delete_record(
    store: &dyn DocumentStore,
    schema: &DocTypeSchema,
    s_no: u32,
) -> Result<Option<String>> {
    if !store.exists(DOCTYPE_KIND, &DocKey::name(&schema.name)).await? {
        return Err(Error::doctype_missing(&schema.name));
    }

    let key = DocKey::field("s_no", s_no);
    let Some(doc) = store
        .list(&schema.name)
        .await?
        .into_iter()
        .find(|doc| key.matches(&doc.name, &doc.fields))
    else {
        tracing::warn!(doctype = %schema.name, s_no, "No entry to delete");
        return Ok(None);
    };

    in_transaction(store, "delete_record", async {
        if store.delete(&schema.name, &doc.name).await? {
            Ok(())
        } else {
            Err(Error::backend(format!("{} {} disappeared before delete", schema.name, doc.name)))
        }
    })
    .await?;

    tracing::info!(doctype = %schema.name, name = %doc.name, s_no, "Deleted record");
    Ok(Some(doc.name))
}

async fn stage_record(
    store: &dyn DocumentStore,
    schema: &DocTypeSchema,
    record: &EmissionRecord,
) -> Result<String> {
    let handle = store.create(&schema.name, record_fields(record)?).await?;
    store.save(handle).await
}

fn record_fields(record: &EmissionRecord) -> Result<Fields> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields),
        other => Err(Error::backend(format!("record serialized to non-object: {other}"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use fugitive_core::reference_samples;

    fn schema() -> DocTypeSchema {
        DocTypeSchema::fugitive_simple().unwrap()
    }

    #[tokio::test]
    async fn test_create_doctype_then_already_exists() {
        let store = MemoryStore::new();
        let schema = schema();
        assert_eq!(create_doctype(&store, &schema).await.unwrap(), SetupOutcome::Created);
        assert_eq!(
            create_doctype(&store, &schema).await.unwrap(),
            SetupOutcome::AlreadyExists
        );
        assert_eq!(store.snapshot().await.document_count(), 1);
    }

    #[tokio::test]
    async fn test_seed_requires_doctype() {
        let store = MemoryStore::new();
        let err = add_sample_data(&store, &schema(), reference_samples().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DocTypeMissing { .. }));
    }

    #[tokio::test]
    async fn test_seed_twice_skips_existing() {
        let store = MemoryStore::new();
        let schema = schema();
        create_doctype(&store, &schema).await.unwrap();

        let first = add_sample_data(&store, &schema, reference_samples().unwrap())
            .await
            .unwrap();
        assert_eq!(first, SeedReport { inserted: 3, skipped: 0 });

        let second = add_sample_data(&store, &schema, reference_samples().unwrap())
            .await
            .unwrap();
        assert_eq!(second, SeedReport { inserted: 0, skipped: 3 });
        assert_eq!(store.list("Fugitive Simple").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_stored_etco2eq_is_recomputed() {
        let store = MemoryStore::new();
        let schema = schema();
        create_doctype(&store, &schema).await.unwrap();
        let raw = RawEntry::new(10.5, 1430.0, "kg")
            .with_s_no(9)
            .with_date(chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
            .with_refrigerant("R134a")
            .with_units(1.0)
            .with_etco2eq(999.0);
        add_sample_data(&store, &schema, vec![raw]).await.unwrap();

        let docs = store.list("Fugitive Simple").await.unwrap();
        assert_eq!(docs[0].fields["etco2eq"], 15.015);
    }

    #[tokio::test]
    async fn test_bad_sample_rolls_back_whole_batch() {
        let store = MemoryStore::new();
        let schema = schema();
        create_doctype(&store, &schema).await.unwrap();

        let mut samples = reference_samples().unwrap();
        samples.push(RawEntry::new(1.0, 10.0, "Pounds").with_s_no(4));
        let err = add_sample_data(&store, &schema, samples).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Core(fugitive_core::Error::InvalidUnit { .. })
        ));
        assert!(store.list("Fugitive Simple").await.unwrap().is_empty());
        assert_eq!(store.pending_changes().await, 0);
    }

    #[tokio::test]
    async fn test_insert_record_commits() {
        let store = MemoryStore::new();
        let schema = schema();
        create_doctype(&store, &schema).await.unwrap();
        let record = build(reference_samples().unwrap().remove(0)).unwrap();

        let name = insert_record(&store, &schema, &record).await.unwrap();
        let db = store.snapshot().await;
        assert!(db.documents["Fugitive Simple"].contains_key(&name));
    }

    #[tokio::test]
    async fn test_delete_record_by_serial_number() {
        let store = MemoryStore::new();
        let schema = schema();
        create_doctype(&store, &schema).await.unwrap();
        add_sample_data(&store, &schema, reference_samples().unwrap())
            .await
            .unwrap();

        let name = delete_record(&store, &schema, 2).await.unwrap().unwrap();
        let db = store.snapshot().await;
        assert!(!db.documents["Fugitive Simple"].contains_key(&name));
        assert_eq!(db.documents["Fugitive Simple"].len(), 2);
        assert!(
            !store
                .exists("Fugitive Simple", &DocKey::field("s_no", 2))
                .await
                .unwrap()
        );
        assert_eq!(store.pending_changes().await, 0);
    }

    #[tokio::test]
    async fn test_delete_missing_serial_number_is_none() {
        let store = MemoryStore::new();
        let schema = schema();
        create_doctype(&store, &schema).await.unwrap();
        assert_eq!(delete_record(&store, &schema, 7).await.unwrap(), None);

        let err = delete_record(&MemoryStore::new(), &schema, 1).await.unwrap_err();
        assert!(matches!(err, Error::DocTypeMissing { .. }));
    }

    #[tokio::test]
    async fn test_insert_duplicate_s_no_fails() {
        let store = MemoryStore::new();
        let schema = schema();
        create_doctype(&store, &schema).await.unwrap();
        let record = build(reference_samples().unwrap().remove(0)).unwrap();

        insert_record(&store, &schema, &record).await.unwrap();
        let err = insert_record(&store, &schema, &record).await.unwrap_err();
        assert!(matches!(err, Error::Duplicate { .. }));
        assert_eq!(store.list("Fugitive Simple").await.unwrap().len(), 1);
    }
}
