//! Command implementations.
//!
//! Each command takes the store handle and schema explicitly and writes
//! its report to `out`. Progress and diagnostics go through `tracing`.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use fugitive_core::{
    DocTypeSchema, EmissionRecord, EmissionSummary, Period, RawEntry, Refrigerant, Unit, build,
    build_from_fields, co2_equivalent, reference_samples,
};
use fugitive_store::{
    DocumentStore, SeedReport, SetupOutcome, add_sample_data, create_doctype, delete_record,
    insert_record,
};

use crate::cli::AddArgs;

const RULE: &str =
    "======================================================================";

/// `setup`: create the DocType, then seed if asked.
///
/// `with_samples` of `None` prompts on `input`.
pub async fn cmd_setup(
    store: &dyn DocumentStore,
    schema: &DocTypeSchema,
    with_samples: Option<bool>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "{} DOCTYPE SETUP", schema.name.to_uppercase())?;
    writeln!(out, "{RULE}")?;

    cmd_create_doctype(store, schema, out).await?;

    writeln!(out, "\n{RULE}")?;
    let add = match with_samples {
        Some(choice) => choice,
        None => prompt_yes_no(input, out, "Do you want to add sample data? (y/n): ")?,
    };
    if add {
        cmd_add_samples(store, schema, out).await?;
    }

    writeln!(out, "\n{RULE}")?;
    writeln!(out, "SETUP COMPLETE!")?;
    writeln!(out, "{RULE}")?;
    Ok(())
}

fn prompt_yes_no(input: &mut impl BufRead, out: &mut impl Write, question: &str) -> Result<bool> {
    write!(out, "{question}")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer).context("reading answer")?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// `create-doctype`.
pub async fn cmd_create_doctype(
    store: &dyn DocumentStore,
    schema: &DocTypeSchema,
    out: &mut impl Write,
) -> Result<()> {
    let outcome = create_doctype(store, schema)
        .await
        .with_context(|| format!("creating DocType '{}'", schema.name))?;
    match outcome {
        SetupOutcome::AlreadyExists => {
            writeln!(out, "{} doctype already exists.", schema.name)?;
        }
        SetupOutcome::Created => {
            writeln!(out, "{} doctype created.", schema.name)?;
            writeln!(out, "Name: {}", schema.name)?;
            writeln!(out, "Module: {}", schema.module)?;
            writeln!(out, "\nFields:")?;
            write_field_table(schema, out)?;
            writeln!(out, "\nETCO2eq = Amount Purchased (A) x GWP (B) / conversion factor")?;
            writeln!(out, "  kg: divide by 1000 to convert to tonnes")?;
            writeln!(out, "  Tonnes: no conversion")?;
        }
    }
    Ok(())
}

/// `add-samples`.
pub async fn cmd_add_samples(
    store: &dyn DocumentStore,
    schema: &DocTypeSchema,
    out: &mut impl Write,
) -> Result<SeedReport> {
    let samples = reference_samples()?;
    let report = add_sample_data(store, schema, samples)
        .await
        .context("adding sample data")?;
    if report.inserted > 0 {
        writeln!(out, "Added {} sample entries.", report.inserted)?;
    } else {
        writeln!(out, "Sample data already exists.")?;
    }
    Ok(report)
}

/// Resolves the GWP for a purchase: explicit value first, then the
/// refrigerant's reference value.
pub fn resolve_gwp(gwp: Option<f64>, refrigerant: Option<&str>) -> Result<f64> {
    if let Some(gwp) = gwp {
        return Ok(gwp);
    }
    let label = refrigerant.ok_or_else(|| anyhow!("either --gwp or --refrigerant is required"))?;
    let refrigerant: Refrigerant = label.parse()?;
    refrigerant
        .reference_gwp()
        .ok_or_else(|| anyhow!("no reference GWP for '{refrigerant}'; pass --gwp"))
}

/// `estimate`: print tCO2e for one purchase.
pub fn cmd_estimate(
    amount: f64,
    unit: &str,
    gwp: Option<f64>,
    refrigerant: Option<&str>,
    out: &mut impl Write,
) -> Result<f64> {
    let unit: Unit = unit.parse()?;
    let gwp = resolve_gwp(gwp, refrigerant)?;
    let co2eq = co2_equivalent(amount, gwp, unit)?;
    writeln!(out, "{amount} {unit} x GWP {gwp} = {co2eq} tCO2e")?;
    Ok(co2eq)
}

/// Builds the record `add` stores.
pub fn record_from_args(args: &AddArgs) -> Result<EmissionRecord> {
    let gwp = resolve_gwp(args.gwp, Some(&args.refrigerant))?;
    let mut raw = RawEntry::new(args.amount, gwp, args.unit.clone())
        .with_s_no(args.s_no)
        .with_date(args.date)
        .with_refrigerant(args.refrigerant.clone())
        .with_units(args.units);
    raw.company = args.company.clone();
    raw.company_unit = args.company_unit.clone();
    if let Some(invoice) = &args.invoice {
        raw = raw.with_invoice(invoice.clone());
    }
    Ok(build(raw)?)
}

/// `add`.
pub async fn cmd_add(
    store: &dyn DocumentStore,
    schema: &DocTypeSchema,
    args: &AddArgs,
    out: &mut impl Write,
) -> Result<String> {
    let record = record_from_args(args)?;
    let name = insert_record(store, schema, &record)
        .await
        .with_context(|| format!("adding entry {}", args.s_no))?;
    writeln!(
        out,
        "Added {name}: {} {} {} = {} tCO2e",
        args.refrigerant,
        record.purchased_amount,
        record.unit,
        record.computed_co2eq()
    )?;
    Ok(name)
}

/// `delete`: remove the entry with serial number `s_no`.
///
/// Returns `false` if no entry has that serial number.
pub async fn cmd_delete(
    store: &dyn DocumentStore,
    schema: &DocTypeSchema,
    s_no: u32,
    out: &mut impl Write,
) -> Result<bool> {
    let deleted = delete_record(store, schema, s_no)
        .await
        .with_context(|| format!("deleting entry {s_no}"))?;
    match deleted {
        Some(name) => {
            writeln!(out, "Deleted entry {s_no} ({name}).")?;
            Ok(true)
        }
        None => {
            writeln!(out, "No {} entry with S.No {s_no}.", schema.name)?;
            Ok(false)
        }
    }
}

/// Stored records of the schema's kind, rebuilt so CO2e is current.
///
/// With `company` set, only that company's records are returned.
pub async fn load_records(
    store: &dyn DocumentStore,
    schema: &DocTypeSchema,
    company: Option<&str>,
) -> Result<Vec<EmissionRecord>> {
    let docs = store.list(&schema.name).await?;
    let mut records = Vec::with_capacity(docs.len());
    for doc in docs {
        let record = build_from_fields(&doc.fields)
            .with_context(|| format!("reading {} {}", schema.name, doc.name))?;
        if company.is_none_or(|c| record.company.as_deref() == Some(c)) {
            records.push(record);
        }
    }
    records.sort_by_key(|r| r.s_no);
    Ok(records)
}

/// `list`.
pub async fn cmd_list(
    store: &dyn DocumentStore,
    schema: &DocTypeSchema,
    json: bool,
    company: Option<&str>,
    out: &mut impl Write,
) -> Result<usize> {
    let records = load_records(store, schema, company).await?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&records)?)?;
        return Ok(records.len());
    }
    if records.is_empty() {
        writeln!(out, "No {} entries.", schema.name)?;
        return Ok(0);
    }
    writeln!(
        out,
        "{:>5}  {:<10}  {:<15}  {:>10}  {:<6}  {:>8}  {:>12}",
        "S.No", "Date", "Refrigerant", "Amount", "Unit", "GWP", "tCO2e"
    )?;
    for r in &records {
        writeln!(
            out,
            "{:>5}  {:<10}  {:<15}  {:>10}  {:<6}  {:>8}  {:>12.4}",
            r.s_no.map(|n| n.to_string()).unwrap_or_default(),
            r.date.map(|d| d.to_string()).unwrap_or_default(),
            r.refrigerant.map(|x| x.label()).unwrap_or("-"),
            r.purchased_amount,
            r.unit.label(),
            r.gwp,
            r.computed_co2eq()
        )?;
    }
    Ok(records.len())
}

/// `summary`.
pub async fn cmd_summary(
    store: &dyn DocumentStore,
    schema: &DocTypeSchema,
    period: Period,
    company: Option<&str>,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<EmissionSummary> {
    let records = load_records(store, schema, company).await?;
    let summary = EmissionSummary::from_records(&records, today, period);
    writeln!(out, "Entries: {}", summary.entries)?;
    writeln!(out, "Total: {:.4} tCO2e", summary.total_co2eq)?;
    writeln!(
        out,
        "Current {}: {:.4} tCO2e",
        summary.period, summary.current_period_co2eq
    )?;
    for (label, co2eq) in &summary.by_period {
        writeln!(out, "  {label}: {co2eq:.4} tCO2e")?;
    }
    Ok(summary)
}

/// `schema`.
pub fn cmd_schema(schema: &DocTypeSchema, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(schema)?)?;
        return Ok(());
    }
    writeln!(out, "{} ({})", schema.name, schema.module)?;
    write_field_table(schema, out)?;
    writeln!(out, "\nPermissions:")?;
    for perm in &schema.permissions {
        writeln!(
            out,
            "  {}: read={} write={} create={} delete={}",
            perm.role, perm.read, perm.write, perm.create, perm.delete
        )?;
    }
    Ok(())
}

fn write_field_table(schema: &DocTypeSchema, out: &mut impl Write) -> Result<()> {
    for (i, field) in schema.data_fields().enumerate() {
        let mut line = format!(
            "  {:>2}. {} ({}) - {}",
            i + 1,
            field.fieldname,
            field.fieldtype,
            field.label
        );
        if field.reqd {
            line.push_str(" [required]");
        }
        if let Some(default) = &field.default {
            line.push_str(&format!(", default: {default}"));
        }
        writeln!(out, "{line}")?;
        let options = field.select_options();
        if !options.is_empty() {
            writeln!(out, "      Options: {}", options.join(", "))?;
        }
    }
    Ok(())
}

/// Fails unless the DocType exists; used before read commands.
pub async fn require_doctype(store: &dyn DocumentStore, schema: &DocTypeSchema) -> Result<()> {
    let key = fugitive_store::DocKey::name(&schema.name);
    if !store.exists(fugitive_store::DOCTYPE_KIND, &key).await? {
        bail!(
            "DocType '{}' does not exist; run `fugitive-setup create-doctype` first",
            schema.name
        );
    }
    Ok(())
}
