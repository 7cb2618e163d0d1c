//! Emission record builder.
//!
//! ETCO2eq is the purchased amount times the refrigerant's GWP, expressed
//! in tonnes of CO2 equivalent. GWP is defined per tonne of refrigerant, so
//! kilogram purchases are divided by 1000 and tonne purchases are not.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::types::{EmissionRecord, RawEntry, Refrigerant, Unit};

/// Tolerance below which a supplied CO2e is considered to agree.
const AGREEMENT_EPSILON: f64 = 1e-9;

/// Computes tonnes of CO2 equivalent for a purchase.
///
/// # Errors
///
/// Returns [`Error::InvalidQuantity`] when `purchased_amount` or `gwp` is
/// negative or not finite.
pub fn co2_equivalent(purchased_amount: f64, gwp: f64, unit: Unit) -> Result<f64> {
    check_quantity("amount_purchased", purchased_amount)?;
    check_quantity("gwp", gwp)?;
    Ok(match unit {
        Unit::Kilograms => purchased_amount * gwp / unit.conversion_factor(),
        Unit::Tonnes => purchased_amount * gwp,
    })
}

/// Builds an [`EmissionRecord`] from raw input.
///
/// The derived CO2e is always recomputed; any `etco2eq` carried by `raw`
/// is discarded.
///
/// # Errors
///
/// - [`Error::InvalidUnit`] when the unit label is not `Tonnes` or `kg`
/// - [`Error::InvalidQuantity`] when the amount or GWP is negative
/// - [`Error::UnknownRefrigerant`] when a refrigerant label is present but
///   not one of the DocType options
/// - [`Error::Validation`] when the serial number is zero
pub fn build(raw: RawEntry) -> Result<EmissionRecord> {
    let unit: Unit = raw.unit.parse()?;
    let computed_co2eq = co2_equivalent(raw.purchased_amount, raw.gwp, unit)?;

    let refrigerant = raw
        .type_refrigeration
        .as_deref()
        .map(str::parse::<Refrigerant>)
        .transpose()?;

    if raw.s_no == Some(0) {
        return Err(Error::validation_field("s_no", "must be a positive integer"));
    }

    if let Some(supplied) = raw.etco2eq
        && (supplied - computed_co2eq).abs() > AGREEMENT_EPSILON
    {
        tracing::debug!(
            s_no = ?raw.s_no,
            supplied,
            computed = computed_co2eq,
            "Discarding supplied etco2eq"
        );
    }

    Ok(EmissionRecord {
        s_no: raw.s_no,
        date: raw.date,
        invoice_no: raw.invoice_no,
        upload_invoice: raw.upload_invoice,
        refrigerant,
        approach_type: raw.approach_type,
        purchased_amount: raw.purchased_amount,
        no_of_units: raw.no_of_units,
        unit,
        gwp: raw.gwp,
        computed_co2eq,
        company: raw.company,
        company_unit: raw.company_unit,
    })
}

/// Builds a record from a stored document's field map.
///
/// Unknown keys (document metadata such as `name`) are ignored.
pub fn build_from_fields(fields: &Map<String, Value>) -> Result<EmissionRecord> {
    let raw: RawEntry = serde_json::from_value(Value::Object(fields.clone()))?;
    build(raw)
}

fn check_quantity(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_quantity(field, value))
    }
}
