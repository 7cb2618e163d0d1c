//! Raw input and built emission records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Refrigerant, Unit};

/// Approach label stored on every Simple-method entry.
pub const SIMPLE_METHOD: &str = "Simple Method";

/// Unvalidated attributes for one refrigerant purchase.
///
/// Field names follow the DocType fieldnames so a stored document or a
/// sample row deserializes directly. Only the amount, GWP and unit are
/// needed to build a record; everything else passes through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    /// Sequence number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s_no: Option<u32>,

    /// Purchase date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Invoice reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_no: Option<String>,

    /// Attached invoice file reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_invoice: Option<String>,

    /// Refrigerant label, parsed during build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_refrigeration: Option<String>,

    /// Approach label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approach_type: Option<String>,

    /// Amount purchased (A).
    #[serde(rename = "amount_purchased")]
    pub purchased_amount: f64,

    /// Number of units (D).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_of_units: Option<f64>,

    /// Unit label, parsed during build.
    #[serde(rename = "unit_selection")]
    pub unit: String,

    /// Global warming potential (B).
    pub gwp: f64,

    /// Caller-supplied CO2e; never trusted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etco2eq: Option<f64>,

    /// Owning company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Company unit (site or branch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_unit: Option<String>,
}

impl RawEntry {
    /// Creates a raw entry from the three inputs the formula needs.
    pub fn new(purchased_amount: f64, gwp: f64, unit: impl Into<String>) -> Self {
        Self {
            purchased_amount,
            gwp,
            unit: unit.into(),
            ..Default::default()
        }
    }

    /// Sets the sequence number.
    pub fn with_s_no(mut self, s_no: u32) -> Self {
        self.s_no = Some(s_no);
        self
    }

    /// Sets the purchase date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the refrigerant label.
    pub fn with_refrigerant(mut self, label: impl Into<String>) -> Self {
        self.type_refrigeration = Some(label.into());
        self
    }

    /// Sets the invoice reference.
    pub fn with_invoice(mut self, invoice_no: impl Into<String>) -> Self {
        self.invoice_no = Some(invoice_no.into());
        self
    }

    /// Sets the number of units.
    pub fn with_units(mut self, no_of_units: f64) -> Self {
        self.no_of_units = Some(no_of_units);
        self
    }

    /// Sets the company and company unit.
    pub fn with_company(
        mut self,
        company: impl Into<String>,
        company_unit: Option<String>,
    ) -> Self {
        self.company = Some(company.into());
        self.company_unit = company_unit;
        self
    }

    /// Sets a caller-computed CO2e, which the builder will discard.
    pub fn with_etco2eq(mut self, etco2eq: f64) -> Self {
        self.etco2eq = Some(etco2eq);
        self
    }
}

/// One validated fugitive-emission entry with its derived CO2e.
///
/// Only [`crate::build`] constructs records, so `computed_co2eq` always
/// matches the amount, GWP and unit it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionRecord {
    /// Sequence number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s_no: Option<u32>,

    /// Purchase date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Invoice reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_no: Option<String>,

    /// Attached invoice file reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_invoice: Option<String>,

    /// Refrigerant type.
    #[serde(rename = "type_refrigeration", skip_serializing_if = "Option::is_none")]
    pub refrigerant: Option<Refrigerant>,

    /// Approach label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approach_type: Option<String>,

    /// Amount purchased, in `unit`.
    #[serde(rename = "amount_purchased")]
    pub purchased_amount: f64,

    /// Number of units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_of_units: Option<f64>,

    /// Purchase unit.
    #[serde(rename = "unit_selection")]
    pub unit: Unit,

    /// Global warming potential.
    pub gwp: f64,

    #[serde(rename = "etco2eq")]
    pub(crate) computed_co2eq: f64,

    /// Owning company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Company unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_unit: Option<String>,
}

impl EmissionRecord {
    /// Emissions in tonnes of CO2 equivalent.
    pub fn computed_co2eq(&self) -> f64 {
        self.computed_co2eq
    }

    /// Amount purchased, normalized to tonnes.
    pub fn purchased_tonnes(&self) -> f64 {
        self.unit.to_tonnes(self.purchased_amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_entry_deserializes_doctype_fieldnames() {
        let json = r#"{
            "s_no": 2,
            "date": "2024-02-20",
            "type_refrigeration": "R410A",
            "amount_purchased": 0.025,
            "unit_selection": "Tonnes",
            "gwp": 2088
        }"#;
        let raw: RawEntry = serde_json::from_str(json).unwrap();
        assert_eq!(raw.s_no, Some(2));
        assert_eq!(raw.date, NaiveDate::from_ymd_opt(2024, 2, 20));
        assert_eq!(raw.unit, "Tonnes");
        assert_eq!(raw.gwp, 2088.0);
        assert_eq!(raw.etco2eq, None);
    }

    #[test]
    fn test_raw_entry_builder_methods() {
        let raw = RawEntry::new(5.0, 1430.0, "kg")
            .with_s_no(7)
            .with_refrigerant("R134a")
            .with_invoice("INV-7")
            .with_units(2.0)
            .with_company("Acme", Some("Plant 1".to_string()));
        assert_eq!(raw.s_no, Some(7));
        assert_eq!(raw.type_refrigeration.as_deref(), Some("R134a"));
        assert_eq!(raw.invoice_no.as_deref(), Some("INV-7"));
        assert_eq!(raw.no_of_units, Some(2.0));
        assert_eq!(raw.company_unit.as_deref(), Some("Plant 1"));
    }

    #[test]
    fn test_raw_entry_requires_formula_inputs() {
        let missing_unit = r#"{"amount_purchased": 1.0, "gwp": 10}"#;
        assert!(serde_json::from_str::<RawEntry>(missing_unit).is_err());
    }
}
