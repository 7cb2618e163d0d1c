//! Emission totals over a set of records.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::EmissionRecord;

/// Bucket width for period totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// Calendar month, labelled `YYYY-MM`.
    #[default]
    Month,
    /// Calendar year, labelled `YYYY`.
    Year,
}

impl Period {
    /// Bucket label for a date.
    pub fn label(&self, date: NaiveDate) -> String {
        match self {
            Period::Month => format!("{:04}-{:02}", date.year(), date.month()),
            Period::Year => format!("{:04}", date.year()),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Month => write!(f, "month"),
            Period::Year => write!(f, "year"),
        }
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" | "monthly" => Ok(Period::Month),
            "year" | "yearly" => Ok(Period::Year),
            other => Err(Error::validation_field(
                "period",
                format!("unknown period '{other}' (expected month or year)"),
            )),
        }
    }
}

/// Totals in tonnes of CO2 equivalent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionSummary {
    /// Bucket width used for `by_period` and `current_period_co2eq`.
    pub period: Period,
    /// Number of records summarized.
    pub entries: usize,
    /// Sum over all records.
    pub total_co2eq: f64,
    /// Sum over records in the same period as the reference date.
    pub current_period_co2eq: f64,
    /// Per-period sums in chronological order. Undated records are
    /// counted in the totals only.
    pub by_period: Vec<(String, f64)>,
}

impl EmissionSummary {
    /// Summarizes `records` relative to `today`.
    pub fn from_records(records: &[EmissionRecord], today: NaiveDate, period: Period) -> Self {
        let current = period.label(today);
        let mut buckets: BTreeMap<String, f64> = BTreeMap::new();
        let mut total_co2eq = 0.0;
        let mut current_period_co2eq = 0.0;

        for record in records {
            let co2eq = record.computed_co2eq();
            total_co2eq += co2eq;
            if let Some(date) = record.date {
                let label = period.label(date);
                if label == current {
                    current_period_co2eq += co2eq;
                }
                *buckets.entry(label).or_insert(0.0) += co2eq;
            }
        }

        Self {
            period,
            entries: records.len(),
            total_co2eq,
            current_period_co2eq,
            by_period: buckets.into_iter().collect(),
        }
    }
}
