//! Purchase units.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kilograms per tonne.
pub const KG_PER_TONNE: f64 = 1000.0;

/// Unit a refrigerant purchase is recorded in.
///
/// Serialized with the DocType select labels, `Tonnes` and `kg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Metric tonnes.
    #[serde(rename = "Tonnes", alias = "tonnes")]
    Tonnes,
    /// Kilograms.
    #[serde(rename = "kg", alias = "Kilograms", alias = "kilograms")]
    Kilograms,
}

impl Unit {
    /// Both units, in DocType option order.
    pub const ALL: [Unit; 2] = [Unit::Tonnes, Unit::Kilograms];

    /// The DocType select label.
    pub fn label(&self) -> &'static str {
        match self {
            Unit::Tonnes => "Tonnes",
            Unit::Kilograms => "kg",
        }
    }

    /// Divisor that normalizes an amount in this unit to tonnes.
    pub fn conversion_factor(&self) -> f64 {
        match self {
            Unit::Tonnes => 1.0,
            Unit::Kilograms => KG_PER_TONNE,
        }
    }

    /// Converts an amount in this unit to tonnes.
    pub fn to_tonnes(&self, amount: f64) -> f64 {
        match self {
            Unit::Tonnes => amount,
            Unit::Kilograms => amount / KG_PER_TONNE,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Tonnes" | "tonnes" | "t" => Ok(Unit::Tonnes),
            "kg" | "Kilograms" | "kilograms" => Ok(Unit::Kilograms),
            other => Err(Error::invalid_unit(other)),
        }
    }
}
