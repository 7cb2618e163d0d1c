//! Refrigerant types offered by the Fugitive Simple DocType.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Refrigerant gas purchased to recharge equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Refrigerant {
    /// HFC-134a.
    R134a,
    /// HFC blend R-404A.
    R404A,
    /// HFC blend R-410A.
    R410A,
    /// HFC blend R-407C.
    R407C,
    /// HCFC-22.
    R22,
    /// HFC blend R-507.
    R507,
    /// Ammonia.
    #[serde(rename = "R717 (Ammonia)")]
    R717,
    /// Carbon dioxide.
    #[serde(rename = "R744 (CO2)")]
    R744,
    /// Anything not listed; GWP must be supplied.
    Other,
}

impl Refrigerant {
    /// All refrigerants, in DocType option order.
    pub const ALL: [Refrigerant; 9] = [
        Refrigerant::R134a,
        Refrigerant::R404A,
        Refrigerant::R410A,
        Refrigerant::R407C,
        Refrigerant::R22,
        Refrigerant::R507,
        Refrigerant::R717,
        Refrigerant::R744,
        Refrigerant::Other,
    ];

    /// The DocType select label.
    pub fn label(&self) -> &'static str {
        match self {
            Refrigerant::R134a => "R134a",
            Refrigerant::R404A => "R404A",
            Refrigerant::R410A => "R410A",
            Refrigerant::R407C => "R407C",
            Refrigerant::R22 => "R22",
            Refrigerant::R507 => "R507",
            Refrigerant::R717 => "R717 (Ammonia)",
            Refrigerant::R744 => "R744 (CO2)",
            Refrigerant::Other => "Other",
        }
    }

    /// Reference 100-year GWP (IPCC AR4), `None` for [`Refrigerant::Other`].
    pub fn reference_gwp(&self) -> Option<f64> {
        match self {
            Refrigerant::R134a => Some(1430.0),
            Refrigerant::R404A => Some(3922.0),
            Refrigerant::R410A => Some(2088.0),
            Refrigerant::R407C => Some(1774.0),
            Refrigerant::R22 => Some(1810.0),
            Refrigerant::R507 => Some(3985.0),
            Refrigerant::R717 => Some(0.0),
            Refrigerant::R744 => Some(1.0),
            Refrigerant::Other => None,
        }
    }
}

impl fmt::Display for Refrigerant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Refrigerant {
    type Err = Error;

    /// Accepts the DocType label, the bare designation (`R717`), or the
    /// common name (`ammonia`, `CO2`), case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        let found = Refrigerant::ALL.into_iter().find(|r| {
            r.label().to_ascii_lowercase() == wanted
                || format!("{r:?}").to_ascii_lowercase() == wanted
        });
        match (found, wanted.as_str()) {
            (Some(r), _) => Ok(r),
            (None, "ammonia" | "nh3") => Ok(Refrigerant::R717),
            (None, "co2") => Ok(Refrigerant::R744),
            (None, _) => Err(Error::UnknownRefrigerant {
                label: s.to_string(),
            }),
        }
    }
}
