//! Reference sample purchases.

use serde::Deserialize;

use crate::error::Result;
use crate::types::RawEntry;

const SAMPLES_TOML: &str = include_str!("../data/samples.toml");

#[derive(Deserialize)]
struct SampleFile {
    samples: Vec<RawEntry>,
}

/// The three reference purchases: R134a in kg, R410A in Tonnes, and
/// ammonia (GWP 0) in kg.
pub fn reference_samples() -> Result<Vec<RawEntry>> {
    let file: SampleFile = toml::from_str(SAMPLES_TOML)?;
    Ok(file.samples)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::build;

    #[test]
    fn test_three_samples() {
        let samples = reference_samples().unwrap();
        let numbers: Vec<Option<u32>> = samples.iter().map(|s| s.s_no).collect();
        assert_eq!(numbers, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_samples_build_to_expected_co2e() {
        let built: Vec<f64> = reference_samples()
            .unwrap()
            .into_iter()
            .map(|raw| build(raw).unwrap().computed_co2eq())
            .collect();
        assert_eq!(built, vec![15.015, 52.2, 0.0]);
    }

    #[test]
    fn test_samples_carry_passthrough_fields() {
        let samples = reference_samples().unwrap();
        assert_eq!(samples[2].type_refrigeration.as_deref(), Some("R717 (Ammonia)"));
        assert_eq!(samples[1].no_of_units, Some(3.0));
        assert_eq!(samples[0].invoice_no.as_deref(), Some("INV-001"));
    }
}
