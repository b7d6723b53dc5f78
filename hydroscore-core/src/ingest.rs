//! Sample ingestion from JSON files
//!
//! The engine itself defines no file format; this is the surrounding
//! application's ingestion path. Field records key concentrations by metal
//! name or chemical symbol and may be reported in µg/L, which is normalized
//! to mg/L here so the engine only ever sees one unit.

use crate::sample::RawSample;
use crate::standards::Metal;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Concentration unit of a sample record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationUnit {
    #[default]
    MgL,
    UgL,
}

impl ConcentrationUnit {
    /// Normalize a value in this unit to mg/L.
    fn to_mg_l(self, value: f64) -> f64 {
        match self {
            ConcentrationUnit::MgL => value,
            ConcentrationUnit::UgL => value / 1000.0,
        }
    }
}

/// One record as it appears in a sample file, before normalization.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SampleRecord {
    sample_id: String,
    location: String,
    latitude: f64,
    longitude: f64,
    sampled_at: DateTime<Utc>,
    /// Keys are metal names ("nickel") or symbols ("Ni").
    concentrations: BTreeMap<String, f64>,
    #[serde(default)]
    unit: ConcentrationUnit,
}

impl SampleRecord {
    fn into_sample(self) -> Result<RawSample> {
        let mut concentrations = BTreeMap::new();
        for (name, value) in self.concentrations {
            let metal = Metal::parse(&name).with_context(|| {
                format!(
                    "sample '{}': unrecognized metal '{}' (expected a name like 'nickel' or a symbol like 'Ni')",
                    self.sample_id, name
                )
            })?;
            if concentrations
                .insert(metal, self.unit.to_mg_l(value))
                .is_some()
            {
                anyhow::bail!(
                    "sample '{}': metal '{}' listed more than once",
                    self.sample_id,
                    metal
                );
            }
        }

        let sample = RawSample {
            sample_id: self.sample_id,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            sampled_at: self.sampled_at,
            concentrations,
        };
        sample.validate()?;
        Ok(sample)
    }
}

/// Load and normalize samples from a JSON file (an array of records).
pub fn load_samples(path: &Path) -> Result<Vec<RawSample>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read sample file: {}", path.display()))?;
    let records: Vec<SampleRecord> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse sample file: {}", path.display()))?;

    records
        .into_iter()
        .map(SampleRecord::into_sample)
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("invalid sample in: {}", path.display()))
}
