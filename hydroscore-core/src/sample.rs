//! Sample data model
//!
//! Global invariants enforced:
//! - RawSample is input, ScoredSample is derived; the two are never conflated
//! - Samples are immutable once constructed; rescoring supersedes, never updates
//! - Concentration iteration order is deterministic (BTreeMap)

use crate::risk::RiskLevel;
use crate::standards::Metal;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One field measurement, as produced by an external ingestion collaborator.
///
/// Concentrations are mg/L and need not cover every metal in the standards
/// table; metals absent here are simply excluded from index computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub sample_id: String,
    /// Location label, opaque to the engine.
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub sampled_at: DateTime<Utc>,
    pub concentrations: BTreeMap<Metal, f64>,
}

impl RawSample {
    /// Check field-level invariants: coordinates in geographic range and
    /// concentrations finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            anyhow::bail!(
                "sample '{}': latitude {} out of range [-90, 90]",
                self.sample_id,
                self.latitude
            );
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            anyhow::bail!(
                "sample '{}': longitude {} out of range [-180, 180]",
                self.sample_id,
                self.longitude
            );
        }
        for (metal, conc) in &self.concentrations {
            if !conc.is_finite() || *conc < 0.0 {
                anyhow::bail!(
                    "sample '{}': concentration for {} must be a non-negative number (got {})",
                    self.sample_id,
                    metal,
                    conc
                );
            }
        }
        Ok(())
    }
}

/// A raw sample plus its derived indices and risk level.
///
/// Produced by the evaluator from a RawSample and a standards table; never
/// mutated. If concentrations change, a new ScoredSample is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSample {
    #[serde(flatten)]
    pub sample: RawSample,
    pub hpi: f64,
    pub hei: f64,
    pub mi: f64,
    pub risk_level: RiskLevel,
}
