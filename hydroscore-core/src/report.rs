//! Reporting and output generation
//!
//! Global invariants enforced:
//! - Deterministic output ordering
//! - Byte-for-byte identical output across runs
//! - Failed samples stay visible in every output format

use crate::error::EngineError;
use crate::health::HealthRisk;
use crate::sample::ScoredSample;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-sample outcome of a batch evaluation: a scored report or a tagged
/// failure. One bad record never hides the rest of the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SampleOutcome {
    Scored(SampleReport),
    Failed {
        sample_id: String,
        error: EngineError,
    },
}

impl SampleOutcome {
    pub fn sample_id(&self) -> &str {
        match self {
            SampleOutcome::Scored(report) => &report.sample_id,
            SampleOutcome::Failed { sample_id, .. } => sample_id,
        }
    }
}

/// Complete scored report for one sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SampleReport {
    pub sample_id: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub sampled_at: DateTime<Utc>,
    pub indices: IndicesReport,
    pub risk_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthReport>,
}

/// Indices in report format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicesReport {
    pub hpi: f64,
    pub hei: f64,
    pub mi: f64,
}

/// Health-risk assessment in report format, per demographic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthReport {
    pub adult: HealthRisk,
    pub child: HealthRisk,
}

impl SampleReport {
    /// Build a report from a scored sample.
    pub fn new(scored: &ScoredSample, health: Option<HealthReport>) -> Self {
        SampleReport {
            sample_id: scored.sample.sample_id.clone(),
            location: scored.sample.location.clone(),
            latitude: scored.sample.latitude,
            longitude: scored.sample.longitude,
            sampled_at: scored.sample.sampled_at,
            indices: IndicesReport {
                hpi: scored.hpi,
                hei: scored.hei,
                mi: scored.mi,
            },
            risk_level: scored.risk_level.as_str().to_string(),
            health,
        }
    }
}

/// Sort outcomes deterministically: scored samples by HPI descending, then
/// sample id ascending; failures after all scored samples, by sample id.
pub fn sort_outcomes(mut outcomes: Vec<SampleOutcome>) -> Vec<SampleOutcome> {
    outcomes.sort_by(|a, b| {
        use std::cmp::Ordering;
        match (a, b) {
            (SampleOutcome::Scored(x), SampleOutcome::Scored(y)) => y
                .indices
                .hpi
                .partial_cmp(&x.indices.hpi)
                .unwrap_or(Ordering::Equal)
                .then_with(|| x.sample_id.cmp(&y.sample_id)),
            (SampleOutcome::Scored(_), SampleOutcome::Failed { .. }) => Ordering::Less,
            (SampleOutcome::Failed { .. }, SampleOutcome::Scored(_)) => Ordering::Greater,
            (
                SampleOutcome::Failed { sample_id: x, .. },
                SampleOutcome::Failed { sample_id: y, .. },
            ) => x.cmp(y),
        }
    });
    outcomes
}

/// Render outcomes as text output.
pub fn render_text(outcomes: &[SampleOutcome]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<10} {:<10} {:<8} {:<6} {:<12} {}\n",
        "HPI", "HEI", "MI", "RISK", "SAMPLE", "LOCATION"
    ));

    for outcome in outcomes {
        match outcome {
            SampleOutcome::Scored(report) => {
                output.push_str(&format!(
                    "{:<10} {:<10} {:<8} {:<6} {:<12} {}\n",
                    format!("{:.2}", report.indices.hpi),
                    format!("{:.2}", report.indices.hei),
                    format!("{:.2}", report.indices.mi),
                    report.risk_level,
                    truncate_or_pad(&report.sample_id, 12),
                    report.location,
                ));
                if let Some(ref health) = report.health {
                    output.push_str(&format!(
                        "           adult HI={:.3} CR={:.2e}; child HI={:.3} CR={:.2e}\n",
                        health.adult.hazard_index,
                        health.adult.cancer_risk,
                        health.child.hazard_index,
                        health.child.cancer_risk,
                    ));
                }
            }
            SampleOutcome::Failed { sample_id, error } => {
                output.push_str(&format!(
                    "{:<10} {:<10} {:<8} {:<6} {:<12} unscorable: {}\n",
                    "-", "-", "-", "-",
                    truncate_or_pad(sample_id, 12),
                    error,
                ));
            }
        }
    }

    output
}

/// Render outcomes as JSON output.
pub fn render_json(outcomes: &[SampleOutcome]) -> String {
    serde_json::to_string_pretty(outcomes).unwrap_or_else(|_| "[]".to_string())
}

/// Truncate or pad string to fixed width. Sample ids are user data, so
/// truncation counts chars rather than bytes.
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let head: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        format!("{:<width$}", s, width = width)
    }
}
