//! Risk classification from the composite pollution index
//!
//! Global invariants enforced:
//! - Deterministic classification
//! - Bands partition [0, inf) with no gaps or overlaps; lower edges inclusive
//! - Negative or non-finite input is an error, never a default level

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Risk level derived from HPI (the authoritative composite index;
/// HEI and MI are supplementary diagnostics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe, // < 50
    Low,  // 50-100
    High, // >= 100
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Low => "low",
            RiskLevel::High => "high",
        }
    }
}

/// Configurable band thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    /// Lower edge of the Low band.
    pub low: f64,
    /// Lower edge of the High band.
    pub high: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        RiskThresholds {
            low: 50.0,
            high: 100.0,
        }
    }
}

/// Classify an HPI value with default thresholds.
pub fn classify(hpi: f64) -> Result<RiskLevel, EngineError> {
    classify_with_thresholds(hpi, &RiskThresholds::default())
}

/// Classify an HPI value with custom thresholds.
///
/// Total for finite, non-negative input; anything else signals upstream
/// data corruption and fails with `InvalidIndex`.
pub fn classify_with_thresholds(
    hpi: f64,
    thresholds: &RiskThresholds,
) -> Result<RiskLevel, EngineError> {
    if !hpi.is_finite() || hpi < 0.0 {
        return Err(EngineError::InvalidIndex { value: hpi });
    }
    Ok(if hpi < thresholds.low {
        RiskLevel::Safe
    } else if hpi < thresholds.high {
        RiskLevel::Low
    } else {
        RiskLevel::High
    })
}
