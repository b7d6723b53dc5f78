//! Pollution index calculation (HPI, HEI, MI, I-geo)
//!
//! Global invariants enforced:
//! - Pure functions: no side effects, no shared mutable state
//! - Deterministic, bit-for-bit reproducible for identical inputs
//! - Double-precision arithmetic throughout (index magnitudes span orders
//!   of magnitude)
//!
//! Edge-case policy, deliberate and asymmetric: a sample with zero metals
//! overlapping the standards table fails HPI with `NoApplicableMetals`
//! (the weighted denominator would be zero), while HEI and MI are sums or
//! means over the empty set and simply yield 0.

use crate::error::EngineError;
use crate::standards::{Metal, StandardsTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The three pollution indices for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Indices {
    pub hpi: f64,
    pub hei: f64,
    pub mi: f64,
}

/// Heavy Metal Pollution Index.
///
/// For each metal present in both the sample and the table:
/// Wi = 1 / Si, Qi = 100 * (Mi - Ii) / (Si - Ii), HPI = sum(Wi*Qi) / sum(Wi).
///
/// Fails with `NoApplicableMetals` when no metal overlaps the table.
pub fn hpi(
    concentrations: &BTreeMap<Metal, f64>,
    table: &StandardsTable,
) -> Result<f64, EngineError> {
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for (metal, observed) in concentrations {
        let Some(std) = table.get(*metal) else {
            continue;
        };
        let wi = std.unit_weight();
        let qi = 100.0 * (observed - std.ideal_value)
            / (std.permissible_limit - std.ideal_value);
        numerator += wi * qi;
        denominator += wi;
    }

    if denominator == 0.0 {
        return Err(EngineError::NoApplicableMetals);
    }
    Ok(numerator / denominator)
}

/// Heavy Metal Evaluation Index: sum of Mi / Si over overlapping metals.
///
/// Zero overlap yields 0 (sum over the empty set), not a failure.
pub fn hei(concentrations: &BTreeMap<Metal, f64>, table: &StandardsTable) -> f64 {
    concentrations
        .iter()
        .filter_map(|(metal, observed)| {
            table.get(*metal).map(|std| observed / std.permissible_limit)
        })
        .sum()
}

/// Metal Index: mean of Mi / Si over overlapping metals, 0 when no overlap.
pub fn mi(concentrations: &BTreeMap<Metal, f64>, table: &StandardsTable) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for (metal, observed) in concentrations {
        if let Some(std) = table.get(*metal) {
            sum += observed / std.permissible_limit;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Compute all three indices for one set of concentrations.
pub fn compute(
    concentrations: &BTreeMap<Metal, f64>,
    table: &StandardsTable,
) -> Result<Indices, EngineError> {
    Ok(Indices {
        hpi: hpi(concentrations, table)?,
        hei: hei(concentrations, table),
        mi: mi(concentrations, table),
    })
}

/// Geo-accumulation index for a single metal: log2(Cn / (1.5 * Bn)).
///
/// A per-metal sediment diagnostic, reported alongside the water indices.
/// Returns 0 for a zero concentration (log undefined) and fails if the
/// metal is not in the table.
pub fn igeo(
    metal: Metal,
    concentration: f64,
    table: &StandardsTable,
) -> Result<f64, EngineError> {
    let std = table.lookup(metal)?;
    if concentration <= 0.0 {
        return Ok(0.0);
    }
    Ok((concentration / (1.5 * std.background_value)).log2())
}
