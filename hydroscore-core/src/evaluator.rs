//! Sample evaluation - ties together index calculation and risk classification
//!
//! Global invariants enforced:
//! - Evaluation is a pure function of the sample and the standards table
//! - Batch output preserves input order, sequentially and in parallel
//! - Per-sample failures never abort a batch

use crate::error::EngineError;
use crate::indices;
use crate::risk::{self, RiskThresholds};
use crate::sample::{RawSample, ScoredSample};
use crate::standards::StandardsTable;
use rayon::prelude::*;

/// Score one raw sample against the standards table.
///
/// Metals absent from the table are dropped from the aggregates; a sample
/// with no overlap at all fails with `NoApplicableMetals`.
pub fn evaluate(
    sample: &RawSample,
    table: &StandardsTable,
    thresholds: &RiskThresholds,
) -> Result<ScoredSample, EngineError> {
    let indices = indices::compute(&sample.concentrations, table)?;
    let risk_level = risk::classify_with_thresholds(indices.hpi, thresholds)?;
    Ok(ScoredSample {
        sample: sample.clone(),
        hpi: indices.hpi,
        hei: indices.hei,
        mi: indices.mi,
        risk_level,
    })
}

/// Lazily score a sequence of samples, preserving input order.
///
/// Each item is an independent result; a failed sample yields a tagged
/// error in its slot and the iteration continues. The iterator borrows its
/// inputs only, so a caller can restart it by calling this again.
pub fn evaluate_all<'a>(
    samples: &'a [RawSample],
    table: &'a StandardsTable,
    thresholds: &'a RiskThresholds,
) -> impl Iterator<Item = Result<ScoredSample, EngineError>> + 'a {
    samples.iter().map(move |s| evaluate(s, table, thresholds))
}

/// Score a batch across worker threads.
///
/// Samples are independent and the table is read-only, so no coordination
/// is needed; the indexed parallel iterator keeps output order identical
/// to input order.
pub fn evaluate_all_parallel(
    samples: &[RawSample],
    table: &StandardsTable,
    thresholds: &RiskThresholds,
) -> Vec<Result<ScoredSample, EngineError>> {
    samples
        .par_iter()
        .map(|s| evaluate(s, table, thresholds))
        .collect()
}
