//! Hydroscore core library - heavy-metal water-quality index engine
//!
//! Computes the Heavy Metal Pollution Index (HPI), Heavy Metal Evaluation
//! Index (HEI), and Metal Index (MI) for field water samples against a
//! configurable drinking-water standards table, and classifies each sample
//! into a risk band.

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Scoring is strictly per-sample
// - No global mutable state; the standards table is injected, read-only
// - No randomness, clocks, or hidden I/O in the computation path
// - Deterministic iteration order must be explicit
// - Identical input yields byte-for-byte identical output

pub mod config;
pub mod error;
pub mod evaluator;
pub mod health;
pub mod indices;
pub mod ingest;
pub mod report;
pub mod risk;
pub mod sample;
pub mod standards;

pub use config::ResolvedConfig;
pub use error::EngineError;
pub use evaluator::{evaluate, evaluate_all, evaluate_all_parallel};
pub use report::{render_json, render_text, sort_outcomes, SampleOutcome, SampleReport};
pub use risk::{RiskLevel, RiskThresholds};
pub use sample::{RawSample, ScoredSample};
pub use standards::{Metal, MetalStandard, StandardsTable};

use crate::health::Demographic;
use crate::report::HealthReport;
use anyhow::Result;
use std::path::Path;

/// Options for a scoring run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreOptions {
    /// Drop scored samples below this HPI (failures are always kept).
    pub min_hpi: Option<f64>,
    /// Keep only the top N scored samples by HPI.
    pub top_n: Option<usize>,
    /// Attach adult/child health-risk assessments to each report.
    pub include_health: bool,
    /// Evaluate the batch across worker threads.
    pub parallel: bool,
}

/// Score a sample file with default configuration.
pub fn score_file(path: &Path, options: ScoreOptions) -> Result<Vec<SampleOutcome>> {
    let config = ResolvedConfig::defaults()?;
    score_file_with_config(path, options, &config)
}

/// Score a sample file: ingest, evaluate each sample against the standards
/// table, filter, and sort. Per-sample failures appear as tagged outcomes
/// in the result rather than aborting the run.
pub fn score_file_with_config(
    path: &Path,
    options: ScoreOptions,
    config: &ResolvedConfig,
) -> Result<Vec<SampleOutcome>> {
    let samples = ingest::load_samples(path)?;
    Ok(score_samples(&samples, options, config))
}

/// Score already-ingested samples.
pub fn score_samples(
    samples: &[RawSample],
    options: ScoreOptions,
    config: &ResolvedConfig,
) -> Vec<SampleOutcome> {
    let results = if options.parallel {
        evaluator::evaluate_all_parallel(samples, &config.standards, &config.thresholds)
    } else {
        evaluator::evaluate_all(samples, &config.standards, &config.thresholds).collect()
    };

    let outcomes = samples
        .iter()
        .zip(results)
        .map(|(sample, result)| match result {
            Ok(scored) => {
                let health = options.include_health.then(|| HealthReport {
                    adult: health::assess(&sample.concentrations, Demographic::Adult),
                    child: health::assess(&sample.concentrations, Demographic::Child),
                });
                SampleOutcome::Scored(SampleReport::new(&scored, health))
            }
            Err(error) => SampleOutcome::Failed {
                sample_id: sample.sample_id.clone(),
                error,
            },
        })
        .collect();

    // Options take precedence over config file values
    finalize_outcomes(
        outcomes,
        options.min_hpi.or(config.min_hpi),
        options.top_n.or(config.top_n),
    )
}

/// Sort outcomes and apply the min-HPI and top-N filters.
///
/// Filters act on scored samples only; failures always pass through so a
/// filtered report can never hide an unscorable record.
pub fn finalize_outcomes(
    outcomes: Vec<SampleOutcome>,
    min_hpi: Option<f64>,
    top_n: Option<usize>,
) -> Vec<SampleOutcome> {
    let sorted = sort_outcomes(outcomes);

    let filtered: Vec<SampleOutcome> = match min_hpi {
        Some(min) => sorted
            .into_iter()
            .filter(|o| match o {
                SampleOutcome::Scored(report) => report.indices.hpi >= min,
                SampleOutcome::Failed { .. } => true,
            })
            .collect(),
        None => sorted,
    };

    match top_n {
        Some(top_n) => take_top_scored(filtered, top_n),
        None => filtered,
    }
}

/// Keep the first `top_n` scored outcomes; failures always pass through.
fn take_top_scored(outcomes: Vec<SampleOutcome>, top_n: usize) -> Vec<SampleOutcome> {
    let mut kept = Vec::with_capacity(outcomes.len());
    let mut scored_seen = 0usize;
    for outcome in outcomes {
        match outcome {
            SampleOutcome::Scored(_) if scored_seen >= top_n => {}
            SampleOutcome::Scored(report) => {
                scored_seen += 1;
                kept.push(SampleOutcome::Scored(report));
            }
            failure => kept.push(failure),
        }
    }
    kept
}
