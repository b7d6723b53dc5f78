//! Engine failure kinds
//!
//! Global invariants enforced:
//! - Per-metal lookup misses are recovered locally (skip and continue)
//! - Per-sample failures are surfaced as tagged values, never as panics
//! - A failure never silently defaults to a risk level

use crate::standards::Metal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tagged failure kinds surfaced by the scoring engine.
///
/// Batch evaluation isolates these per sample: one bad record yields a
/// tagged failure for that record and leaves the rest of the batch intact.
#[derive(Debug, Clone, Copy, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineError {
    /// A metal was requested that is absent from the standards table.
    #[error("metal '{metal}' is not in the standards table")]
    UnknownMetal { metal: Metal },

    /// The sample shares no metals with the standards table, so the
    /// weighted HPI denominator would be zero.
    #[error("sample has no metals overlapping the standards table; HPI is undefined")]
    NoApplicableMetals,

    /// A negative or non-finite index value reached the classifier.
    /// Signals upstream data corruption, not a classifiable condition.
    #[error("index value {value} is negative or non-finite")]
    InvalidIndex { value: f64 },
}
