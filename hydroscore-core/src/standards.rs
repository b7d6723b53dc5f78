//! Reference standards for monitored heavy metals
//!
//! Global invariants enforced:
//! - The table is populated once and never mutated afterward
//! - `ideal_value < permissible_limit` for every entry
//! - Deterministic iteration order (metals sorted by enum ordinal)

use crate::error::EngineError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The fixed set of monitored heavy metals.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Metal {
    Arsenic,
    Cadmium,
    Chromium,
    Copper,
    Iron,
    Lead,
    Manganese,
    Mercury,
    Nickel,
    Zinc,
}

impl Metal {
    /// All monitored metals, in canonical order.
    pub const ALL: [Metal; 10] = [
        Metal::Arsenic,
        Metal::Cadmium,
        Metal::Chromium,
        Metal::Copper,
        Metal::Iron,
        Metal::Lead,
        Metal::Manganese,
        Metal::Mercury,
        Metal::Nickel,
        Metal::Zinc,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metal::Arsenic => "arsenic",
            Metal::Cadmium => "cadmium",
            Metal::Chromium => "chromium",
            Metal::Copper => "copper",
            Metal::Iron => "iron",
            Metal::Lead => "lead",
            Metal::Manganese => "manganese",
            Metal::Mercury => "mercury",
            Metal::Nickel => "nickel",
            Metal::Zinc => "zinc",
        }
    }

    /// Chemical symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Metal::Arsenic => "As",
            Metal::Cadmium => "Cd",
            Metal::Chromium => "Cr",
            Metal::Copper => "Cu",
            Metal::Iron => "Fe",
            Metal::Lead => "Pb",
            Metal::Manganese => "Mn",
            Metal::Mercury => "Hg",
            Metal::Nickel => "Ni",
            Metal::Zinc => "Zn",
        }
    }

    /// Parse from a canonical name or a chemical symbol.
    ///
    /// Field data uses both conventions ("nickel" and "Ni"), so ingestion
    /// accepts either. Names are matched case-insensitively, symbols exactly.
    pub fn parse(s: &str) -> Option<Metal> {
        Metal::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s) || m.symbol() == s)
    }
}

impl fmt::Display for Metal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference values for one metal, unit mg/L.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetalStandard {
    /// Regulatory maximum (Si).
    pub permissible_limit: f64,
    /// Desired/background concentration (Ii), usually 0 for toxics.
    pub ideal_value: f64,
    /// Geochemical background value (Bn), used by the geo-accumulation index.
    pub background_value: f64,
}

impl MetalStandard {
    /// Unit weight for the HPI aggregation: Wi = 1 / Si.
    pub fn unit_weight(&self) -> f64 {
        1.0 / self.permissible_limit
    }
}

/// Read-only table of metal standards, populated once at startup.
///
/// Concurrent readers are always safe; there is no interior mutability.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardsTable {
    entries: BTreeMap<Metal, MetalStandard>,
}

impl StandardsTable {
    /// Build a table from explicit entries, validating every standard.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (Metal, MetalStandard)>,
    ) -> Result<StandardsTable> {
        let entries: BTreeMap<Metal, MetalStandard> = entries.into_iter().collect();
        for (metal, std) in &entries {
            validate_standard(*metal, std)?;
        }
        Ok(StandardsTable { entries })
    }

    /// BIS/WHO drinking-water standards for all ten monitored metals.
    ///
    /// Permissible limits (Si) per BIS 10500 / WHO guidelines; ideal values
    /// are 0 for toxics; background values (Bn) follow published geochemical
    /// baselines.
    pub fn bis_who() -> StandardsTable {
        let entries = [
            (Metal::Arsenic, 0.01, 0.0, 12.70),
            (Metal::Cadmium, 0.003, 0.0, 0.10),
            (Metal::Chromium, 0.05, 0.0, 67.30),
            (Metal::Copper, 0.05, 0.0, 22.50),
            (Metal::Iron, 0.3, 0.0, 15000.0),
            (Metal::Lead, 0.01, 0.0, 21.00),
            (Metal::Manganese, 0.1, 0.0, 500.0),
            (Metal::Mercury, 0.001, 0.0, 0.02),
            (Metal::Nickel, 0.02, 0.0, 31.00),
            (Metal::Zinc, 5.0, 0.0, 65.40),
        ];
        StandardsTable {
            entries: entries
                .into_iter()
                .map(|(metal, si, ii, bn)| {
                    (
                        metal,
                        MetalStandard {
                            permissible_limit: si,
                            ideal_value: ii,
                            background_value: bn,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Look up the standard for a metal, failing if it is not in the table.
    pub fn lookup(&self, metal: Metal) -> Result<&MetalStandard, EngineError> {
        self.entries
            .get(&metal)
            .ok_or(EngineError::UnknownMetal { metal })
    }

    /// Non-failing lookup, for callers that skip missing metals.
    pub fn get(&self, metal: Metal) -> Option<&MetalStandard> {
        self.entries.get(&metal)
    }

    pub fn contains(&self, metal: Metal) -> bool {
        self.entries.contains_key(&metal)
    }

    /// Iterate entries in canonical metal order.
    pub fn iter(&self) -> impl Iterator<Item = (Metal, &MetalStandard)> {
        self.entries.iter().map(|(m, s)| (*m, s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Validate a single standard entry.
fn validate_standard(metal: Metal, std: &MetalStandard) -> Result<()> {
    if !std.permissible_limit.is_finite() || std.permissible_limit <= 0.0 {
        anyhow::bail!(
            "standard for {}: permissible_limit must be positive (got {})",
            metal,
            std.permissible_limit
        );
    }
    if !std.ideal_value.is_finite() || std.ideal_value < 0.0 {
        anyhow::bail!(
            "standard for {}: ideal_value must be non-negative (got {})",
            metal,
            std.ideal_value
        );
    }
    if std.ideal_value >= std.permissible_limit {
        anyhow::bail!(
            "standard for {}: ideal_value ({}) must be less than permissible_limit ({})",
            metal,
            std.ideal_value,
            std.permissible_limit
        );
    }
    if !std.background_value.is_finite() || std.background_value <= 0.0 {
        anyhow::bail!(
            "standard for {}: background_value must be positive (got {})",
            metal,
            std.background_value
        );
    }
    Ok(())
}
