//! Configuration file support for Hydroscore
//!
//! Loads project-specific configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.hydroscorerc.json` in the working root
//! 3. `hydroscore.config.json` in the working root
//!
//! All fields are optional; omitted standards fall back to the built-in
//! BIS/WHO table and CLI flags take precedence over config file values.
//! The resolved standards table is read-only for the life of the process.

use crate::risk::RiskThresholds;
use crate::standards::{Metal, MetalStandard, StandardsTable};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Hydroscore configuration loaded from a JSON config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HydroscoreConfig {
    /// Per-metal standards overrides. Metals listed here replace the
    /// built-in BIS/WHO entry; metals omitted keep the built-in values.
    #[serde(default)]
    pub standards: BTreeMap<Metal, StandardEntry>,

    /// Replace the standards table entirely with the `standards` map
    /// instead of overlaying it on the built-in table.
    #[serde(default)]
    pub replace_standards: bool,

    /// Custom risk band thresholds.
    #[serde(default)]
    pub thresholds: Option<ThresholdConfig>,

    /// Minimum HPI to report (default: 0.0, report all).
    #[serde(default)]
    pub min_hpi: Option<f64>,

    /// Maximum number of results to show.
    #[serde(default)]
    pub top: Option<usize>,
}

/// One configured metal standard. `ideal_value` defaults to 0 (the usual
/// value for toxics) and `background_value` falls back to the built-in
/// geochemical baseline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StandardEntry {
    pub permissible_limit: f64,
    #[serde(default)]
    pub ideal_value: f64,
    pub background_value: Option<f64>,
}

/// Custom risk band thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfig {
    /// HPI threshold for the low-risk band (default: 50.0)
    pub low: Option<f64>,
    /// HPI threshold for the high-risk band (default: 100.0)
    pub high: Option<f64>,
}

/// Resolved configuration with a built standards table.
#[derive(Debug)]
pub struct ResolvedConfig {
    /// Standards table, immutable after resolution.
    pub standards: StandardsTable,
    /// Risk band thresholds.
    pub thresholds: RiskThresholds,
    /// Filters
    pub min_hpi: Option<f64>,
    pub top_n: Option<usize>,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl HydroscoreConfig {
    /// Validate the configuration for logical errors.
    pub fn validate(&self) -> Result<()> {
        for (metal, entry) in &self.standards {
            if !entry.permissible_limit.is_finite() || entry.permissible_limit <= 0.0 {
                anyhow::bail!(
                    "standards.{}: permissible_limit must be positive (got {})",
                    metal,
                    entry.permissible_limit
                );
            }
            if !entry.ideal_value.is_finite() || entry.ideal_value < 0.0 {
                anyhow::bail!(
                    "standards.{}: ideal_value must be non-negative (got {})",
                    metal,
                    entry.ideal_value
                );
            }
            if entry.ideal_value >= entry.permissible_limit {
                anyhow::bail!(
                    "standards.{}: ideal_value ({}) must be less than permissible_limit ({})",
                    metal,
                    entry.ideal_value,
                    entry.permissible_limit
                );
            }
            if let Some(bn) = entry.background_value {
                if !bn.is_finite() || bn <= 0.0 {
                    anyhow::bail!(
                        "standards.{}: background_value must be positive (got {})",
                        metal,
                        bn
                    );
                }
            }
        }

        if self.replace_standards && self.standards.is_empty() {
            anyhow::bail!("replace_standards requires at least one entry in standards");
        }

        if let Some(ref t) = self.thresholds {
            let low = t.low.unwrap_or(50.0);
            let high = t.high.unwrap_or(100.0);
            if low <= 0.0 {
                anyhow::bail!("thresholds.low must be positive (got {})", low);
            }
            if high <= 0.0 {
                anyhow::bail!("thresholds.high must be positive (got {})", high);
            }
            if low >= high {
                anyhow::bail!(
                    "thresholds.low ({}) must be less than thresholds.high ({})",
                    low,
                    high
                );
            }
        }

        if let Some(min) = self.min_hpi {
            if !min.is_finite() || min < 0.0 {
                anyhow::bail!("min_hpi must be non-negative (got {})", min);
            }
        }

        Ok(())
    }

    /// Resolve config into a built standards table and thresholds.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let builtin = StandardsTable::bis_who();

        let entries: BTreeMap<Metal, MetalStandard> = if self.replace_standards {
            self.standards
                .iter()
                .map(|(metal, entry)| (*metal, entry.to_standard(*metal, &builtin)))
                .collect()
        } else {
            // Overlay configured entries on the built-in table
            let mut entries: BTreeMap<Metal, MetalStandard> =
                builtin.iter().map(|(m, s)| (m, *s)).collect();
            for (metal, entry) in &self.standards {
                entries.insert(*metal, entry.to_standard(*metal, &builtin));
            }
            entries
        };
        let standards = StandardsTable::from_entries(entries)?;

        let thresholds = match &self.thresholds {
            Some(t) => RiskThresholds {
                low: t.low.unwrap_or(50.0),
                high: t.high.unwrap_or(100.0),
            },
            None => RiskThresholds::default(),
        };

        Ok(ResolvedConfig {
            standards,
            thresholds,
            min_hpi: self.min_hpi,
            top_n: self.top,
            config_path: None,
        })
    }
}

impl StandardEntry {
    /// Fill in the background value from the built-in table when omitted.
    fn to_standard(self, metal: Metal, builtin: &StandardsTable) -> MetalStandard {
        let fallback_bn = builtin
            .get(metal)
            .map(|s| s.background_value)
            .unwrap_or(1.0);
        MetalStandard {
            permissible_limit: self.permissible_limit,
            ideal_value: self.ideal_value,
            background_value: self.background_value.unwrap_or(fallback_bn),
        }
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file).
    pub fn defaults() -> Result<Self> {
        HydroscoreConfig::default().resolve()
    }
}

/// Discover and load a config file from the working root.
///
/// Search order:
/// 1. `.hydroscorerc.json`
/// 2. `hydroscore.config.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(root: &Path) -> Result<Option<(HydroscoreConfig, PathBuf)>> {
    let rc_path = root.join(".hydroscorerc.json");
    if rc_path.exists() {
        let config = load_config_file(&rc_path)?;
        return Ok(Some((config, rc_path)));
    }

    let config_path = root.join("hydroscore.config.json");
    if config_path.exists() {
        let config = load_config_file(&config_path)?;
        return Ok(Some((config, config_path)));
    }

    Ok(None)
}

/// Load config from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<HydroscoreConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: HydroscoreConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config for a working root.
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from the root.
/// Returns default config if nothing is found.
pub fn load_and_resolve(root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(root)? {
            Some((config, path)) => (config, Some(path)),
            None => (HydroscoreConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config_is_valid() {
        let config = HydroscoreConfig::default();
        config.validate().expect("default config should be valid");
        let resolved = config.resolve().expect("default config should resolve");
        assert_eq!(resolved.standards.len(), Metal::ALL.len());
        assert_eq!(resolved.thresholds.low, 50.0);
        assert_eq!(resolved.thresholds.high, 100.0);
        assert!(resolved.min_hpi.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let json = r#"{}"#;
        let config: HydroscoreConfig = serde_json::from_str(json).unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "standards": {
                "arsenic": {"permissible_limit": 0.05, "ideal_value": 0.0},
                "zinc": {"permissible_limit": 3.0}
            },
            "thresholds": {
                "low": 40.0,
                "high": 90.0
            },
            "min_hpi": 10.0,
            "top": 20
        }"#;
        let config: HydroscoreConfig = serde_json::from_str(json).unwrap();
        config.validate().unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(
            resolved.standards.lookup(Metal::Arsenic).unwrap().permissible_limit,
            0.05
        );
        assert_eq!(
            resolved.standards.lookup(Metal::Zinc).unwrap().permissible_limit,
            3.0
        );
        assert_eq!(resolved.thresholds.low, 40.0);
        assert_eq!(resolved.thresholds.high, 90.0);
        assert_eq!(resolved.min_hpi, Some(10.0));
        assert_eq!(resolved.top_n, Some(20));
    }

    #[test]
    fn test_overlay_keeps_unconfigured_metals() {
        let json = r#"{"standards": {"arsenic": {"permissible_limit": 0.05}}}"#;
        let config: HydroscoreConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        // Lead keeps the built-in limit
        assert_eq!(
            resolved.standards.lookup(Metal::Lead).unwrap().permissible_limit,
            0.01
        );
    }

    #[test]
    fn test_replace_standards_drops_unlisted_metals() {
        let json = r#"{
            "replace_standards": true,
            "standards": {"arsenic": {"permissible_limit": 0.01}}
        }"#;
        let config: HydroscoreConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.standards.len(), 1);
        assert!(resolved.standards.lookup(Metal::Lead).is_err());
    }

    #[test]
    fn test_replace_standards_requires_entries() {
        let json = r#"{"replace_standards": true}"#;
        let config: HydroscoreConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_unknown_fields() {
        let json = r#"{"unknown_field": true}"#;
        let result: Result<HydroscoreConfig, _> = serde_json::from_str(json);
        assert!(result.is_err(), "unknown fields should be rejected");
    }

    #[test]
    fn test_reject_unknown_metal_name() {
        let json = r#"{"standards": {"unobtainium": {"permissible_limit": 1.0}}}"#;
        let result: Result<HydroscoreConfig, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_reject_nonpositive_permissible_limit() {
        let json = r#"{"standards": {"lead": {"permissible_limit": 0.0}}}"#;
        let config: HydroscoreConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_ideal_at_or_above_permissible() {
        let json =
            r#"{"standards": {"zinc": {"permissible_limit": 1.0, "ideal_value": 1.0}}}"#;
        let config: HydroscoreConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_unordered_thresholds() {
        let json = r#"{"thresholds": {"low": 100.0, "high": 50.0}}"#;
        let config: HydroscoreConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_negative_threshold() {
        let json = r#"{"thresholds": {"low": -1.0}}"#;
        let config: HydroscoreConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_negative_min_hpi() {
        let json = r#"{"min_hpi": -5.0}"#;
        let config: HydroscoreConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_thresholds_use_defaults_for_rest() {
        let json = r#"{"thresholds": {"high": 120.0}}"#;
        let config: HydroscoreConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.thresholds.low, 50.0); // default
        assert_eq!(resolved.thresholds.high, 120.0);
    }

    #[test]
    fn test_discover_hydroscorerc() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(".hydroscorerc.json");
        fs::write(&config_path, r#"{"min_hpi": 5.0}"#).unwrap();

        let result = discover_config(dir.path()).unwrap();
        assert!(result.is_some());
        let (config, path) = result.unwrap();
        assert_eq!(config.min_hpi, Some(5.0));
        assert_eq!(path, config_path);
    }

    #[test]
    fn test_discover_hydroscore_config_json() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("hydroscore.config.json");
        fs::write(&config_path, r#"{"top": 10}"#).unwrap();

        let result = discover_config(dir.path()).unwrap();
        assert!(result.is_some());
        let (config, _) = result.unwrap();
        assert_eq!(config.top, Some(10));
    }

    #[test]
    fn test_discover_priority_order() {
        let dir = tempfile::tempdir().unwrap();

        // Create both config files - .hydroscorerc.json should win
        fs::write(dir.path().join(".hydroscorerc.json"), r#"{"min_hpi": 1.0}"#).unwrap();
        fs::write(
            dir.path().join("hydroscore.config.json"),
            r#"{"min_hpi": 2.0}"#,
        )
        .unwrap();

        let result = discover_config(dir.path()).unwrap();
        let (config, _) = result.unwrap();
        assert_eq!(
            config.min_hpi,
            Some(1.0),
            ".hydroscorerc.json should take priority"
        );
    }

    #[test]
    fn test_no_config_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = discover_config(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_and_resolve_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = load_and_resolve(dir.path(), None).unwrap();
        assert!(resolved.config_path.is_none());
        assert_eq!(resolved.thresholds.low, 50.0);
    }

    #[test]
    fn test_load_and_resolve_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.json");
        fs::write(
            &config_path,
            r#"{"standards": {"mercury": {"permissible_limit": 0.006}}}"#,
        )
        .unwrap();

        let resolved = load_and_resolve(dir.path(), Some(&config_path)).unwrap();
        assert_eq!(
            resolved.standards.lookup(Metal::Mercury).unwrap().permissible_limit,
            0.006
        );
        assert_eq!(resolved.config_path, Some(config_path));
    }

    #[test]
    fn test_background_value_falls_back_to_builtin() {
        let json = r#"{"standards": {"arsenic": {"permissible_limit": 0.02}}}"#;
        let config: HydroscoreConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(
            resolved.standards.lookup(Metal::Arsenic).unwrap().background_value,
            12.70
        );
    }
}
