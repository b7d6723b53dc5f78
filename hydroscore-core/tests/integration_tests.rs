//! Integration tests for hydroscore sample scoring

use hydroscore_core::{
    render_json, score_file, score_file_with_config, EngineError, ResolvedConfig, SampleOutcome,
    ScoreOptions,
};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_score_fixture_file() {
    let outcomes = score_file(&fixture_path("samples.json"), ScoreOptions::default()).unwrap();
    assert_eq!(outcomes.len(), 4);

    // Scored samples come first, sorted by HPI descending; the empty
    // control sample is a tagged failure at the end
    let scored: Vec<_> = outcomes
        .iter()
        .filter_map(|o| match o {
            SampleOutcome::Scored(r) => Some(r),
            SampleOutcome::Failed { .. } => None,
        })
        .collect();
    assert_eq!(scored.len(), 3);
    assert_eq!(scored[0].sample_id, "WS-002", "Yamuna is the worst site");
    for pair in scored.windows(2) {
        assert!(pair[0].indices.hpi >= pair[1].indices.hpi);
    }

    match &outcomes[3] {
        SampleOutcome::Failed { sample_id, error } => {
            assert_eq!(sample_id, "WS-EMPTY");
            assert_eq!(*error, EngineError::NoApplicableMetals);
        }
        SampleOutcome::Scored(_) => panic!("empty sample must be a tagged failure"),
    }
}

#[test]
fn test_risk_levels_from_fixture() {
    let outcomes = score_file(&fixture_path("samples.json"), ScoreOptions::default()).unwrap();
    let level_of = |id: &str| -> String {
        outcomes
            .iter()
            .find_map(|o| match o {
                SampleOutcome::Scored(r) if r.sample_id == id => Some(r.risk_level.clone()),
                _ => None,
            })
            .unwrap()
    };
    assert_eq!(level_of("WS-001"), "safe");
    assert_eq!(level_of("WS-002"), "high");
}

#[test]
fn test_scoring_is_byte_for_byte_deterministic() {
    let path = fixture_path("samples.json");
    let a = score_file(&path, ScoreOptions::default()).unwrap();
    let b = score_file(&path, ScoreOptions::default()).unwrap();
    assert_eq!(render_json(&a), render_json(&b));
}

#[test]
fn test_parallel_scoring_matches_sequential() {
    let path = fixture_path("samples.json");
    let sequential = score_file(&path, ScoreOptions::default()).unwrap();
    let parallel = score_file(
        &path,
        ScoreOptions {
            parallel: true,
            ..ScoreOptions::default()
        },
    )
    .unwrap();
    assert_eq!(render_json(&sequential), render_json(&parallel));
}

#[test]
fn test_min_hpi_filter_keeps_failures_visible() {
    let outcomes = score_file(
        &fixture_path("samples.json"),
        ScoreOptions {
            min_hpi: Some(1e6),
            ..ScoreOptions::default()
        },
    )
    .unwrap();
    // Every scored sample is filtered out; the failure must survive
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(outcomes[0], SampleOutcome::Failed { .. }));
}

#[test]
fn test_top_n_limits_scored_samples_only() {
    let outcomes = score_file(
        &fixture_path("samples.json"),
        ScoreOptions {
            top_n: Some(1),
            ..ScoreOptions::default()
        },
    )
    .unwrap();
    let scored = outcomes
        .iter()
        .filter(|o| matches!(o, SampleOutcome::Scored(_)))
        .count();
    let failed = outcomes
        .iter()
        .filter(|o| matches!(o, SampleOutcome::Failed { .. }))
        .count();
    assert_eq!(scored, 1);
    assert_eq!(failed, 1);
}

#[test]
fn test_health_reports_attached_on_request() {
    let outcomes = score_file(
        &fixture_path("samples.json"),
        ScoreOptions {
            include_health: true,
            ..ScoreOptions::default()
        },
    )
    .unwrap();
    for outcome in &outcomes {
        if let SampleOutcome::Scored(report) = outcome {
            let health = report.health.as_ref().expect("health report requested");
            assert!(health.child.hazard_index >= health.adult.hazard_index);
        }
    }
}

#[test]
fn test_restricted_standards_make_samples_unscorable() {
    // A table containing only mercury: the fixture's WS-EMPTY stays
    // unscorable and the river samples still overlap (they report mercury)
    let config: hydroscore_core::config::HydroscoreConfig = serde_json::from_str(
        r#"{
            "replace_standards": true,
            "standards": {"mercury": {"permissible_limit": 0.001}}
        }"#,
    )
    .unwrap();
    let resolved: ResolvedConfig = config.resolve().unwrap();
    let outcomes = score_file_with_config(
        &fixture_path("samples.json"),
        ScoreOptions::default(),
        &resolved,
    )
    .unwrap();
    let failed: Vec<_> = outcomes
        .iter()
        .filter_map(|o| match o {
            SampleOutcome::Failed { sample_id, error } => Some((sample_id.clone(), *error)),
            SampleOutcome::Scored(_) => None,
        })
        .collect();
    assert_eq!(
        failed,
        vec![("WS-EMPTY".to_string(), EngineError::NoApplicableMetals)]
    );
}
