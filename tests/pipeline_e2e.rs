//! End-to-end pipeline runs against a temporary registry.

use model_gov::core::config::Config;
use model_gov::logger::AuditLog;
use model_gov::pipeline::Pipeline;
use model_gov::registry::{Artifact, ArtifactStore};
use model_gov::risk::{Decision, RiskAssessment};
use model_gov::stress::StressResults;

fn test_config(n_samples: usize) -> Config {
    let mut config = Config::default();
    config.data.n_samples = n_samples;
    config
}

fn pipeline(dir: &tempfile::TempDir, n_samples: usize) -> Pipeline {
    let store = ArtifactStore::new(dir.path().join("registry"));
    Pipeline::with_store(test_config(n_samples), store)
}

#[test]
fn full_run_writes_all_five_artifacts() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let pipeline = pipeline(&dir, 800);
    pipeline.run("rf_e2e").unwrap();

    for artifact in [
        Artifact::Model,
        Artifact::Metrics,
        Artifact::StressResults,
        Artifact::RiskAssessment,
        Artifact::ModelCard,
    ] {
        assert!(
            pipeline.store().exists("rf_e2e", artifact),
            "missing artifact {}",
            artifact.name()
        );
    }
}

#[test]
fn artifacts_agree_with_returned_values() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let pipeline = pipeline(&dir, 800);
    let outcome = pipeline.run("m_agree").unwrap();

    let stress: StressResults = pipeline
        .store()
        .read_json("m_agree", Artifact::StressResults)
        .unwrap();
    assert_eq!(stress, outcome.stress);

    let assessment: RiskAssessment = pipeline
        .store()
        .read_json("m_agree", Artifact::RiskAssessment)
        .unwrap();
    assert_eq!(assessment, outcome.assessment);

    let card = pipeline
        .store()
        .read_text("m_agree", Artifact::ModelCard)
        .unwrap();
    assert_eq!(card, outcome.card);
}

#[test]
fn assessment_ratios_derive_from_stress_artifact() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let pipeline = pipeline(&dir, 800);
    let outcome = pipeline.run("m_ratio").unwrap();

    let baseline = outcome.stress.baseline_mae();
    let noise = outcome.stress.mae("noise").unwrap();
    let vol = outcome.stress.mae("vol_spike").unwrap();
    assert!(baseline > 0.0);
    assert!(
        (outcome.assessment.noise_degradation - noise / baseline).abs() < 1e-12,
        "noise ratio mismatch"
    );
    assert!(
        (outcome.assessment.volatility_degradation - vol / baseline).abs() < 1e-12,
        "vol ratio mismatch"
    );
}

#[test]
fn rerunning_the_whole_pipeline_is_idempotent_on_json_artifacts() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let pipeline = pipeline(&dir, 600);
    pipeline.run("m_idem").unwrap();

    let read = |artifact: Artifact| {
        std::fs::read(pipeline.store().artifact_path("m_idem", artifact)).unwrap()
    };
    let model_a = read(Artifact::Model);
    let metrics_a = read(Artifact::Metrics);
    let stress_a = read(Artifact::StressResults);
    let risk_a = read(Artifact::RiskAssessment);

    pipeline.run("m_idem").unwrap();

    assert_eq!(read(Artifact::Model), model_a);
    assert_eq!(read(Artifact::Metrics), metrics_a);
    assert_eq!(read(Artifact::StressResults), stress_a);
    assert_eq!(read(Artifact::RiskAssessment), risk_a);
}

#[test]
fn stage_order_is_enforced_through_missing_artifacts() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let pipeline = pipeline(&dir, 600);

    let err = pipeline.report("m_order").unwrap_err();
    assert_eq!(err.code(), "MG-3001");
    assert!(err.to_string().contains("train stage"));

    pipeline.train("m_order").unwrap();
    let err = pipeline.report("m_order").unwrap_err();
    assert!(err.to_string().contains("stress stage"));

    pipeline.stress("m_order").unwrap();
    let err = pipeline.report("m_order").unwrap_err();
    assert!(err.to_string().contains("score stage"));

    pipeline.score("m_order").unwrap();
    assert!(pipeline.report("m_order").is_ok());
}

#[test]
fn failed_stage_leaves_prior_artifacts_intact() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let pipeline = pipeline(&dir, 600);
    pipeline.train("m_safe").unwrap();
    let metrics_path = pipeline.store().artifact_path("m_safe", Artifact::Metrics);
    let metrics_bytes = std::fs::read(&metrics_path).unwrap();

    // Score without stress results must fail and write nothing new.
    let err = pipeline.score("m_safe").unwrap_err();
    assert_eq!(err.code(), "MG-3001");
    assert!(!pipeline.store().exists("m_safe", Artifact::RiskAssessment));
    assert_eq!(std::fs::read(&metrics_path).unwrap(), metrics_bytes);
}

#[test]
fn model_card_reflects_the_decision() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let pipeline = pipeline(&dir, 800);
    let outcome = pipeline.run("m_card").unwrap();

    if outcome.assessment.decision == Decision::Approve {
        assert!(outcome.card.contains("Approved for production"));
    } else {
        assert!(outcome.card.contains("Not approved for production"));
    }
    assert!(
        outcome
            .card
            .contains(&format!("**Risk Score:** {}", outcome.assessment.risk_score))
    );
}

#[test]
fn audit_log_records_each_stage() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let audit_path = dir.path().join("audit.jsonl");
    let mut config = test_config(600);
    config.registry.root_dir = dir.path().join("registry");
    config.registry.audit_log = audit_path.clone();
    let pipeline = Pipeline::from_config(config);
    pipeline.run("m_audit").unwrap();

    let raw = std::fs::read_to_string(&audit_path).unwrap();
    for stage in ["train", "stress", "score", "report"] {
        assert!(
            raw.contains(&format!("\"stage\":\"{stage}\"")),
            "no audit events for {stage}"
        );
    }
    // Every line parses on its own.
    for line in raw.lines() {
        serde_json::from_str::<serde_json::Value>(line).unwrap();
    }
}

#[test]
fn disabled_audit_log_keeps_pipeline_working() {
    let log = AuditLog::disabled();
    log.stage_start("train", "m_x");
    let dir = tempfile::tempdir().expect("create temp dir");
    assert!(pipeline(&dir, 600).run("m_x").is_ok());
}
