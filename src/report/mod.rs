//! Governance model card: the human-facing artifact of a pipeline run.
//!
//! Loads the three upstream artifacts, renders a fixed-structure markdown
//! document, and persists it. Stages must have run in order; a missing
//! artifact aborts with an error naming the stage to run first.

use std::fmt::Write as _;

use chrono::{SecondsFormat, Utc};

use crate::core::errors::{GovError, Result};
use crate::model::BaselineMetrics;
use crate::registry::{Artifact, ArtifactStore};
use crate::risk::RiskAssessment;
use crate::stress::harness::{BASELINE, StressResults};

/// Type label shown in the overview; the pipeline trains one model family.
const MODEL_TYPE: &str = "RidgeRegressor";
const OBJECTIVE: &str = "Predict next-period realized volatility";

const INTERPRETATION: &str = "The stress protocol measures how much predictive error inflates \
under input noise and a volatility regime shift. Degradation factors near 1.00\u{d7} indicate a \
model robust to the tested scenarios; large factors indicate sensitivity to structural breaks \
that normal-condition metrics do not reveal. The decision above is derived mechanically from \
the scored rules and is reproducible from the persisted artifacts alone.";

const LIMITATIONS: [&str; 3] = [
    "Trained on synthetic data",
    "Single-model architecture",
    "No retraining or adaptive mechanisms",
];

/// Assembles and persists the rendered governance document.
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    store: ArtifactStore,
}

impl ReportAssembler {
    /// Create an assembler against one registry.
    #[must_use]
    pub const fn new(store: ArtifactStore) -> Self {
        Self { store }
    }

    /// Load upstream artifacts, render the card, persist, and return it.
    pub fn assemble(&self, model_id: &str) -> Result<String> {
        let metrics: BaselineMetrics = self.store.read_json(model_id, Artifact::Metrics)?;
        let stress: StressResults = self.store.read_json(model_id, Artifact::StressResults)?;
        let risk: RiskAssessment = self.store.read_json(model_id, Artifact::RiskAssessment)?;

        let card = render(model_id, &metrics, &stress, &risk)?;
        self.store.write_text(model_id, Artifact::ModelCard, &card)?;
        Ok(card)
    }
}

fn render(
    model_id: &str,
    metrics: &BaselineMetrics,
    stress: &StressResults,
    risk: &RiskAssessment,
) -> Result<String> {
    let baseline_mae = stress.require_mae(BASELINE)?;
    if baseline_mae == 0.0 {
        return Err(GovError::DivisionByZero);
    }

    let mut out = String::with_capacity(1_024);
    let _ = writeln!(out, "# Model Card — {model_id}");
    let _ = writeln!(out);
    let _ = writeln!(out, "## Model Overview");
    let _ = writeln!(out, "- **Model Type:** {MODEL_TYPE}");
    let _ = writeln!(out, "- **Objective:** {OBJECTIVE}");
    let _ = writeln!(out, "- **Training Samples:** {}", metrics.n_train);
    let _ = writeln!(out, "- **Test Samples:** {}", metrics.n_test);
    let _ = writeln!(out);
    let _ = writeln!(out, "## Performance");
    let _ = writeln!(out, "- **MAE:** {:.6}", metrics.mae);
    let _ = writeln!(out, "- **R²:** {:.3}", metrics.r2);
    let _ = writeln!(out);
    let _ = writeln!(out, "## Stress Testing Results");
    let _ = writeln!(out, "| Scenario | MAE | Degradation |");
    let _ = writeln!(out, "|----------|-----|-------------|");
    for (name, mae) in stress.iter() {
        let _ = writeln!(
            out,
            "| {} | {mae:.6} | {:.2}\u{d7} |",
            scenario_label(name),
            mae / baseline_mae,
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "## Risk Assessment");
    let _ = writeln!(out, "- **Risk Score:** {}", risk.risk_score);
    let _ = writeln!(out, "- **Decision:** **{}**", risk.decision);
    let _ = writeln!(out);
    let _ = writeln!(out, "## Interpretation");
    let _ = writeln!(out, "{INTERPRETATION}");
    let _ = writeln!(out);
    let _ = writeln!(out, "## Limitations");
    for item in LIMITATIONS {
        let _ = writeln!(out, "- {item}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "## Governance Status");
    let banner = if risk.decision.is_approved() {
        "\u{2705} **Approved for production**"
    } else {
        "\u{1f6ab} **Not approved for production**"
    };
    let _ = writeln!(out, "{banner}");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "_Generated {}_",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    Ok(out)
}

fn scenario_label(name: &str) -> &str {
    match name {
        BASELINE => "Baseline",
        "noise" => "Noise Injection",
        "vol_spike" => "Volatility Spike",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::feature_set;
    use crate::risk::Decision;

    fn metrics() -> BaselineMetrics {
        BaselineMetrics {
            mae: 0.004_321,
            r2: 0.412,
            n_train: 1_750,
            n_test: 750,
            features: feature_set(),
        }
    }

    fn stress() -> StressResults {
        StressResults::from_entries([
            ("baseline".to_string(), 0.004_321),
            ("noise".to_string(), 0.005_23),
            ("vol_spike".to_string(), 0.011_2),
        ])
    }

    fn risk(decision: Decision, score: u32) -> RiskAssessment {
        RiskAssessment {
            baseline_mae: 0.004_321,
            noise_degradation: 1.21,
            volatility_degradation: 2.59,
            r2: 0.412,
            risk_score: score,
            decision,
        }
    }

    fn assembler_with_artifacts(
        decision: Decision,
        score: u32,
    ) -> (tempfile::TempDir, ReportAssembler, ArtifactStore) {
        let dir = tempfile::tempdir().expect("create tempdir");
        let store = ArtifactStore::new(dir.path().join("registry"));
        store.write_json("m1", Artifact::Metrics, &metrics()).unwrap();
        store
            .write_json("m1", Artifact::StressResults, &stress())
            .unwrap();
        store
            .write_json("m1", Artifact::RiskAssessment, &risk(decision, score))
            .unwrap();
        (dir, ReportAssembler::new(store.clone()), store)
    }

    #[test]
    fn renders_all_fixed_sections() {
        let (_dir, assembler, _store) = assembler_with_artifacts(Decision::Reject, 4);
        let card = assembler.assemble("m1").unwrap();
        for heading in [
            "# Model Card — m1",
            "## Model Overview",
            "## Performance",
            "## Stress Testing Results",
            "## Risk Assessment",
            "## Interpretation",
            "## Limitations",
            "## Governance Status",
        ] {
            assert!(card.contains(heading), "missing section: {heading}");
        }
    }

    #[test]
    fn formats_metrics_to_fixed_precision() {
        let (_dir, assembler, _store) = assembler_with_artifacts(Decision::Reject, 4);
        let card = assembler.assemble("m1").unwrap();
        assert!(card.contains("**MAE:** 0.004321"));
        assert!(card.contains("**R²:** 0.412"));
    }

    #[test]
    fn degradation_table_has_baseline_first_at_unity() {
        let (_dir, assembler, _store) = assembler_with_artifacts(Decision::Reject, 4);
        let card = assembler.assemble("m1").unwrap();
        let baseline_pos = card.find("| Baseline | 0.004321 | 1.00\u{d7} |").unwrap();
        let noise_pos = card.find("| Noise Injection | 0.005230 | 1.21\u{d7} |").unwrap();
        let vol_pos = card.find("| Volatility Spike | 0.011200 | 2.59\u{d7} |").unwrap();
        assert!(baseline_pos < noise_pos);
        assert!(noise_pos < vol_pos);
    }

    #[test]
    fn banner_is_approved_only_for_approve() {
        let (_dir, assembler, _store) = assembler_with_artifacts(Decision::Approve, 0);
        let card = assembler.assemble("m1").unwrap();
        assert!(card.contains("Approved for production"));
        assert!(!card.contains("Not approved"));

        let (_dir2, caution, _s2) = assembler_with_artifacts(Decision::ApproveWithCaution, 2);
        let card = caution.assemble("m1").unwrap();
        assert!(card.contains("Not approved for production"));
    }

    #[test]
    fn missing_upstream_artifact_names_its_stage() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let store = ArtifactStore::new(dir.path().join("registry"));
        store.write_json("m1", Artifact::Metrics, &metrics()).unwrap();
        let assembler = ReportAssembler::new(store);
        let err = assembler.assemble("m1").unwrap_err();
        assert_eq!(err.code(), "MG-3001");
        assert!(err.to_string().contains("stress stage"));
    }

    #[test]
    fn card_is_persisted_as_artifact() {
        let (_dir, assembler, store) = assembler_with_artifacts(Decision::Approve, 1);
        let card = assembler.assemble("m1").unwrap();
        let stored = store.read_text("m1", Artifact::ModelCard).unwrap();
        assert_eq!(stored, card);
    }

    #[test]
    fn zero_baseline_in_stress_artifact_is_rejected() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let store = ArtifactStore::new(dir.path().join("registry"));
        store.write_json("m1", Artifact::Metrics, &metrics()).unwrap();
        let degenerate = StressResults::from_entries([
            ("baseline".to_string(), 0.0),
            ("noise".to_string(), 0.005),
            ("vol_spike".to_string(), 0.011),
        ]);
        store
            .write_json("m1", Artifact::StressResults, &degenerate)
            .unwrap();
        store
            .write_json("m1", Artifact::RiskAssessment, &risk(Decision::Reject, 4))
            .unwrap();
        let err = ReportAssembler::new(store).assemble("m1").unwrap_err();
        assert_eq!(err.code(), "MG-2003");
    }
}
