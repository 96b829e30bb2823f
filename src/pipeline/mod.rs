//! Stage orchestration: train, stress, score, report.
//!
//! Stages run strictly in order, each persisting its artifact before the
//! next begins, so every stage is independently re-runnable and the whole
//! run is auditable from the registry alone. Single-writer-per-identifier
//! discipline is assumed from the caller; nothing here spawns threads.

#![allow(missing_docs)]

use crate::core::config::Config;
use crate::core::errors::Result;
use crate::data::synthetic::make_synthetic_market;
use crate::data::table::{EvaluationTable, feature_set};
use crate::logger::AuditLog;
use crate::model::ridge::RidgeModel;
use crate::model::{BaselineMetrics, Predictor, mean_absolute_error, r_squared};
use crate::registry::{Artifact, ArtifactStore};
use crate::report::ReportAssembler;
use crate::risk::{RiskAssessment, RiskScorer};
use crate::stress::{Scenario, StressHarness, StressResults};

/// Model identifier used when the caller does not supply one.
pub const DEFAULT_MODEL_ID: &str = "ridge_vol_model_v1";

/// Everything a full run produced, for callers that want the summary.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub metrics: BaselineMetrics,
    pub stress: StressResults,
    pub assessment: RiskAssessment,
    pub card: String,
}

/// Sequential driver for the governance pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    store: ArtifactStore,
    audit: AuditLog,
}

impl Pipeline {
    /// Build a pipeline from config, deriving registry and audit locations.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        let store = ArtifactStore::new(config.registry.root_dir.clone());
        let audit = AuditLog::new(config.registry.audit_log.clone());
        Self {
            config,
            store,
            audit,
        }
    }

    /// Build a pipeline against an explicit store, with auditing disabled.
    #[must_use]
    pub fn with_store(config: Config, store: ArtifactStore) -> Self {
        Self {
            config,
            store,
            audit: AuditLog::disabled(),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Train the ridge model on the synthetic series and register it.
    pub fn train(&self, model_id: &str) -> Result<BaselineMetrics> {
        self.audit.stage_start("train", model_id);
        let result = self.train_inner(model_id);
        self.finish("train", model_id, result)
    }

    fn train_inner(&self, model_id: &str) -> Result<BaselineMetrics> {
        let features = feature_set();
        let (train, test) = self.evaluation_split()?;

        let model = RidgeModel::fit(&train, &features, self.config.training.ridge_lambda)?;
        let preds = model.predict(&test.feature_rows(&features)?);
        let metrics = BaselineMetrics {
            mae: mean_absolute_error(test.target(), &preds),
            r2: r_squared(test.target(), &preds),
            n_train: train.n_rows(),
            n_test: test.n_rows(),
            features,
        };

        self.store.write_json(model_id, Artifact::Model, &model)?;
        self.audit.artifact_written("train", model_id, Artifact::Model.name());
        self.store.write_json(model_id, Artifact::Metrics, &metrics)?;
        self.audit
            .artifact_written("train", model_id, Artifact::Metrics.name());
        Ok(metrics)
    }

    /// Run the perturbation protocol against the registered model.
    pub fn stress(&self, model_id: &str) -> Result<StressResults> {
        self.audit.stage_start("stress", model_id);
        let result = self.stress_inner(model_id);
        let result = result.inspect(|_| {
            self.audit
                .artifact_written("stress", model_id, Artifact::StressResults.name());
        });
        self.finish("stress", model_id, result)
    }

    fn stress_inner(&self, model_id: &str) -> Result<StressResults> {
        let model: RidgeModel = self.store.read_json(model_id, Artifact::Model)?;
        let (_, test) = self.evaluation_split()?;
        let scenarios = [
            Scenario::NoiseInjection {
                scale: self.config.stress.noise_scale,
                seed: self.config.stress.noise_seed,
            },
            Scenario::VolatilityRegime {
                multiplier: self.config.stress.vol_multiplier,
            },
        ];
        StressHarness::new(self.store.clone()).run(model_id, &model, &test, &scenarios)
    }

    /// Score the stress results into a risk assessment.
    pub fn score(&self, model_id: &str) -> Result<RiskAssessment> {
        self.audit.stage_start("score", model_id);
        let result = self.score_inner(model_id);
        let result = result.inspect(|_| {
            self.audit
                .artifact_written("score", model_id, Artifact::RiskAssessment.name());
        });
        self.finish("score", model_id, result)
    }

    fn score_inner(&self, model_id: &str) -> Result<RiskAssessment> {
        let metrics: BaselineMetrics = self.store.read_json(model_id, Artifact::Metrics)?;
        let stress: StressResults = self.store.read_json(model_id, Artifact::StressResults)?;
        RiskScorer::new(self.store.clone(), self.config.risk.clone()).score(
            model_id,
            &metrics,
            &stress,
        )
    }

    /// Assemble and persist the governance model card.
    pub fn report(&self, model_id: &str) -> Result<String> {
        self.audit.stage_start("report", model_id);
        let result = ReportAssembler::new(self.store.clone()).assemble(model_id);
        let result = result.inspect(|_| {
            self.audit
                .artifact_written("report", model_id, Artifact::ModelCard.name());
        });
        self.finish("report", model_id, result)
    }

    /// Run every stage in order.
    pub fn run(&self, model_id: &str) -> Result<RunOutcome> {
        let metrics = self.train(model_id)?;
        let stress = self.stress(model_id)?;
        let assessment = self.score(model_id)?;
        let card = self.report(model_id)?;
        Ok(RunOutcome {
            metrics,
            stress,
            assessment,
            card,
        })
    }

    /// Regenerate the chronological split the whole pipeline shares.
    fn evaluation_split(&self) -> Result<(EvaluationTable, EvaluationTable)> {
        let table = make_synthetic_market(&self.config.data)?;
        Ok(table.time_split(self.config.data.train_frac))
    }

    fn finish<T>(&self, stage: &'static str, model_id: &str, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.audit.stage_complete(stage, model_id, None);
                Ok(value)
            }
            Err(err) => {
                self.audit
                    .stage_failed(stage, model_id, err.code(), err.to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::Decision;

    fn pipeline() -> (tempfile::TempDir, Pipeline) {
        let dir = tempfile::tempdir().expect("create tempdir");
        let mut config = Config::default();
        config.data.n_samples = 600;
        let store = ArtifactStore::new(dir.path().join("registry"));
        (dir, Pipeline::with_store(config, store))
    }

    #[test]
    fn stages_out_of_order_fail_with_missing_artifact() {
        let (_dir, pipeline) = pipeline();
        let err = pipeline.stress("m1").unwrap_err();
        assert_eq!(err.code(), "MG-3001");
        assert!(err.to_string().contains("train stage"));

        let err = pipeline.score("m1").unwrap_err();
        assert_eq!(err.code(), "MG-3001");

        let err = pipeline.report("m1").unwrap_err();
        assert_eq!(err.code(), "MG-3001");
    }

    #[test]
    fn full_run_produces_every_artifact() {
        let (_dir, pipeline) = pipeline();
        let outcome = pipeline.run("m1").unwrap();
        for artifact in [
            Artifact::Model,
            Artifact::Metrics,
            Artifact::StressResults,
            Artifact::RiskAssessment,
            Artifact::ModelCard,
        ] {
            assert!(
                pipeline.store().exists("m1", artifact),
                "missing {}",
                artifact.name()
            );
        }
        assert_eq!(outcome.metrics.n_train + outcome.metrics.n_test, 600);
        assert!(outcome.stress.baseline_mae() > 0.0);
        assert!(matches!(
            outcome.assessment.decision,
            Decision::Approve | Decision::ApproveWithCaution | Decision::Reject
        ));
        assert!(outcome.card.contains("# Model Card — m1"));
    }

    #[test]
    fn stress_and_score_reruns_are_deterministic() {
        let (_dir, pipeline) = pipeline();
        pipeline.run("m1").unwrap();

        let stress_path = pipeline.store().artifact_path("m1", Artifact::StressResults);
        let risk_path = pipeline.store().artifact_path("m1", Artifact::RiskAssessment);
        let stress_a = std::fs::read(&stress_path).unwrap();
        let risk_a = std::fs::read(&risk_path).unwrap();

        pipeline.stress("m1").unwrap();
        pipeline.score("m1").unwrap();

        assert_eq!(std::fs::read(&stress_path).unwrap(), stress_a);
        assert_eq!(std::fs::read(&risk_path).unwrap(), risk_a);
    }

    #[test]
    fn model_ids_are_namespaced() {
        let (_dir, pipeline) = pipeline();
        pipeline.run("m1").unwrap();
        assert!(!pipeline.store().exists("m2", Artifact::Metrics));
    }
}
