//! Stress harness: baseline and per-scenario MAE against one model.
//!
//! Every scenario is evaluated against the same ground-truth target vector
//! as the baseline — stress perturbs inputs, never the truth.

#![allow(missing_docs)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::errors::{GovError, Result};
use crate::data::table::EvaluationTable;
use crate::model::{Predictor, mean_absolute_error};
use crate::registry::{Artifact, ArtifactStore};
use crate::stress::perturb;

/// Key of the unperturbed entry in [`StressResults`].
pub const BASELINE: &str = "baseline";

/// A named perturbation applied to the evaluation table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scenario {
    /// Independent Gaussian noise on every feature cell.
    NoiseInjection { scale: f64, seed: u64 },
    /// Volatility-regime amplification of the vol feature columns.
    VolatilityRegime { multiplier: f64 },
}

impl Scenario {
    /// Stable scenario key used in artifacts and risk rules.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoiseInjection { .. } => "noise",
            Self::VolatilityRegime { .. } => "vol_spike",
        }
    }

    fn apply(self, table: &EvaluationTable) -> Result<EvaluationTable> {
        match self {
            Self::NoiseInjection { scale, seed } => perturb::noise_injection(table, scale, seed),
            Self::VolatilityRegime { multiplier } => perturb::volatility_regime(table, multiplier),
        }
    }
}

/// Scenario-name to MAE mapping, always containing a `baseline` entry.
///
/// A sorted map keeps serialization deterministic so identical runs produce
/// byte-identical artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StressResults {
    entries: BTreeMap<String, f64>,
}

impl StressResults {
    /// Build a result set directly from `(scenario, mae)` pairs.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn baseline_mae(&self) -> f64 {
        self.entries.get(BASELINE).copied().unwrap_or(f64::NAN)
    }

    /// MAE of a named scenario, if present.
    #[must_use]
    pub fn mae(&self, scenario: &str) -> Option<f64> {
        self.entries.get(scenario).copied()
    }

    /// Scenario MAE of `scenario`, or an error sending the operator back to
    /// the stress stage if the persisted results lack the entry.
    pub fn require_mae(&self, scenario: &'static str) -> Result<f64> {
        self.mae(scenario)
            .ok_or(GovError::IncompleteStressResults { scenario })
    }

    /// All entries in sorted key order (`baseline` sorts first).
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Runs the perturbation protocol against one fitted model and persists the
/// resulting scenario map.
#[derive(Debug, Clone)]
pub struct StressHarness {
    store: ArtifactStore,
}

impl StressHarness {
    #[must_use]
    pub const fn new(store: ArtifactStore) -> Self {
        Self { store }
    }

    /// Evaluate baseline plus each scenario; persist and return the mapping.
    ///
    /// Fails with `FeatureMismatch` if the model expects a feature the table
    /// lacks, and `EmptyEvaluationSet` on a zero-row table. Re-running with
    /// identical inputs overwrites the prior artifact with identical bytes.
    pub fn run(
        &self,
        model_id: &str,
        model: &dyn Predictor,
        table: &EvaluationTable,
        scenarios: &[Scenario],
    ) -> Result<StressResults> {
        if table.n_rows() == 0 {
            return Err(GovError::EmptyEvaluationSet);
        }
        table.require_features(model.feature_names())?;

        let y_true = table.target();
        let mut entries = BTreeMap::new();

        let baseline_pred = model.predict(&table.feature_rows(model.feature_names())?);
        entries.insert(BASELINE.to_string(), mean_absolute_error(y_true, &baseline_pred));

        for scenario in scenarios {
            if entries.contains_key(scenario.name()) {
                return Err(GovError::InvalidScenario {
                    scenario: scenario.name(),
                    details: "duplicate scenario name in one run".to_string(),
                });
            }
            let stressed = scenario.apply(table)?;
            let pred = model.predict(&stressed.feature_rows(model.feature_names())?);
            entries.insert(
                scenario.name().to_string(),
                mean_absolute_error(y_true, &pred),
            );
        }

        let results = StressResults { entries };
        self.store
            .write_json(model_id, Artifact::StressResults, &results)?;
        Ok(results)
    }
}
