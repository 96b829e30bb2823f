//! File-backed artifact store keyed by model identifier.
//!
//! Layout: `<root>/<model_id>/<artifact file>`. Every write goes through a
//! temp file and `fs::rename`, so a stage either publishes its complete
//! artifact or leaves the previous one untouched. Re-runs overwrite.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::errors::{GovError, Result};

/// Closed set of artifacts a model's namespace can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// Fitted predictor (training output).
    Model,
    /// Baseline quality metrics (training output).
    Metrics,
    /// Scenario-to-MAE mapping (stress harness output).
    StressResults,
    /// Scored risk decision (risk scorer output).
    RiskAssessment,
    /// Rendered governance document (report assembler output).
    ModelCard,
}

impl Artifact {
    /// Stable artifact name used in error messages and audit events.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Metrics => "metrics",
            Self::StressResults => "stress_results",
            Self::RiskAssessment => "risk_assessment",
            Self::ModelCard => "model_card",
        }
    }

    /// File name inside the model's namespace directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Model => "model.json",
            Self::Metrics => "metrics.json",
            Self::StressResults => "stress_results.json",
            Self::RiskAssessment => "risk_assessment.json",
            Self::ModelCard => "MODEL_CARD.md",
        }
    }

    /// Pipeline stage that produces this artifact.
    ///
    /// Named in `MissingArtifact` errors so the operator knows which stage
    /// to run first.
    #[must_use]
    pub const fn producing_stage(self) -> &'static str {
        match self {
            Self::Model | Self::Metrics => "train",
            Self::StressResults => "stress",
            Self::RiskAssessment => "score",
            Self::ModelCard => "report",
        }
    }
}

/// Keyed read/write access to one registry root.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Open a store rooted at `root`; directories are created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Registry root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Namespace directory for one model identifier.
    #[must_use]
    pub fn model_dir(&self, model_id: &str) -> PathBuf {
        self.root.join(model_id)
    }

    /// Absolute path of one artifact.
    #[must_use]
    pub fn artifact_path(&self, model_id: &str, artifact: Artifact) -> PathBuf {
        self.model_dir(model_id).join(artifact.file_name())
    }

    /// Whether the artifact has already been published for this model.
    #[must_use]
    pub fn exists(&self, model_id: &str, artifact: Artifact) -> bool {
        self.artifact_path(model_id, artifact).exists()
    }

    /// Serialize and atomically publish a JSON artifact.
    pub fn write_json<T: Serialize>(
        &self,
        model_id: &str,
        artifact: Artifact,
        value: &T,
    ) -> Result<()> {
        let data = serde_json::to_vec_pretty(value)?;
        self.write_bytes(model_id, artifact, &data)
    }

    /// Load and deserialize a JSON artifact.
    pub fn read_json<T: DeserializeOwned>(&self, model_id: &str, artifact: Artifact) -> Result<T> {
        let raw = self.read_bytes(model_id, artifact)?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Atomically publish a text artifact (the rendered model card).
    pub fn write_text(&self, model_id: &str, artifact: Artifact, text: &str) -> Result<()> {
        self.write_bytes(model_id, artifact, text.as_bytes())
    }

    /// Load a text artifact.
    pub fn read_text(&self, model_id: &str, artifact: Artifact) -> Result<String> {
        let raw = self.read_bytes(model_id, artifact)?;
        String::from_utf8(raw).map_err(|e| GovError::Serialization {
            context: "utf8",
            details: e.to_string(),
        })
    }

    fn write_bytes(&self, model_id: &str, artifact: Artifact, data: &[u8]) -> Result<()> {
        let path = self.artifact_path(model_id, artifact);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| GovError::io(parent, source))?;
        }
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, data).map_err(|source| GovError::io(&tmp_path, source))?;
        fs::rename(&tmp_path, &path).map_err(|source| GovError::io(&path, source))?;
        Ok(())
    }

    fn read_bytes(&self, model_id: &str, artifact: Artifact) -> Result<Vec<u8>> {
        let path = self.artifact_path(model_id, artifact);
        // Absence is decided by the read itself, never a separate check.
        fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                GovError::MissingArtifact {
                    model_id: model_id.to_string(),
                    artifact: artifact.name(),
                    stage: artifact.producing_stage(),
                }
            } else {
                GovError::io(&path, source)
            }
        })
    }
}
