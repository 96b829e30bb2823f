//! MG-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, GovError>;

/// Top-level error type for the model governance pipeline.
///
/// Every failure is deterministic given fixed inputs, so nothing here is
/// retried automatically; errors abort the current stage and leave any
/// previously written artifact untouched.
#[derive(Debug, Error)]
pub enum GovError {
    #[error("[MG-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[MG-1002] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[MG-2001] model expects feature '{feature}' absent from the evaluation table")]
    FeatureMismatch { feature: String },

    #[error("[MG-2002] evaluation table has zero rows")]
    EmptyEvaluationSet,

    #[error("[MG-2003] baseline MAE is zero, degradation ratios are undefined")]
    DivisionByZero,

    #[error("[MG-2004] invalid scenario '{scenario}': {details}")]
    InvalidScenario {
        scenario: &'static str,
        details: String,
    },

    #[error("[MG-2005] training failure: {details}")]
    TrainingFailure { details: String },

    #[error("[MG-2006] stress results lack the '{scenario}' entry: re-run the stress stage")]
    IncompleteStressResults { scenario: &'static str },

    #[error("[MG-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error(
        "[MG-3001] missing artifact '{artifact}' for model '{model_id}': run the {stage} stage first"
    )]
    MissingArtifact {
        model_id: String,
        artifact: &'static str,
        stage: &'static str,
    },

    #[error("[MG-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GovError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "MG-1001",
            Self::ConfigParse { .. } => "MG-1002",
            Self::FeatureMismatch { .. } => "MG-2001",
            Self::EmptyEvaluationSet => "MG-2002",
            Self::DivisionByZero => "MG-2003",
            Self::InvalidScenario { .. } => "MG-2004",
            Self::TrainingFailure { .. } => "MG-2005",
            Self::IncompleteStressResults { .. } => "MG-2006",
            Self::Serialization { .. } => "MG-2101",
            Self::MissingArtifact { .. } => "MG-3001",
            Self::Io { .. } => "MG-3002",
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for GovError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for GovError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
