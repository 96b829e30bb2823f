//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use model_gov::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{GovError, Result};

// Data
pub use crate::data::synthetic::make_synthetic_market;
pub use crate::data::table::{EvaluationTable, FEATURES, TARGET, VOLATILITY_FEATURES};

// Model
pub use crate::model::ridge::RidgeModel;
pub use crate::model::{BaselineMetrics, Predictor, mean_absolute_error, r_squared};

// Registry
pub use crate::registry::{Artifact, ArtifactStore};

// Stress
pub use crate::stress::{Scenario, StressHarness, StressResults};

// Risk and reporting
pub use crate::report::ReportAssembler;
pub use crate::risk::{Decision, RiskAssessment, RiskScorer, decision_from_score};

// Pipeline
pub use crate::pipeline::{DEFAULT_MODEL_ID, Pipeline, RunOutcome};
