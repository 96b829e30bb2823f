//! Rule-based risk scoring and the three-way governance decision.
//!
//! The scorer is a flat additive checklist: an ordered list of independent
//! predicate-to-increment pairs, every rule evaluated on every run, never
//! short-circuited. Identical inputs always produce an identical assessment.

#![allow(missing_docs)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::config::RiskConfig;
use crate::core::errors::{GovError, Result};
use crate::model::BaselineMetrics;
use crate::registry::{Artifact, ArtifactStore};
use crate::stress::harness::{BASELINE, StressResults};

/// Three-way deployment gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "APPROVE")]
    Approve,
    #[serde(rename = "APPROVE WITH CAUTION")]
    ApproveWithCaution,
    #[serde(rename = "REJECT")]
    Reject,
}

impl Decision {
    /// The decision label as it appears in artifacts and reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Approve => "APPROVE",
            Self::ApproveWithCaution => "APPROVE WITH CAUTION",
            Self::Reject => "REJECT",
        }
    }

    /// Whether this decision clears the binary governance banner.
    #[must_use]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approve)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Append-only assessment record, regenerated wholesale on re-run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub baseline_mae: f64,
    pub noise_degradation: f64,
    pub volatility_degradation: f64,
    pub r2: f64,
    pub risk_score: u32,
    pub decision: Decision,
}

/// One independent risk rule: a predicate outcome and its point weight.
#[derive(Debug, Clone, Copy)]
struct RiskRule {
    points: u32,
    triggered: bool,
}

/// Maps a final risk score onto the decision partition.
///
/// The partition is total and non-overlapping over the non-negative
/// integers: `<= 1`, `== 2`, `>= 3`.
#[must_use]
pub const fn decision_from_score(risk_score: u32) -> Decision {
    match risk_score {
        0 | 1 => Decision::Approve,
        2 => Decision::ApproveWithCaution,
        _ => Decision::Reject,
    }
}

/// Scores one model's stress results against its baseline metrics.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    store: ArtifactStore,
    thresholds: RiskConfig,
}

impl RiskScorer {
    #[must_use]
    pub const fn new(store: ArtifactStore, thresholds: RiskConfig) -> Self {
        Self { store, thresholds }
    }

    /// Compute, persist, and return the risk assessment.
    ///
    /// Fails with `DivisionByZero` when the baseline MAE is exactly zero:
    /// degradation ratios are undefined there and must never be coerced to
    /// a sentinel value.
    pub fn score(
        &self,
        model_id: &str,
        metrics: &BaselineMetrics,
        stress: &StressResults,
    ) -> Result<RiskAssessment> {
        let baseline_mae = stress.require_mae(BASELINE)?;
        if baseline_mae == 0.0 {
            return Err(GovError::DivisionByZero);
        }
        let noise_degradation = stress.require_mae("noise")? / baseline_mae;
        let volatility_degradation = stress.require_mae("vol_spike")? / baseline_mae;

        // Every rule is evaluated; order only affects audit readability.
        let rules = [
            RiskRule {
                points: 1,
                triggered: noise_degradation > self.thresholds.noise_degradation_max,
            },
            RiskRule {
                points: 2,
                triggered: volatility_degradation > self.thresholds.volatility_degradation_max,
            },
            RiskRule {
                points: 1,
                triggered: metrics.r2 < self.thresholds.r2_floor,
            },
        ];
        let risk_score = rules
            .iter()
            .map(|rule| rule.points * u32::from(rule.triggered))
            .sum();

        let assessment = RiskAssessment {
            baseline_mae,
            noise_degradation,
            volatility_degradation,
            r2: metrics.r2,
            risk_score,
            decision: decision_from_score(risk_score),
        };
        self.store
            .write_json(model_id, Artifact::RiskAssessment, &assessment)?;
        Ok(assessment)
    }
}
