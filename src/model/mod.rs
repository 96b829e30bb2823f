//! Predictor seam and baseline quality metrics.
//!
//! The governance core never inspects model internals: everything downstream
//! of training talks to the [`Predictor`] trait and the read-only
//! [`BaselineMetrics`] summary.

pub mod ridge;

use serde::{Deserialize, Serialize};

/// Opaque predictor contract consumed by the stress harness.
pub trait Predictor {
    /// The fixed ordered feature set this model was trained on.
    fn feature_names(&self) -> &[String];

    /// Predict one numeric value per row-major feature vector.
    fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64>;
}

/// Immutable training summary, consumed read-only by scoring and reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineMetrics {
    /// Mean absolute error on the held-out slice.
    pub mae: f64,
    /// Coefficient of determination; may be negative.
    pub r2: f64,
    /// Rows in the training slice.
    pub n_train: usize,
    /// Rows in the held-out slice.
    pub n_test: usize,
    /// Feature schema the model was fit on.
    pub features: Vec<String>,
}

/// Mean absolute error over paired vectors.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    debug_assert_eq!(y_true.len(), y_pred.len());
    if y_true.is_empty() {
        return 0.0;
    }
    y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).abs())
        .sum::<f64>()
        / y_true.len() as f64
}

/// Coefficient of determination.
///
/// A constant target has no variance to explain; that degenerate case maps
/// to 0.0 rather than a division by zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn r_squared(y_true: &[f64], y_pred: &[f64]) -> f64 {
    debug_assert_eq!(y_true.len(), y_pred.len());
    if y_true.is_empty() {
        return 0.0;
    }
    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum();
    if ss_tot == 0.0 {
        return 0.0;
    }
    1.0 - ss_res / ss_tot
}
