//! Closed-form ridge regressor over the fixed feature schema.
//!
//! Normal equations with an unpenalized intercept, solved by Gaussian
//! elimination with partial pivoting. Fitting is fully deterministic, so the
//! persisted model artifact is reproducible byte-for-byte.

#![allow(clippy::cast_precision_loss)]

use serde::{Deserialize, Serialize};

use crate::core::errors::{GovError, Result};
use crate::data::table::EvaluationTable;
use crate::model::Predictor;

/// Fitted ridge model: one weight per feature plus an intercept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeModel {
    features: Vec<String>,
    weights: Vec<f64>,
    intercept: f64,
    lambda: f64,
}

impl RidgeModel {
    /// Fit on the feature columns of `table` against its target.
    pub fn fit(table: &EvaluationTable, features: &[String], lambda: f64) -> Result<Self> {
        if table.n_rows() == 0 {
            return Err(GovError::EmptyEvaluationSet);
        }
        if lambda < 0.0 {
            return Err(GovError::TrainingFailure {
                details: format!("ridge lambda must be >= 0, got {lambda}"),
            });
        }
        let rows = table.feature_rows(features)?;
        let y = table.target();
        let k = features.len() + 1; // intercept in slot 0

        // Accumulate X'X and X'y with the intercept as an implicit 1-column.
        let mut xtx = vec![vec![0.0; k]; k];
        let mut xty = vec![0.0; k];
        for (row, &target) in rows.iter().zip(y) {
            for a in 0..k {
                let va = if a == 0 { 1.0 } else { row[a - 1] };
                xty[a] += va * target;
                for b in 0..k {
                    let vb = if b == 0 { 1.0 } else { row[b - 1] };
                    xtx[a][b] += va * vb;
                }
            }
        }
        for (i, row) in xtx.iter_mut().enumerate().skip(1) {
            row[i] += lambda;
        }

        let solution = solve(xtx, xty)?;
        Ok(Self {
            features: features.to_vec(),
            weights: solution[1..].to_vec(),
            intercept: solution[0],
            lambda,
        })
    }

    /// Fitted per-feature weights, aligned with [`Predictor::feature_names`].
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Regularization strength the model was fit with.
    #[must_use]
    pub const fn lambda(&self) -> f64 {
        self.lambda
    }
}

impl Predictor for RidgeModel {
    fn feature_names(&self) -> &[String] {
        &self.features
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter()
            .map(|row| {
                self.weights
                    .iter()
                    .zip(row)
                    .fold(self.intercept, |acc, (w, x)| w.mul_add(*x, acc))
            })
            .collect()
    }
}

/// Gaussian elimination with partial pivoting on a dense square system.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&x, &y| {
                a[x][col]
                    .abs()
                    .partial_cmp(&a[y][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-12 {
            return Err(GovError::TrainingFailure {
                details: "normal equations are singular; features may be collinear".to_string(),
            });
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let acc: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - acc) / a[row][row];
    }
    Ok(x)
}
