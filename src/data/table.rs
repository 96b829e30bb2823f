//! Column-major evaluation table with a fixed feature schema.
//!
//! Row order is chronological and is never reshuffled: the evaluation slice
//! is always a contiguous, later portion of the full series.

#![allow(missing_docs)]
#![allow(clippy::cast_precision_loss)]

use crate::core::errors::{GovError, Result};

/// Feature schema every model in this pipeline is trained on, in declaration order.
pub const FEATURES: [&str; 5] = ["vol_10", "vol_30", "mom_5", "mom_20", "dd_60"];

/// The realized-volatility subset targeted by regime amplification.
pub const VOLATILITY_FEATURES: [&str; 2] = ["vol_10", "vol_30"];

/// Target column: next-window realized volatility.
pub const TARGET: &str = "target_next_vol";

/// Ordered feature columns plus one target column, all equal length.
///
/// Columnar storage makes the table invariant structural: a row cannot be
/// missing a feature value because columns are dense vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationTable {
    features: Vec<String>,
    columns: Vec<Vec<f64>>,
    target: Vec<f64>,
}

impl EvaluationTable {
    /// Build a table, validating shape invariants.
    pub fn new(features: Vec<String>, columns: Vec<Vec<f64>>, target: Vec<f64>) -> Result<Self> {
        if features.len() != columns.len() {
            return Err(GovError::InvalidConfig {
                details: format!(
                    "declared {} features but got {} columns",
                    features.len(),
                    columns.len()
                ),
            });
        }
        for (name, column) in features.iter().zip(&columns) {
            if column.len() != target.len() {
                return Err(GovError::InvalidConfig {
                    details: format!(
                        "column '{name}' has {} rows, target has {}",
                        column.len(),
                        target.len()
                    ),
                });
            }
        }
        for (i, name) in features.iter().enumerate() {
            if features[..i].contains(name) {
                return Err(GovError::InvalidConfig {
                    details: format!("duplicate feature column '{name}'"),
                });
            }
        }
        Ok(Self {
            features,
            columns,
            target,
        })
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.target.len()
    }

    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.features
    }

    #[must_use]
    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// Values of one feature column, if declared.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.features
            .iter()
            .position(|f| f == name)
            .map(|i| self.columns[i].as_slice())
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut Vec<f64>> {
        self.features
            .iter()
            .position(|f| f == name)
            .map(|i| &mut self.columns[i])
    }

    /// Verify that every required feature is declared on this table.
    pub fn require_features(&self, required: &[String]) -> Result<()> {
        for name in required {
            if !self.features.contains(name) {
                return Err(GovError::FeatureMismatch {
                    feature: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Materialize row-major feature vectors in the order `required` lists them.
    ///
    /// This is the only shape the predictor seam accepts; stress transforms
    /// only ever change cell values, never this column selection.
    pub fn feature_rows(&self, required: &[String]) -> Result<Vec<Vec<f64>>> {
        self.require_features(required)?;
        let selected: Vec<&[f64]> = required
            .iter()
            .map(|name| self.column(name).unwrap_or_default())
            .collect();
        Ok((0..self.n_rows())
            .map(|row| selected.iter().map(|col| col[row]).collect())
            .collect())
    }

    /// Chronological train/test split with no shuffling.
    #[must_use]
    pub fn time_split(&self, train_frac: f64) -> (Self, Self) {
        let cut = ((self.n_rows() as f64) * train_frac) as usize;
        (self.slice(0, cut), self.slice(cut, self.n_rows()))
    }

    fn slice(&self, start: usize, end: usize) -> Self {
        Self {
            features: self.features.clone(),
            columns: self
                .columns
                .iter()
                .map(|col| col[start..end].to_vec())
                .collect(),
            target: self.target[start..end].to_vec(),
        }
    }
}

/// Owned feature schema in the declared order.
#[must_use]
pub fn feature_set() -> Vec<String> {
    FEATURES.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_table() -> EvaluationTable {
        let features = feature_set();
        let columns = (0..features.len())
            .map(|i| (0..4).map(|r| (i * 10 + r) as f64 * 0.01).collect())
            .collect();
        let target = vec![0.1, 0.2, 0.3, 0.4];
        EvaluationTable::new(features, columns, target).unwrap()
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = EvaluationTable::new(
            vec!["vol_10".to_string()],
            vec![vec![1.0, 2.0]],
            vec![1.0, 2.0, 3.0],
        )
        .unwrap_err();
        assert_eq!(err.code(), "MG-1001");
    }

    #[test]
    fn rejects_duplicate_features() {
        let err = EvaluationTable::new(
            vec!["vol_10".to_string(), "vol_10".to_string()],
            vec![vec![1.0], vec![2.0]],
            vec![0.5],
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn require_features_flags_the_missing_one() {
        let table = small_table();
        let mut wanted = feature_set();
        wanted.push("vol_90".to_string());
        let err = table.require_features(&wanted).unwrap_err();
        assert_eq!(err.code(), "MG-2001");
        assert!(err.to_string().contains("vol_90"));
    }

    #[test]
    fn feature_rows_are_row_major_in_requested_order() {
        let table = small_table();
        let rows = table
            .feature_rows(&["mom_5".to_string(), "vol_10".to_string()])
            .unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], vec![0.20, 0.00]);
        assert_eq!(rows[3], vec![0.23, 0.03]);
    }

    #[test]
    fn time_split_is_contiguous_and_ordered() {
        let table = small_table();
        let (train, test) = table.time_split(0.5);
        assert_eq!(train.n_rows(), 2);
        assert_eq!(test.n_rows(), 2);
        assert_eq!(train.target(), &[0.1, 0.2]);
        assert_eq!(test.target(), &[0.3, 0.4]);
        assert_eq!(train.feature_names(), table.feature_names());
    }

    #[test]
    fn volatility_features_are_a_subset_of_the_schema() {
        for name in VOLATILITY_FEATURES {
            assert!(FEATURES.contains(&name));
        }
    }
}
