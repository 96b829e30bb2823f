//! Pure perturbation transforms applied to evaluation features.
//!
//! Both transforms return a new table with identical shape: same rows, same
//! columns, same order. Only feature cell values change; the target column
//! always passes through untouched. The noise transform takes an explicit
//! seed — there is deliberately no unseeded variant, because governance
//! re-runs must be reproducible.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};

use crate::core::errors::{GovError, Result};
use crate::data::table::{EvaluationTable, VOLATILITY_FEATURES};

/// Add independent zero-mean Gaussian noise of std-dev `scale` to every
/// cell of every declared feature column.
///
/// Columns receive independently drawn noise, not one draw broadcast across
/// the row. `scale == 0` short-circuits to an exact copy so the identity
/// property holds bit-for-bit.
pub fn noise_injection(table: &EvaluationTable, scale: f64, seed: u64) -> Result<EvaluationTable> {
    if scale < 0.0 || !scale.is_finite() {
        return Err(GovError::InvalidScenario {
            scenario: "noise",
            details: format!("scale must be finite and >= 0, got {scale}"),
        });
    }
    let mut stressed = table.clone();
    if scale == 0.0 {
        return Ok(stressed);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let names: Vec<String> = table.feature_names().to_vec();
    for name in &names {
        // The clone declares exactly the same columns as the input.
        let Some(column) = stressed.column_mut(name) else {
            continue;
        };
        for cell in column {
            let z: f64 = StandardNormal.sample(&mut rng);
            *cell += scale * z;
        }
    }
    Ok(stressed)
}

/// Multiply the realized-volatility feature columns by `multiplier`.
///
/// All other columns pass through unchanged. `multiplier == 1` is an exact
/// identity.
pub fn volatility_regime(table: &EvaluationTable, multiplier: f64) -> Result<EvaluationTable> {
    if multiplier < 0.0 || !multiplier.is_finite() {
        return Err(GovError::InvalidScenario {
            scenario: "vol_spike",
            details: format!("multiplier must be finite and >= 0, got {multiplier}"),
        });
    }
    let mut stressed = table.clone();
    if multiplier == 1.0 {
        return Ok(stressed);
    }

    for name in VOLATILITY_FEATURES {
        let column = stressed
            .column_mut(name)
            .ok_or_else(|| GovError::FeatureMismatch {
                feature: name.to_string(),
            })?;
        for cell in column {
            *cell *= multiplier;
        }
    }
    Ok(stressed)
}
