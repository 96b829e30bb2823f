//! Reproducible synthetic market series with volatility regimes.
//!
//! Three regimes drive the log-return process: low volatility, high
//! volatility, and a crash window with negative drift. Rolling features and
//! a next-window realized-volatility target are engineered on top. The whole
//! series is a pure function of `DataConfig` (seeded RNG), so every pipeline
//! stage can regenerate the identical evaluation slice.

#![allow(missing_docs)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};

use crate::core::config::DataConfig;
use crate::core::errors::Result;
use crate::data::table::{EvaluationTable, feature_set};

/// Per-regime drift and volatility of the log-return process.
const LOW_VOL_SIGMA: f64 = 0.008;
const HIGH_VOL_SIGMA: f64 = 0.018;
const CRASH_SIGMA: f64 = 0.04;
const NORMAL_MU: f64 = 0.0003;
const CRASH_MU: f64 = -0.0015;

/// Generate the synthetic market series as an evaluation table.
pub fn make_synthetic_market(cfg: &DataConfig) -> Result<EvaluationTable> {
    let n = cfg.n_samples;
    let mut rng = StdRng::seed_from_u64(cfg.seed);

    let regimes = regime_schedule(n);
    let mut returns = Vec::with_capacity(n);
    for &regime in &regimes {
        let (mu, sigma) = match regime {
            2 => (CRASH_MU, CRASH_SIGMA),
            1 => (NORMAL_MU, HIGH_VOL_SIGMA),
            _ => (NORMAL_MU, LOW_VOL_SIGMA),
        };
        let z: f64 = StandardNormal.sample(&mut rng);
        returns.push(sigma.mul_add(z, mu));
    }

    let mut close = Vec::with_capacity(n);
    let mut cum = 0.0;
    for r in &returns {
        cum += r;
        close.push(100.0 * cum.exp());
    }

    // Log-return series anchored at zero for the first bar.
    let mut ret = vec![0.0];
    ret.extend(close.windows(2).map(|w| (w[1] / w[0]).ln()));

    let vol_10 = rolling_std(&ret, 10);
    let vol_30 = rolling_std(&ret, 30);
    let mom_5 = rolling_sum(&ret, 5);
    let mom_20 = rolling_sum(&ret, 20);
    let dd_60 = drawdown(&close, 60);
    let target = next_window_vol(&ret, 5);

    EvaluationTable::new(
        feature_set(),
        vec![vol_10, vol_30, mom_5, mom_20, dd_60],
        target,
    )
}

/// Regime label per bar: low vol, then high vol, then crash, then low again.
fn regime_schedule(n: usize) -> Vec<u8> {
    let high_start = (0.35 * n as f64) as usize;
    let crash_start = (0.70 * n as f64) as usize;
    let crash_end = (0.78 * n as f64) as usize;
    (0..n)
        .map(|i| {
            if (high_start..crash_start).contains(&i) {
                1
            } else if (crash_start..crash_end).contains(&i) {
                2
            } else {
                0
            }
        })
        .collect()
}

/// Trailing sample standard deviation; zero until the window is full.
fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window {
                return 0.0;
            }
            sample_std(&values[i + 1 - window..=i])
        })
        .collect()
}

fn sample_std(window: &[f64]) -> f64 {
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let var = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}

/// Trailing sum; zero until the window is full.
fn rolling_sum(values: &[f64], window: usize) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window {
                return 0.0;
            }
            values[i + 1 - window..=i].iter().sum()
        })
        .collect()
}

/// Drawdown from the trailing-window maximum; zero until the window is full.
fn drawdown(close: &[f64], window: usize) -> Vec<f64> {
    close
        .iter()
        .enumerate()
        .map(|(i, &price)| {
            if i + 1 < window {
                return 0.0;
            }
            let peak = close[i + 1 - window..=i]
                .iter()
                .fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
            price / peak - 1.0
        })
        .collect()
}

/// Next-window realized volatility: the target each row predicts.
///
/// Row `i` carries the vol of the window ending at `i + 1`; the final row
/// falls back to its own trailing window so the series stays dense.
fn next_window_vol(ret: &[f64], window: usize) -> Vec<f64> {
    let trailing = rolling_std(ret, window);
    let n = trailing.len();
    (0..n)
        .map(|i| {
            if i + 1 < n {
                trailing[i + 1]
            } else {
                trailing[i]
            }
        })
        .collect()
}
