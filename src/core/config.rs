//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{GovError, Result};

/// Full pipeline configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub registry: RegistryConfig,
    pub data: DataConfig,
    pub training: TrainingConfig,
    pub stress: StressConfig,
    pub risk: RiskConfig,
}

/// Artifact registry location and audit log path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RegistryConfig {
    pub root_dir: PathBuf,
    pub audit_log: PathBuf,
}

/// Synthetic evaluation series parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub n_samples: usize,
    pub seed: u64,
    pub train_frac: f64,
}

/// Ridge regressor fitting knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrainingConfig {
    pub ridge_lambda: f64,
}

/// Stress scenario parameters.
///
/// Noise injection is always explicitly seeded so governance re-runs are
/// reproducible byte-for-byte.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StressConfig {
    pub noise_scale: f64,
    pub noise_seed: u64,
    pub vol_multiplier: f64,
}

/// Risk rule thresholds.
///
/// Defaults are the fixed governance rule set; overriding them changes the
/// gate, not the scoring mechanics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskConfig {
    pub noise_degradation_max: f64,
    pub volatility_degradation_max: f64,
    pub r2_floor: f64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!("[MGOV-CONFIG] WARNING: HOME not set, falling back to /tmp for registry");
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        let data = home_dir.join(".local").join("share").join("mgov");
        Self {
            root_dir: data.join("registry"),
            audit_log: data.join("audit.jsonl"),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            n_samples: 2_500,
            seed: 7,
            train_frac: 0.7,
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self { ridge_lambda: 1e-4 }
    }
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            noise_scale: 0.01,
            noise_seed: 42,
            vol_multiplier: 2.5,
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            noise_degradation_max: 1.3,
            volatility_degradation_max: 2.0,
            r2_floor: 0.3,
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        let home_dir = env::var_os("HOME").map_or_else(|| PathBuf::from("/tmp"), PathBuf::from);
        home_dir.join(".config").join("mgov").join("config.toml")
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from the default
    /// path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| GovError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(GovError::InvalidConfig {
                details: format!("missing configuration file: {}", path_buf.display()),
            });
        } else {
            Self::default()
        };

        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(raw) = env::var_os("MGOV_REGISTRY_DIR") {
            self.registry.root_dir = PathBuf::from(raw);
        }
        if let Some(raw) = env::var_os("MGOV_AUDIT_LOG") {
            self.registry.audit_log = PathBuf::from(raw);
        }

        set_env_usize("MGOV_DATA_N_SAMPLES", &mut self.data.n_samples)?;
        set_env_u64("MGOV_DATA_SEED", &mut self.data.seed)?;
        set_env_f64("MGOV_DATA_TRAIN_FRAC", &mut self.data.train_frac)?;

        set_env_f64("MGOV_TRAINING_RIDGE_LAMBDA", &mut self.training.ridge_lambda)?;

        set_env_f64("MGOV_STRESS_NOISE_SCALE", &mut self.stress.noise_scale)?;
        set_env_u64("MGOV_STRESS_NOISE_SEED", &mut self.stress.noise_seed)?;
        set_env_f64("MGOV_STRESS_VOL_MULTIPLIER", &mut self.stress.vol_multiplier)?;

        set_env_f64(
            "MGOV_RISK_NOISE_DEGRADATION_MAX",
            &mut self.risk.noise_degradation_max,
        )?;
        set_env_f64(
            "MGOV_RISK_VOLATILITY_DEGRADATION_MAX",
            &mut self.risk.volatility_degradation_max,
        )?;
        set_env_f64("MGOV_RISK_R2_FLOOR", &mut self.risk.r2_floor)?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(0.0 < self.data.train_frac && self.data.train_frac < 1.0) {
            return Err(GovError::InvalidConfig {
                details: format!(
                    "data.train_frac must be in (0, 1), got {}",
                    self.data.train_frac
                ),
            });
        }
        // Rolling features need a 60-bar warmup on both sides of the split.
        if self.data.n_samples < 200 {
            return Err(GovError::InvalidConfig {
                details: format!("data.n_samples must be >= 200, got {}", self.data.n_samples),
            });
        }
        if self.training.ridge_lambda < 0.0 {
            return Err(GovError::InvalidConfig {
                details: format!(
                    "training.ridge_lambda must be >= 0, got {}",
                    self.training.ridge_lambda
                ),
            });
        }
        if self.stress.noise_scale < 0.0 {
            return Err(GovError::InvalidConfig {
                details: format!(
                    "stress.noise_scale must be >= 0, got {}",
                    self.stress.noise_scale
                ),
            });
        }
        if self.stress.vol_multiplier < 0.0 {
            return Err(GovError::InvalidConfig {
                details: format!(
                    "stress.vol_multiplier must be >= 0, got {}",
                    self.stress.vol_multiplier
                ),
            });
        }
        for (name, val) in [
            ("noise_degradation_max", self.risk.noise_degradation_max),
            (
                "volatility_degradation_max",
                self.risk.volatility_degradation_max,
            ),
        ] {
            if val <= 0.0 {
                return Err(GovError::InvalidConfig {
                    details: format!("risk.{name} must be > 0, got {val}"),
                });
            }
        }
        Ok(())
    }
}

fn set_env_f64(name: &str, slot: &mut f64) -> Result<()> {
    if let Ok(raw) = env::var(name) {
        *slot = raw.parse().map_err(|_| GovError::InvalidConfig {
            details: format!("{name} must be a float, got '{raw}'"),
        })?;
    }
    Ok(())
}

fn set_env_u64(name: &str, slot: &mut u64) -> Result<()> {
    if let Ok(raw) = env::var(name) {
        *slot = raw.parse().map_err(|_| GovError::InvalidConfig {
            details: format!("{name} must be an unsigned integer, got '{raw}'"),
        })?;
    }
    Ok(())
}

fn set_env_usize(name: &str, slot: &mut usize) -> Result<()> {
    if let Ok(raw) = env::var(name) {
        *slot = raw.parse().map_err(|_| GovError::InvalidConfig {
            details: format!("{name} must be an unsigned integer, got '{raw}'"),
        })?;
    }
    Ok(())
}
