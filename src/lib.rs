#![forbid(unsafe_code)]

//! Model governance pipeline (mgov) — decides whether a trained predictive
//! model is safe to deploy.
//!
//! Four stages run strictly forward, each persisting a named artifact:
//! 1. **Train** — fit the predictor, register `model` + `metrics`
//! 2. **Stress** — perturb the evaluation slice, measure MAE degradation
//! 3. **Score** — flat additive risk rules → APPROVE / APPROVE WITH CAUTION / REJECT
//! 4. **Report** — render the governance model card
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use model_gov::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use model_gov::core::config::Config;
//! use model_gov::pipeline::Pipeline;
//! ```

pub mod prelude;

pub mod core;
pub mod data;
pub mod logger;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod risk;
pub mod stress;
