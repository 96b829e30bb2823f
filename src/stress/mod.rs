//! Stress testing: scenario perturbations and the harness that measures
//! degradation against a fitted model.

pub mod harness;
pub mod perturb;

pub use harness::{Scenario, StressHarness, StressResults};
