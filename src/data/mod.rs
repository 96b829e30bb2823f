//! Evaluation data: feature schema, column-major table, synthetic market series.

pub mod synthetic;
pub mod table;
