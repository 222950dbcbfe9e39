//! Error types for the biomarker engine
//!
//! Only truly invalid inputs are errors. Data-quality conditions such as
//! missing samples, short windows, or zero variance surface as `Option`/flag
//! fields in the verdicts, never as failures.

use thiserror::Error;

/// Errors that can occur during analysis
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Negative duration for {field}: {value}")]
    NegativeDuration { field: &'static str, value: f64 },

    #[error("Malformed window: {0}")]
    MalformedWindow(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
