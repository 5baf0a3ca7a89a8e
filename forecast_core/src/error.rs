//! Error types for the forecast_core crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors surfaced by the evaluation pipeline.
///
/// Every failure is terminal for the call that raised it; no partial
/// output is ever returned.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The input table lacks a usable date or price column.
    #[error("schema error: {0}")]
    Schema(String),

    /// No valid rows survived normalization.
    #[error("no valid price rows found in input")]
    EmptyData,

    /// The series is too short to hold out a test window.
    #[error("not enough data points: need at least {min}, got {len}")]
    InsufficientData { min: usize, len: usize },

    /// A requested method name is not in the registry.
    #[error("unknown method '{0}', expected one of: naive, moving_average, ewm")]
    UnknownMethod(String),

    /// Error from IO operations (CSV loading)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from polars operations (CSV parsing, column access)
    #[error("data error: {0}")]
    Polars(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::Polars(err.to_string())
    }
}
