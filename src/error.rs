//! Error types for the fincast library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur during forecasting, validation, and registry operations.
///
/// Statistical edge cases (too little history for a metric, zero-valued
/// actuals for MAPE) are absorbed as `None` return values by the functions
/// that hit them; only structural misconfiguration and genuine I/O failures
/// surface through this enum.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter or configuration value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error (parse failure, non-chronological order).
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Computation error (numerical issues inside a method).
    #[error("computation error: {0}")]
    ComputationError(String),

    /// Registry I/O failure.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Registry (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
