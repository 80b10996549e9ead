//! Error types for the sales_forecast crate

use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to transaction data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// A feature the model was trained on is absent from the feature table
    #[error("Missing feature column: {0}")]
    MissingFeatureColumn(String),

    /// Not enough observed months before the target to fill the lag block
    #[error(
        "Insufficient history for {target}: {required} lag months required, {available} observed"
    )]
    InsufficientHistory {
        target: String,
        required: usize,
        available: usize,
    },

    /// Error from an invalid model artifact or model invocation
    #[error("Model error: {0}")]
    ModelError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from reading or writing CSV
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from decoding JSON artifacts
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error from parsing dates
    #[error("Parse error: {0}")]
    ParseError(#[from] chrono::ParseError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
