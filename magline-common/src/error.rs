//! Common error types for magline

use thiserror::Error;

/// Common result type for magline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the magline services
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Predictor boundary error (transport or endpoint-reported)
    #[error("Predictor error: {0}")]
    Predictor(String),

    /// Prediction count does not match the to-predict row count.
    /// Positional alignment is the only correspondence between a prediction
    /// and its station, so this is fatal for the job.
    #[error("Prediction row count mismatch: expected {expected}, got {actual}")]
    RowCountMismatch { expected: usize, actual: usize },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
