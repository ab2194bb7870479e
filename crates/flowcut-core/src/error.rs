//! Error types for Flowcut.

use thiserror::Error;

/// Main error type for Flowcut operations.
#[derive(Error, Debug)]
pub enum FlowcutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timeline error: {0}")]
    Timeline(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Flowcut operations.
pub type Result<T> = std::result::Result<T, FlowcutError>;
