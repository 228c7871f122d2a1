//! Error types for gridplace

use thiserror::Error;

/// Main error type for gridplace operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Please select at least {required} points (have {actual})")]
    InsufficientPoints { required: usize, actual: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("An optimization is already in progress")]
    CalculationInProgress,

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for gridplace operations
pub type Result<T> = std::result::Result<T, Error>;
