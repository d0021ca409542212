//! Error types for InsightFlow.

use thiserror::Error;

/// Result type alias using InsightFlow's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for InsightFlow operations.
#[derive(Error, Debug)]
pub enum Error {
    /// OCR service call failed
    #[error("OCR error: {0}")]
    Ocr(String),

    /// Reasoner/generation failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// Content extraction failed inside a strategy
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input exceeds a size limit
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
