//! Error types for washline.

use thiserror::Error;

/// Result type alias using washline's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for washline operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Upstream rejected the credentials (401/403)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The notification stream or a task driving it is gone
    #[error("Stream closed: {0}")]
    StreamClosed(String),

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
