//! Server error types

use thiserror::Error;

/// Result type for server operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors that stop the server loop
#[derive(Debug, Error)]
pub enum ServerError {
    /// Reading the request stream failed
    #[error("Failed to read request: {0}")]
    Read(#[source] std::io::Error),

    /// Writing a response failed
    #[error("Failed to write response: {0}")]
    Write(#[source] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
