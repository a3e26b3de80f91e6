//! Error types for finhero-client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientErrorCode {
    /// Local validation failed before any request was sent
    ValidationError,
    /// Backend rejected the credentials (401/403)
    Unauthorized,
    /// Backend answered with a non-success status
    ServerError,
    /// Request never completed (connection refused, DNS, timeout)
    TransportError,
}

impl std::fmt::Display for ClientErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ClientErrorCode::Unauthorized => write!(f, "UNAUTHORIZED"),
            ClientErrorCode::ServerError => write!(f, "SERVER_ERROR"),
            ClientErrorCode::TransportError => write!(f, "TRANSPORT_ERROR"),
        }
    }
}

/// Client error type
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{message}")]
    Validation { message: String },

    #[error("Invalid credentials or access denied")]
    Unauthorized,

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Network error: {message}")]
    Transport { message: String },
}

impl ClientError {
    /// Get the error code
    pub fn code(&self) -> ClientErrorCode {
        match self {
            ClientError::Validation { .. } => ClientErrorCode::ValidationError,
            ClientError::Unauthorized => ClientErrorCode::Unauthorized,
            ClientError::Server { .. } => ClientErrorCode::ServerError,
            ClientError::Transport { .. } => ClientErrorCode::TransportError,
        }
    }
}

/// Result type with ClientError
pub type ClientResult<T> = Result<T, ClientError>;
