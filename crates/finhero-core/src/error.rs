//! Error types for finhero-core

use finhero_client::ClientError;
use finhero_store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected before any other work happened
    ValidationError,
    /// Credentials rejected by the backend
    AuthenticationFailed,
    /// Operation requires a session and none is present
    Unauthenticated,
    /// Backend answered with an error
    BackendError,
    /// Request never reached the backend
    TransportError,
    /// Durable storage failed
    StorageError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::AuthenticationFailed => write!(f, "AUTHENTICATION_FAILED"),
            ErrorCode::Unauthenticated => write!(f, "UNAUTHENTICATED"),
            ErrorCode::BackendError => write!(f, "BACKEND_ERROR"),
            ErrorCode::TransportError => write!(f, "TRANSPORT_ERROR"),
            ErrorCode::StorageError => write!(f, "STORAGE_ERROR"),
        }
    }
}

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{message}")]
    Validation { message: String },

    #[error("Invalid credentials or access denied")]
    AuthenticationFailed,

    #[error("Not logged in; please log in again")]
    Unauthenticated,

    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Network error: {message}")]
    Transport { message: String },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Validation { .. } => ErrorCode::ValidationError,
            CoreError::AuthenticationFailed => ErrorCode::AuthenticationFailed,
            CoreError::Unauthenticated => ErrorCode::Unauthenticated,
            CoreError::Backend { .. } => ErrorCode::BackendError,
            CoreError::Transport { .. } => ErrorCode::TransportError,
            CoreError::Storage(_) => ErrorCode::StorageError,
        }
    }

    /// Whether the user can simply retry the triggering action
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoreError::Backend { .. } | CoreError::Transport { .. }
        )
    }
}

impl From<ClientError> for CoreError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Validation { message } => CoreError::Validation { message },
            ClientError::Unauthorized => CoreError::AuthenticationFailed,
            ClientError::Server { status, message } => CoreError::Backend { status, message },
            ClientError::Transport { message } => CoreError::Transport { message },
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;
