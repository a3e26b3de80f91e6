//! Error types for finhero-store

use std::path::Path;
use thiserror::Error;

/// Session store error type
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error at {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to serialize user record: {reason}")]
    Serialize { reason: String },

    #[error("Corrupt session record at {path}: {reason}")]
    Corrupt { path: String, reason: String },
}

impl StoreError {
    pub(crate) fn io(path: &Path, error: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_string_lossy().to_string(),
            reason: error.to_string(),
        }
    }
}

/// Result type with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
