//! Credential storage errors.

use std::path::PathBuf;
use stockroom_types::ErrorCode;
use thiserror::Error;

/// Errors from a [`CredentialStore`](super::CredentialStore).
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored file is not valid credentials JSON.
    #[error("corrupt credentials file: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage directory creation failed.
    #[error("failed to create credentials directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub fn directory_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreation {
            path: path.into(),
            source,
        }
    }
}

impl ErrorCode for StorageError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "STORAGE_IO",
            Self::Serialization(_) => "STORAGE_CORRUPT",
            Self::DirectoryCreation { .. } => "STORAGE_CREATE_DIR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
