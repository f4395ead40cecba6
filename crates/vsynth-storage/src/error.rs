//! Storage error types.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// R2 failures, split by the operation that failed.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("R2 not configured: {0}")]
    ConfigError(String),

    #[error("R2 upload failed: {0}")]
    UploadFailed(String),

    #[error("Could not presign R2 URL: {0}")]
    PresignFailed(String),

    #[error("R2 request failed: {0}")]
    AwsSdk(String),
}

impl StorageError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }

    /// Missing configuration rather than a failed request.
    pub fn is_config(&self) -> bool {
        matches!(self, StorageError::ConfigError(_))
    }
}
