//! Artifact upload to Cloudflare R2.

use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use uuid::Uuid;

use vsynth_storage::{video_key, R2Client, StorageError};

use crate::services::{ArtifactUploader, ServiceError, ServiceResult};

/// Uploads finished videos under `{prefix}/{yyyy}/{mm}/{uuid}.mp4`.
pub struct R2Uploader {
    client: R2Client,
}

impl R2Uploader {
    pub fn new(client: R2Client) -> Self {
        Self { client }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        if err.is_config() {
            ServiceError::NotConfigured(err.to_string())
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl ArtifactUploader for R2Uploader {
    async fn upload(&self, path: &Path) -> ServiceResult<String> {
        let key = video_key(self.client.key_prefix(), Utc::now(), Uuid::new_v4());
        self.client.upload_file(path, &key, "video/mp4").await?;
        Ok(self.client.object_url(&key).await?)
    }

    async fn check(&self) -> ServiceResult<()> {
        Ok(self.client.check_connectivity().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_mapping() {
        let err: ServiceError = StorageError::config_error("R2_BUCKET_NAME not set").into();
        assert!(matches!(err, ServiceError::NotConfigured(_)));

        let err: ServiceError = StorageError::upload_failed("connection reset").into();
        assert!(matches!(err, ServiceError::Transport(ref m) if m.contains("connection reset")));
    }
}
