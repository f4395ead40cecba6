//! R2 client implementation.

use std::path::Path;
use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};

/// Default lifetime of presigned GET URLs (7 days, the S3 maximum).
pub const DEFAULT_PRESIGN_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;

/// Configuration for R2 client.
#[derive(Debug, Clone)]
pub struct R2Config {
    /// R2 endpoint URL (S3 API endpoint)
    pub endpoint_url: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Bucket name
    pub bucket_name: String,
    /// Region (usually "auto" for R2)
    pub region: String,
    /// Public base URL for the bucket; presigned URLs are used when unset
    pub public_url: Option<String>,
    /// Presigned URL lifetime
    pub presign_expiry: Duration,
    /// Prefix for uploaded video keys
    pub key_prefix: String,
}

impl R2Config {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self {
            endpoint_url: required("R2_ENDPOINT_URL")?,
            access_key_id: required("R2_ACCESS_KEY_ID")?,
            secret_access_key: required("R2_SECRET_ACCESS_KEY")?,
            bucket_name: required("R2_BUCKET_NAME")?,
            region: std::env::var("R2_REGION").unwrap_or_else(|_| "auto".to_string()),
            public_url: std::env::var("R2_PUBLIC_URL")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            presign_expiry: Duration::from_secs(
                std::env::var("R2_PRESIGN_EXPIRY_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_PRESIGN_EXPIRY_SECS),
            ),
            key_prefix: std::env::var("R2_KEY_PREFIX").unwrap_or_else(|_| "videos".to_string()),
        })
    }
}

fn required(name: &str) -> StorageResult<String> {
    std::env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| StorageError::config_error(format!("{name} not set")))
}

/// Join a public bucket URL and an object key.
pub fn public_object_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.trim_start_matches('/'))
}

/// Cloudflare R2 storage client.
#[derive(Clone)]
pub struct R2Client {
    client: Client,
    bucket: String,
    public_url: Option<String>,
    presign_expiry: Duration,
    key_prefix: String,
}

impl R2Client {
    /// Create a new R2 client from configuration.
    pub async fn new(config: R2Config) -> StorageResult<Self> {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "r2",
        );

        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint_url)
            .region(Region::new(config.region))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(sdk_config),
            bucket: config.bucket_name,
            public_url: config.public_url,
            presign_expiry: config.presign_expiry,
            key_prefix: config.key_prefix,
        })
    }

    /// Create from environment variables.
    pub async fn from_env() -> StorageResult<Self> {
        let config = R2Config::from_env()?;
        Self::new(config).await
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// Upload a file to R2.
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        key: &str,
        content_type: &str,
    ) -> StorageResult<()> {
        let path = path.as_ref();
        debug!("Uploading {} to {}", path.display(), key);

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        info!("Uploaded {} to {}", path.display(), key);
        Ok(())
    }

    /// Generate a presigned URL for GET (temporary, signed URL via S3 API).
    pub async fn presign_get(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let presign_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }

    /// Durable URL for an uploaded object: the public URL when configured,
    /// otherwise a presigned GET URL.
    pub async fn object_url(&self, key: &str) -> StorageResult<String> {
        match &self.public_url {
            Some(base) => Ok(public_object_url(base, key)),
            None => self.presign_get(key, self.presign_expiry).await,
        }
    }

    /// Check connectivity to R2 by performing a head bucket operation.
    pub async fn check_connectivity(&self) -> StorageResult<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| StorageError::AwsSdk(format!("connectivity check: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_object_url() {
        assert_eq!(
            public_object_url("https://cdn.example.com/", "/videos/2025/01/a.mp4"),
            "https://cdn.example.com/videos/2025/01/a.mp4"
        );
        assert_eq!(
            public_object_url("https://cdn.example.com", "videos/a.mp4"),
            "https://cdn.example.com/videos/a.mp4"
        );
    }

    #[test]
    fn test_missing_required_var() {
        let err = required("VSYNTH_TEST_UNSET_R2_VARIABLE").unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("VSYNTH_TEST_UNSET_R2_VARIABLE"));
    }

    #[tokio::test]
    async fn test_object_url_prefers_public_base() {
        let client = R2Client::new(R2Config {
            endpoint_url: "http://127.0.0.1:9".to_string(),
            access_key_id: "key".to_string(),
            secret_access_key: "secret".to_string(),
            bucket_name: "bucket".to_string(),
            region: "auto".to_string(),
            public_url: Some("https://videos.example.com".to_string()),
            presign_expiry: Duration::from_secs(60),
            key_prefix: "videos".to_string(),
        })
        .await
        .unwrap();

        let url = client.object_url("videos/2025/01/x.mp4").await.unwrap();
        assert_eq!(url, "https://videos.example.com/videos/2025/01/x.mp4");
    }

    #[tokio::test]
    async fn test_object_url_presigns_without_public_base() {
        let client = R2Client::new(R2Config {
            endpoint_url: "http://127.0.0.1:9".to_string(),
            access_key_id: "key".to_string(),
            secret_access_key: "secret".to_string(),
            bucket_name: "bucket".to_string(),
            region: "auto".to_string(),
            public_url: None,
            presign_expiry: Duration::from_secs(60),
            key_prefix: "videos".to_string(),
        })
        .await
        .unwrap();

        let url = client.object_url("videos/x.mp4").await.unwrap();
        assert!(url.starts_with("http://127.0.0.1:9/bucket/videos/x.mp4?"));
        assert!(url.contains("X-Amz-Signature"));
    }
}
