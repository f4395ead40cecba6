//! External collaborator seams.
//!
//! Each service is injected as `Arc<dyn Trait>` at process start so tests
//! can substitute deterministic fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Classification of every external-call failure.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Service not configured: {0}")]
    NotConfigured(String),
}

impl ServiceError {
    pub fn empty(msg: impl Into<String>) -> Self {
        Self::EmptyResponse(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn not_configured(msg: impl Into<String>) -> Self {
        Self::NotConfigured(msg.into())
    }
}

/// The request URL is dropped so credentials never reach messages or logs.
impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_decode() {
            ServiceError::Decode(err.to_string())
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}

/// Fixed generation parameters for illustration images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGenerationParams {
    pub aspect_ratio: String,
    pub sample_count: u32,
    pub safety_setting: String,
    pub person_generation: String,
}

impl Default for ImageGenerationParams {
    fn default() -> Self {
        Self {
            aspect_ratio: "16:9".to_string(),
            sample_count: 1,
            safety_setting: "block_medium_and_above".to_string(),
            person_generation: "allow_adult".to_string(),
        }
    }
}

/// Text generation.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> ServiceResult<String>;
}

/// Image generation; returns raw encoded image buffers.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, params: &ImageGenerationParams) -> ServiceResult<Vec<Vec<u8>>>;
}

/// Text-to-speech; returns MP3 bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> ServiceResult<Vec<u8>>;
}

/// Durable storage for finished videos; returns a URL.
#[async_trait]
pub trait ArtifactUploader: Send + Sync {
    async fn upload(&self, path: &Path) -> ServiceResult<String>;

    /// Cheap reachability probe for readiness checks.
    async fn check(&self) -> ServiceResult<()> {
        Ok(())
    }
}
