//! Application state.

use std::sync::Arc;
use tracing::warn;

use vsynth_pipeline::{Pipeline, PipelineConfig, PipelineServices};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    /// `None` when the pipeline's services are not configured
    pub pipeline: Option<Arc<Pipeline>>,
    /// Why the pipeline is missing
    pub unavailable_reason: Option<String>,
}

impl AppState {
    /// Create application state, degrading to "unavailable" when the
    /// pipeline's services cannot be configured.
    pub async fn new(config: ApiConfig) -> Self {
        let pipeline_config = PipelineConfig::from_env();
        match PipelineServices::from_env(&pipeline_config).await {
            Ok(services) => Self::with_pipeline(config, Pipeline::new(pipeline_config, services)),
            Err(e) => {
                warn!("Video pipeline unavailable: {}", e);
                Self::unavailable(config, e.to_string())
            }
        }
    }

    pub fn with_pipeline(config: ApiConfig, pipeline: Pipeline) -> Self {
        Self {
            config,
            pipeline: Some(Arc::new(pipeline)),
            unavailable_reason: None,
        }
    }

    pub fn unavailable(config: ApiConfig, reason: impl Into<String>) -> Self {
        Self {
            config,
            pipeline: None,
            unavailable_reason: Some(reason.into()),
        }
    }
}
