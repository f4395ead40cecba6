//! Imagen image generation client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{check_status, http_client, API_KEY_HEADER};
use crate::config::GeminiConfig;
use crate::responses::decode_image_response;
use crate::services::{ImageGenerationParams, ImageGenerator, ServiceError, ServiceResult};

pub struct ImagenClient {
    config: GeminiConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: Vec<Instance<'a>>,
    parameters: Parameters<'a>,
}

#[derive(Debug, Serialize)]
struct Instance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters<'a> {
    sample_count: u32,
    aspect_ratio: &'a str,
    safety_setting: &'a str,
    person_generation: &'a str,
}

impl ImagenClient {
    pub fn new(config: GeminiConfig) -> ServiceResult<Self> {
        let client = http_client(config.timeout)?;
        Ok(Self { config, client })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:predict",
            self.config.base_url.trim_end_matches('/'),
            self.config.image_model
        )
    }
}

#[async_trait]
impl ImageGenerator for ImagenClient {
    async fn generate(&self, prompt: &str, params: &ImageGenerationParams) -> ServiceResult<Vec<Vec<u8>>> {
        let request = PredictRequest {
            instances: vec![Instance { prompt }],
            parameters: Parameters {
                sample_count: params.sample_count,
                aspect_ratio: &params.aspect_ratio,
                safety_setting: &params.safety_setting,
                person_generation: &params.person_generation,
            },
        };

        debug!(model = %self.config.image_model, "Calling Imagen");
        let response = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let body: Value = check_status(response).await?.json().await?;
        let images = decode_image_response(&body).map_err(|e| ServiceError::decode(e.to_string()))?;
        if images.is_empty() {
            return Err(ServiceError::empty("no images in response (likely filtered)"));
        }
        Ok(images)
    }
}
