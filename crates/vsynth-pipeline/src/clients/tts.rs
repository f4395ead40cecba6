//! Google Cloud Text-to-Speech client.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{check_status, http_client, API_KEY_HEADER};
use crate::config::TtsConfig;
use crate::services::{ServiceError, ServiceResult, SpeechSynthesizer};

pub struct CloudTtsClient {
    config: TtsConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: Input<'a>,
    voice: Voice<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct Input<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Voice<'a> {
    language_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: Option<String>,
}

impl CloudTtsClient {
    pub fn new(config: TtsConfig) -> ServiceResult<Self> {
        let client = http_client(config.timeout)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl SpeechSynthesizer for CloudTtsClient {
    async fn synthesize(&self, text: &str) -> ServiceResult<Vec<u8>> {
        let request = SynthesizeRequest {
            input: Input { text },
            voice: Voice {
                language_code: &self.config.language_code,
                name: self.config.voice.as_deref(),
            },
            audio_config: AudioConfig { audio_encoding: "MP3" },
        };

        debug!(chars = text.len(), "Calling text-to-speech");
        let url = format!("{}/text:synthesize", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let body: SynthesizeResponse = check_status(response).await?.json().await?;
        let encoded = body
            .audio_content
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ServiceError::empty("no audioContent in response"))?;

        BASE64
            .decode(encoded.trim())
            .map_err(|e| ServiceError::decode(format!("invalid audioContent: {e}")))
    }
}
