//! HTTP and storage implementations of the service seams.

mod gemini;
mod imagen;
mod tts;
mod upload;

pub use gemini::GeminiClient;
pub use imagen::ImagenClient;
pub use tts::CloudTtsClient;
pub use upload::R2Uploader;

use reqwest::{Client, Response};
use std::time::Duration;

use crate::services::{ServiceError, ServiceResult};

/// Google APIs accept the key as a header, which keeps it out of URLs.
const API_KEY_HEADER: &str = "x-goog-api-key";

fn http_client(timeout: Duration) -> ServiceResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ServiceError::not_configured(format!("failed to build HTTP client: {e}")))
}

/// Turn a non-2xx response into `ServiceError::Status`, keeping the body.
async fn check_status(response: Response) -> ServiceResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ServiceError::Status {
        status: status.as_u16(),
        body,
    })
}
