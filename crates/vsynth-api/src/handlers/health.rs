//! Health check handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use std::time::Instant;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    pub pipeline: CheckStatus,
    pub media: CheckStatus,
    pub uploads: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl CheckStatus {
    fn ok(latency_ms: Option<u64>) -> Self {
        Self {
            status: "ok".to_string(),
            error: None,
            latency_ms,
        }
    }

    fn error(msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: Some(msg.into()),
            latency_ms: None,
        }
    }

    fn disabled() -> Self {
        Self {
            status: "disabled".to_string(),
            error: None,
            latency_ms: None,
        }
    }
}

/// Readiness check endpoint (readiness probe).
/// Checks that the pipeline is configured and ffmpeg/ffprobe are installed.
/// Storage status is reported but does not affect readiness.
pub async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let (pipeline_check, media_check, uploads_check) = match &state.pipeline {
        Some(pipeline) => {
            let start = Instant::now();
            let media = match pipeline.check_ready().await {
                Ok(()) => CheckStatus::ok(Some(start.elapsed().as_millis() as u64)),
                Err(e) => CheckStatus::error(e.to_string()),
            };
            let start = Instant::now();
            let uploads = match pipeline.check_uploads().await {
                Some(Ok(())) => CheckStatus::ok(Some(start.elapsed().as_millis() as u64)),
                Some(Err(e)) => CheckStatus::error(e.to_string()),
                None => CheckStatus::disabled(),
            };
            (CheckStatus::ok(None), media, uploads)
        }
        None => {
            let reason = state
                .unavailable_reason
                .clone()
                .unwrap_or_else(|| "pipeline not configured".to_string());
            (
                CheckStatus::error(reason),
                CheckStatus::error("pipeline not configured"),
                CheckStatus::disabled(),
            )
        }
    };

    let all_ok = pipeline_check.status == "ok" && media_check.status == "ok";

    let response = ReadinessResponse {
        status: if all_ok { "ready" } else { "degraded" }.to_string(),
        checks: ReadinessChecks {
            pipeline: pipeline_check,
            media: media_check,
            uploads: uploads_check,
        },
    };

    if all_ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
