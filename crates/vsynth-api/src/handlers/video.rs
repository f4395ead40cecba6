//! Narrated video synthesis handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

use vsynth_models::VideoOutput;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for `POST /api/visual/video`.
#[derive(Debug, Deserialize)]
pub struct VideoRequest {
    pub text: String,
    /// Defaults to the pipeline's configured upload mode
    #[serde(default)]
    pub upload: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VideoResponse {
    Ok {
        run_id: String,
        duration_secs: f64,
        unit_count: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        video_url: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        local_path: Option<PathBuf>,
    },
    Unavailable {
        message: String,
    },
}

/// Synthesize a narrated video from text.
///
/// Missing configuration or media binaries answer `200` with
/// `status: "unavailable"`; fatal pipeline errors map to error responses.
pub async fn create_video(
    State(state): State<AppState>,
    payload: Result<Json<VideoRequest>, JsonRejection>,
) -> ApiResult<Json<VideoResponse>> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let chars = request.text.chars().count();
    if chars > state.config.max_text_chars {
        return Err(ApiError::bad_request(format!(
            "text is {} characters, limit is {}",
            chars, state.config.max_text_chars
        )));
    }

    let Some(pipeline) = state.pipeline.as_ref() else {
        let message = state
            .unavailable_reason
            .clone()
            .unwrap_or_else(|| "video pipeline is not configured".to_string());
        return Ok(Json(VideoResponse::Unavailable { message }));
    };

    let upload = request.upload.unwrap_or(pipeline.config().upload);
    info!(chars, upload, "Video requested");

    let outcome = match pipeline.run(&request.text, upload).await {
        Ok(outcome) => outcome,
        Err(e) if e.is_unavailable() => {
            warn!("Video pipeline unavailable: {}", e);
            return Ok(Json(VideoResponse::Unavailable { message: e.to_string() }));
        }
        Err(e) => return Err(e.into()),
    };

    let (video_url, local_path) = match outcome.output {
        VideoOutput::Uploaded { url } => (Some(url), None),
        VideoOutput::LocalOnly { path } => (None, Some(path)),
    };

    Ok(Json(VideoResponse::Ok {
        run_id: outcome.run_id.to_string(),
        duration_secs: outcome.total_duration_secs,
        unit_count: outcome.unit_count,
        video_url,
        local_path,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shapes() {
        let ok = VideoResponse::Ok {
            run_id: "abc".to_string(),
            duration_secs: 3.5,
            unit_count: 2,
            video_url: Some("https://cdn.example.com/v.mp4".to_string()),
            local_path: None,
        };
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["video_url"], "https://cdn.example.com/v.mp4");
        assert!(json.get("local_path").is_none());

        let unavailable = VideoResponse::Unavailable {
            message: "ffmpeg not found".to_string(),
        };
        let json = serde_json::to_value(&unavailable).unwrap();
        assert_eq!(json["status"], "unavailable");
        assert_eq!(json["message"], "ffmpeg not found");
    }

    #[test]
    fn test_upload_is_optional() {
        let req: VideoRequest = serde_json::from_str(r#"{"text": "Hello."}"#).unwrap();
        assert_eq!(req.upload, None);
        assert_eq!(req.text, "Hello.");
    }
}
