//! Pipeline and service client configuration.

use std::path::PathBuf;
use std::time::Duration;

use vsynth_models::RenderSettings;

use crate::services::{ImageGenerationParams, ServiceError, ServiceResult};

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off"),
        Err(_) => default,
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Scratch directory for transient files
    pub work_dir: PathBuf,
    /// Upload finished videos by default
    pub upload: bool,
    /// Units whose assets are produced concurrently
    pub unit_parallelism: usize,
    /// Total prompt alignment attempts
    pub prompt_attempts: u32,
    /// Base delay between alignment attempts
    pub prompt_retry_delay: Duration,
    /// Shortest summary accepted, in characters
    pub summary_min_chars: usize,
    /// Condense input before segmenting
    pub summarize: bool,
    pub image_params: ImageGenerationParams,
    pub render: RenderSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: std::env::temp_dir().join("vsynth"),
            upload: true,
            unit_parallelism: 1,
            prompt_attempts: 3,
            prompt_retry_delay: Duration::ZERO,
            summary_min_chars: 20,
            summarize: true,
            image_params: ImageGenerationParams::default(),
            render: RenderSettings::default(),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            work_dir: env_nonempty("VSYNTH_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            upload: env_flag("VSYNTH_UPLOAD", defaults.upload),
            unit_parallelism: env_or("VSYNTH_UNIT_PARALLELISM", defaults.unit_parallelism).max(1),
            prompt_attempts: env_or("VSYNTH_PROMPT_ATTEMPTS", defaults.prompt_attempts).max(1),
            prompt_retry_delay: Duration::from_millis(env_or("VSYNTH_PROMPT_RETRY_DELAY_MS", 0)),
            summary_min_chars: env_or("VSYNTH_SUMMARY_MIN_CHARS", defaults.summary_min_chars),
            summarize: env_flag("VSYNTH_SUMMARIZE", defaults.summarize),
            image_params: defaults.image_params,
            render: defaults.render,
        }
    }

    /// Use a specific scratch directory.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }
}

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TTS_BASE_URL: &str = "https://texttospeech.googleapis.com/v1";

/// Gemini text and Imagen image configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            image_model: "imagen-3.0-generate-002".to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> ServiceResult<Self> {
        let api_key = env_nonempty("GEMINI_API_KEY")
            .ok_or_else(|| ServiceError::not_configured("GEMINI_API_KEY not set"))?;
        let defaults = Self::new(api_key);
        Ok(Self {
            base_url: env_nonempty("GEMINI_BASE_URL").unwrap_or(defaults.base_url.clone()),
            text_model: env_nonempty("GEMINI_TEXT_MODEL").unwrap_or(defaults.text_model.clone()),
            image_model: env_nonempty("GEMINI_IMAGE_MODEL").unwrap_or(defaults.image_model.clone()),
            timeout: Duration::from_secs(env_or("GEMINI_TIMEOUT_SECS", 120)),
            ..defaults
        })
    }
}

/// Google Cloud Text-to-Speech configuration.
#[derive(Debug, Clone)]
pub struct TtsConfig {
    pub api_key: String,
    pub base_url: String,
    pub language_code: String,
    /// Voice name; the service picks one for the language when unset
    pub voice: Option<String>,
    pub timeout: Duration,
}

impl TtsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_TTS_BASE_URL.to_string(),
            language_code: "en-US".to_string(),
            voice: None,
            timeout: Duration::from_secs(60),
        }
    }

    /// Create config from environment variables, falling back to the Gemini key.
    pub fn from_env() -> ServiceResult<Self> {
        let api_key = env_nonempty("TTS_API_KEY")
            .or_else(|| env_nonempty("GEMINI_API_KEY"))
            .ok_or_else(|| ServiceError::not_configured("TTS_API_KEY not set"))?;
        let defaults = Self::new(api_key);
        Ok(Self {
            base_url: env_nonempty("TTS_BASE_URL").unwrap_or(defaults.base_url.clone()),
            language_code: env_nonempty("TTS_LANGUAGE_CODE").unwrap_or(defaults.language_code.clone()),
            voice: env_nonempty("TTS_VOICE"),
            timeout: Duration::from_secs(env_or("TTS_TIMEOUT_SECS", 60)),
            ..defaults
        })
    }
}
