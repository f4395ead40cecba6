//! Pipeline error types.
//!
//! Every external failure is reclassified into one of these variants at the
//! stage boundary. Raw transport and parsing errors never cross into the
//! controller.

use thiserror::Error;
use vsynth_media::MediaError;
use vsynth_models::TransitionError;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No content to narrate")]
    NoContent,

    #[error("Prompt alignment failed: expected {expected} prompts, received {received} after {attempts} attempts")]
    Alignment {
        expected: usize,
        received: usize,
        attempts: u32,
    },

    #[error("Prompt generation failed after {attempts} attempts: {reason}")]
    PromptGeneration { attempts: u32, reason: String },

    #[error("No images could be generated for unit {unit_index}")]
    NoImages { unit_index: usize },

    #[error("Composition failed for unit {unit_index}: {message}")]
    Composition { unit_index: usize, message: String },

    #[error("Narration failed for unit {unit_index}: {message}")]
    Narration { unit_index: usize, message: String },

    #[error("Caption rendering failed for unit {unit_index}: {message}")]
    Captions { unit_index: usize, message: String },

    #[error("Video assembly failed: {0}")]
    Assembly(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Pipeline unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn narration(unit_index: usize, msg: impl Into<String>) -> Self {
        Self::Narration {
            unit_index,
            message: msg.into(),
        }
    }

    pub fn captions(unit_index: usize, msg: impl Into<String>) -> Self {
        Self::Captions {
            unit_index,
            message: msg.into(),
        }
    }

    pub fn composition(unit_index: usize, msg: impl Into<String>) -> Self {
        Self::Composition {
            unit_index,
            message: msg.into(),
        }
    }

    /// Reclassify a media failure; missing binaries become `Unavailable`.
    pub fn from_media(err: MediaError, classify: impl FnOnce(String) -> PipelineError) -> Self {
        if err.is_missing_dependency() {
            Self::Unavailable(err.to_string())
        } else {
            classify(err.to_string())
        }
    }

    /// Pipeline component that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::NoContent => "segmenter",
            PipelineError::Alignment { .. } | PipelineError::PromptGeneration { .. } => "prompt_aligner",
            PipelineError::NoImages { .. } | PipelineError::Composition { .. } => "clip_composer",
            PipelineError::Narration { .. } => "narrator",
            PipelineError::Captions { .. } => "caption_renderer",
            PipelineError::Assembly(_) => "video_assembler",
            PipelineError::Upload(_) => "upload",
            PipelineError::Unavailable(_)
            | PipelineError::InvalidTransition(_)
            | PipelineError::Io(_) => "controller",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::NoContent => "no_content",
            PipelineError::Alignment { .. } => "alignment_error",
            PipelineError::PromptGeneration { .. } => "prompt_generation_failed",
            PipelineError::NoImages { .. } => "no_images",
            PipelineError::Composition { .. } => "composition_failed",
            PipelineError::Narration { .. } => "narration_failed",
            PipelineError::Captions { .. } => "caption_failed",
            PipelineError::Assembly(_) => "assembly_failed",
            PipelineError::Upload(_) => "upload_failed",
            PipelineError::Unavailable(_) => "unavailable",
            PipelineError::InvalidTransition(_) => "invalid_transition",
            PipelineError::Io(_) => "io_error",
        }
    }

    /// Deployment dependencies are missing; the caller gets a degraded
    /// response rather than a hard error.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, PipelineError::Unavailable(_))
    }
}
