//! Shared data models for the VSynth backend.
//!
//! This crate provides Serde-serializable types for:
//! - Pipeline runs and their state machine
//! - Narration units and every per-unit artifact
//! - Transient resource handles
//! - Time slicing of a unit's duration window
//! - Rendering constants shared by the media and pipeline crates

pub mod encoding;
pub mod output;
pub mod resource;
pub mod run;
pub mod timing;
pub mod unit;

// Re-export common types
pub use encoding::RenderSettings;
pub use output::VideoOutput;
pub use resource::{ResourceHandle, ResourceKind};
pub use run::{RunId, RunState, TransitionError};
pub use timing::{slice_evenly, TimeSlice};
pub use unit::{CaptionOverlay, ImagePrompt, NarrationAudio, NarrationUnit, RenderedImage, UnitClip};
