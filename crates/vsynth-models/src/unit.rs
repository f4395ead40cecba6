//! Narration units and the per-unit artifacts derived from them.

use serde::{Deserialize, Serialize};

use crate::resource::ResourceHandle;

/// One sentence-level segment of the narration script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationUnit {
    /// 0-based position in the script
    pub index: usize,
    /// Sentence text
    pub text: String,
}

impl NarrationUnit {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// Image description paired 1:1 with a narration unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePrompt {
    pub unit_index: usize,
    pub description: String,
}

/// A generated image written to transient storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedImage {
    pub unit_index: usize,
    pub path: ResourceHandle,
}

/// Synthesized narration for a unit.
///
/// `duration_secs` is authoritative for every other timing in the unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrationAudio {
    pub unit_index: usize,
    pub path: ResourceHandle,
    pub duration_secs: f64,
}

/// A timed caption overlay image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionOverlay {
    pub unit_index: usize,
    pub chunk_index: usize,
    pub path: ResourceHandle,
    /// Offset from the start of the unit, in seconds
    pub start_offset: f64,
    pub duration: f64,
}

impl CaptionOverlay {
    pub fn end(&self) -> f64 {
        self.start_offset + self.duration
    }
}

/// Composed clip for one unit, ready for concatenation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitClip {
    pub unit_index: usize,
    pub path: ResourceHandle,
    pub duration_secs: f64,
}
