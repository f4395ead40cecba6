//! Clip composer stage.

use std::sync::Arc;
use tracing::debug;

use vsynth_media::{plan_clip, MediaError, VideoToolkit};
use vsynth_models::{CaptionOverlay, NarrationAudio, RenderedImage, ResourceKind, UnitClip};

use crate::error::{PipelineError, PipelineResult};
use crate::tracker::ResourceTracker;

pub struct ClipComposer {
    toolkit: Arc<dyn VideoToolkit>,
}

impl ClipComposer {
    pub fn new(toolkit: Arc<dyn VideoToolkit>) -> Self {
        Self { toolkit }
    }

    /// Compose one unit's clip; its duration is exactly the narration's.
    ///
    /// A unit without images fails here rather than producing an empty clip.
    pub async fn compose(
        &self,
        unit_index: usize,
        images: &[RenderedImage],
        audio: &NarrationAudio,
        captions: &[CaptionOverlay],
        tracker: &ResourceTracker,
    ) -> PipelineResult<UnitClip> {
        if images.is_empty() {
            return Err(PipelineError::NoImages { unit_index });
        }

        let output = tracker.allocate(ResourceKind::Clip, &format!("u{unit_index}"), "mp4");
        let plan = plan_clip(unit_index, images, audio, captions, output.path()).map_err(|e| match e {
            MediaError::NoImages { unit_index } => PipelineError::NoImages { unit_index },
            other => PipelineError::composition(unit_index, other.to_string()),
        })?;

        self.toolkit
            .compose_clip(&plan)
            .await
            .map_err(|e| PipelineError::from_media(e, |m| PipelineError::composition(unit_index, m)))?;

        debug!(unit_index, duration = plan.duration, images = plan.images.len(), "Unit clip composed");
        Ok(UnitClip {
            unit_index,
            path: output,
            duration_secs: plan.duration,
        })
    }
}
