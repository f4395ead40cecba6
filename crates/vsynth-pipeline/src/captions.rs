//! Caption renderer stage.

use std::sync::Arc;
use tracing::debug;

use vsynth_media::{plan_caption_chunks, VideoToolkit};
use vsynth_models::{CaptionOverlay, NarrationUnit, ResourceKind};

use crate::error::{PipelineError, PipelineResult};
use crate::tracker::ResourceTracker;

pub struct CaptionRenderer {
    toolkit: Arc<dyn VideoToolkit>,
    words_per_chunk: usize,
}

impl CaptionRenderer {
    pub fn new(toolkit: Arc<dyn VideoToolkit>, words_per_chunk: usize) -> Self {
        Self {
            toolkit,
            words_per_chunk,
        }
    }

    /// Render timed overlays covering `[0, duration)` of the unit exactly.
    pub async fn render(
        &self,
        unit: &NarrationUnit,
        duration: f64,
        tracker: &ResourceTracker,
    ) -> PipelineResult<Vec<CaptionOverlay>> {
        let unit_index = unit.index;
        let chunks = plan_caption_chunks(&unit.text, self.words_per_chunk, duration);
        let mut overlays = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            let label = format!("u{unit_index}-c{}", chunk.index);
            let text_file = tracker.allocate(ResourceKind::CaptionText, &label, "txt");
            let image = tracker.allocate(ResourceKind::Caption, &label, "png");

            self.toolkit
                .render_caption(&chunk.text, text_file.path(), image.path())
                .await
                .map_err(|e| PipelineError::from_media(e, |m| PipelineError::captions(unit_index, m)))?;

            overlays.push(CaptionOverlay {
                unit_index,
                chunk_index: chunk.index,
                path: image,
                start_offset: chunk.slice.start,
                duration: chunk.slice.duration,
            });
        }

        debug!(unit_index, chunks = overlays.len(), "Captions rendered");
        Ok(overlays)
    }
}
