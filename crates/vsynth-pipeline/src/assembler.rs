//! Video assembler stage.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use vsynth_media::VideoToolkit;
use vsynth_models::{ResourceHandle, ResourceKind, UnitClip};

use crate::error::{PipelineError, PipelineResult};
use crate::tracker::ResourceTracker;

pub struct VideoAssembler {
    toolkit: Arc<dyn VideoToolkit>,
}

impl VideoAssembler {
    pub fn new(toolkit: Arc<dyn VideoToolkit>) -> Self {
        Self { toolkit }
    }

    /// Concatenate clips in unit-index order into one tracked video.
    pub async fn assemble(&self, clips: &[UnitClip], tracker: &ResourceTracker) -> PipelineResult<ResourceHandle> {
        if clips.is_empty() {
            return Err(PipelineError::Assembly("no clips to assemble".to_string()));
        }

        let mut ordered: Vec<&UnitClip> = clips.iter().collect();
        ordered.sort_by_key(|c| c.unit_index);
        let paths: Vec<PathBuf> = ordered.iter().map(|c| c.path.path().to_path_buf()).collect();

        let list_file = tracker.allocate(ResourceKind::ConcatList, "", "txt");
        let output = tracker.allocate(ResourceKind::Video, "", "mp4");

        self.toolkit
            .concatenate(&paths, list_file.path(), output.path())
            .await
            .map_err(|e| PipelineError::from_media(e, PipelineError::Assembly))?;

        info!(clips = paths.len(), output = %output, "Video assembled");
        Ok(output)
    }
}
