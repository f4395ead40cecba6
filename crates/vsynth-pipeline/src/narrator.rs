//! Narrator: speech synthesis and duration measurement.

use std::sync::Arc;
use tracing::debug;

use vsynth_media::VideoToolkit;
use vsynth_models::encoding::MIN_UNIT_DURATION_SECS;
use vsynth_models::{NarrationAudio, NarrationUnit, ResourceKind};

use crate::error::{PipelineError, PipelineResult};
use crate::services::SpeechSynthesizer;
use crate::tracker::ResourceTracker;

pub struct Narrator {
    speech: Arc<dyn SpeechSynthesizer>,
    toolkit: Arc<dyn VideoToolkit>,
}

impl Narrator {
    pub fn new(speech: Arc<dyn SpeechSynthesizer>, toolkit: Arc<dyn VideoToolkit>) -> Self {
        Self { speech, toolkit }
    }

    /// Synthesize and measure narration for `unit`.
    ///
    /// The returned duration is floored at one second and drives every other
    /// timing in the unit. Any failure voids the unit.
    pub async fn narrate(&self, unit: &NarrationUnit, tracker: &ResourceTracker) -> PipelineResult<NarrationAudio> {
        let unit_index = unit.index;

        let audio = self
            .speech
            .synthesize(&unit.text)
            .await
            .map_err(|e| PipelineError::narration(unit_index, e.to_string()))?;
        if audio.is_empty() {
            return Err(PipelineError::narration(unit_index, "speech service returned no audio"));
        }

        let path = tracker
            .write(ResourceKind::Audio, &format!("u{unit_index}"), "mp3", &audio)
            .await
            .map_err(|e| PipelineError::narration(unit_index, format!("failed to write audio: {e}")))?;

        let measured = self
            .toolkit
            .probe_duration(path.path())
            .await
            .map_err(|e| PipelineError::from_media(e, |m| PipelineError::narration(unit_index, m)))?;

        let duration_secs = measured.max(MIN_UNIT_DURATION_SECS);
        debug!(unit_index, measured, duration_secs, "Narration ready");

        Ok(NarrationAudio {
            unit_index,
            path,
            duration_secs,
        })
    }
}
