//! The rendering seam used by the pipeline.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

use vsynth_models::RenderSettings;

use crate::caption::render_caption;
use crate::command::{check_ffmpeg, check_ffprobe, FfmpegRunner};
use crate::compose::{build_clip_command, ClipPlan};
use crate::concat::concatenate;
use crate::error::{MediaError, MediaResult};
use crate::probe::probe_duration;

/// Media operations the pipeline needs.
///
/// Every output path is allocated by the caller, which owns its cleanup.
#[async_trait]
pub trait VideoToolkit: Send + Sync {
    /// Fails when a required binary is missing.
    async fn check_available(&self) -> MediaResult<()>;

    /// Duration of an audio or video file in seconds.
    async fn probe_duration(&self, path: &Path) -> MediaResult<f64>;

    /// Write `text` to `text_file` and render it as a transparent overlay at `output`.
    async fn render_caption(&self, text: &str, text_file: &Path, output: &Path) -> MediaResult<()>;

    /// Render `plan.output`.
    async fn compose_clip(&self, plan: &ClipPlan) -> MediaResult<()>;

    /// Join `clips` in order into `output`, writing the list to `list_file`.
    async fn concatenate(&self, clips: &[PathBuf], list_file: &Path, output: &Path) -> MediaResult<()>;
}

/// [`VideoToolkit`] backed by the ffmpeg and ffprobe binaries.
#[derive(Debug, Clone, Default)]
pub struct FfmpegToolkit {
    runner: FfmpegRunner,
    settings: RenderSettings,
}

impl FfmpegToolkit {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            runner: FfmpegRunner::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }
}

#[async_trait]
impl VideoToolkit for FfmpegToolkit {
    async fn check_available(&self) -> MediaResult<()> {
        let ffmpeg = check_ffmpeg()?;
        let ffprobe = check_ffprobe()?;
        debug!(ffmpeg = %ffmpeg.display(), ffprobe = %ffprobe.display(), "Media binaries found");
        Ok(())
    }

    async fn probe_duration(&self, path: &Path) -> MediaResult<f64> {
        probe_duration(path).await
    }

    async fn render_caption(&self, text: &str, text_file: &Path, output: &Path) -> MediaResult<()> {
        render_caption(&self.runner, text, text_file, output, &self.settings).await
    }

    async fn compose_clip(&self, plan: &ClipPlan) -> MediaResult<()> {
        if plan.images.is_empty() {
            return Err(MediaError::NoImages {
                unit_index: plan.unit_index,
            });
        }

        debug!(
            unit_index = plan.unit_index,
            images = plan.images.len(),
            captions = plan.captions.len(),
            duration = plan.duration,
            "Composing unit clip"
        );
        let unit_index = plan.unit_index;
        let total_ms = (plan.duration * 1000.0).round() as i64;
        self.runner
            .run_with_progress(&build_clip_command(plan, &self.settings), move |progress| {
                trace!(
                    unit_index,
                    percent = progress.percentage(total_ms),
                    speed = progress.speed,
                    "Clip render progress"
                );
            })
            .await
    }

    async fn concatenate(&self, clips: &[PathBuf], list_file: &Path, output: &Path) -> MediaResult<()> {
        info!(clips = clips.len(), output = %output.display(), "Concatenating unit clips");
        concatenate(&self.runner, clips, list_file, output, &self.settings).await
    }
}
