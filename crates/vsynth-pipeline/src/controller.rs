//! Pipeline controller.
//!
//! Sequences one run through
//! `Received → Summarized → Segmented → PromptsAligned → UnitsComposed →
//! Assembled → (Uploaded | LocalOnly) → Terminated`, with `Failed` reachable
//! from any non-terminal state. Cleanup happens in exactly one place,
//! after the run has either produced its output or failed.

use futures::future::FutureExt;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, Instrument};

use vsynth_media::{FfmpegToolkit, VideoToolkit};
use vsynth_models::{
    CaptionOverlay, ImagePrompt, NarrationAudio, NarrationUnit, RenderedImage, ResourceHandle, RunId,
    RunState, UnitClip, VideoOutput,
};
use vsynth_storage::R2Client;

use crate::aligner::PromptAligner;
use crate::assembler::VideoAssembler;
use crate::captions::CaptionRenderer;
use crate::clients::{CloudTtsClient, GeminiClient, ImagenClient, R2Uploader};
use crate::composer::ClipComposer;
use crate::config::{GeminiConfig, PipelineConfig, TtsConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::logging::RunLogger;
use crate::metrics;
use crate::narrator::Narrator;
use crate::segmenter::segment;
use crate::services::{ArtifactUploader, ImageGenerator, LanguageModel, ServiceResult, SpeechSynthesizer};
use crate::summarizer::Summarizer;
use crate::tracker::ResourceTracker;
use crate::visuals::VisualRenderer;

/// External collaborators, constructed once at process start.
#[derive(Clone)]
pub struct PipelineServices {
    pub llm: Arc<dyn LanguageModel>,
    pub images: Arc<dyn ImageGenerator>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    /// `None` when artifact storage is not configured
    pub uploader: Option<Arc<dyn ArtifactUploader>>,
    pub toolkit: Arc<dyn VideoToolkit>,
}

impl PipelineServices {
    /// Build the HTTP clients, R2 uploader and FFmpeg toolkit from the environment.
    ///
    /// Missing Gemini or TTS keys are an error; missing R2 settings only
    /// disable uploads.
    pub async fn from_env(config: &PipelineConfig) -> ServiceResult<Self> {
        let gemini = GeminiConfig::from_env()?;
        let tts = TtsConfig::from_env()?;

        let uploader: Option<Arc<dyn ArtifactUploader>> = match R2Client::from_env().await {
            Ok(client) => Some(Arc::new(R2Uploader::new(client))),
            Err(e) => {
                info!("Artifact uploads disabled: {}", e);
                None
            }
        };

        Ok(Self {
            llm: Arc::new(GeminiClient::new(gemini.clone())?),
            images: Arc::new(ImagenClient::new(gemini)?),
            speech: Arc::new(CloudTtsClient::new(tts)?),
            uploader,
            toolkit: Arc::new(FfmpegToolkit::new(config.render.clone())),
        })
    }
}

/// Per-run mutable state. Nothing here is shared between runs.
#[derive(Debug)]
pub struct PipelineRun {
    id: RunId,
    state: RunState,
    tracker: ResourceTracker,
    history: Vec<RunState>,
    started: Instant,
}

impl PipelineRun {
    pub fn new(work_dir: impl Into<PathBuf>) -> PipelineResult<Self> {
        let id = RunId::new();
        let tracker = ResourceTracker::new(work_dir, &id)?;
        Ok(Self {
            id,
            state: RunState::Received,
            tracker,
            history: vec![RunState::Received],
            started: Instant::now(),
        })
    }

    pub fn id(&self) -> &RunId {
        &self.id
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    pub fn tracker(&self) -> &ResourceTracker {
        &self.tracker
    }

    /// Move to `next`; only the listed successor (or `Failed`) is accepted.
    pub fn advance(&mut self, next: RunState) -> PipelineResult<()> {
        self.state = self.state.transition(next)?;
        self.history.push(next);
        Ok(())
    }

    fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.state = RunState::Failed;
            self.history.push(RunState::Failed);
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub run_id: RunId,
    pub output: VideoOutput,
    pub unit_count: usize,
    /// Sum of the per-unit narration durations
    pub total_duration_secs: f64,
    pub states: Vec<RunState>,
}

/// Everything one unit needs before composition.
struct UnitAssets {
    unit_index: usize,
    audio: NarrationAudio,
    images: Vec<RenderedImage>,
    captions: Vec<CaptionOverlay>,
}

/// Output of the stages that run before delivery.
struct Produced {
    artifact: ResourceHandle,
    unit_count: usize,
    total_duration_secs: f64,
}

/// The pipeline controller, shared by all requests.
pub struct Pipeline {
    config: PipelineConfig,
    services: PipelineServices,
    summarizer: Summarizer,
    aligner: PromptAligner,
    visuals: VisualRenderer,
    narrator: Narrator,
    captions: CaptionRenderer,
    composer: ClipComposer,
    assembler: VideoAssembler,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, services: PipelineServices) -> Self {
        let mut summarizer = Summarizer::new(services.llm.clone(), config.summary_min_chars);
        if !config.summarize {
            summarizer = summarizer.disabled();
        }

        Self {
            summarizer,
            aligner: PromptAligner::new(services.llm.clone(), config.prompt_attempts, config.prompt_retry_delay),
            visuals: VisualRenderer::new(services.images.clone(), config.image_params.clone()),
            narrator: Narrator::new(services.speech.clone(), services.toolkit.clone()),
            captions: CaptionRenderer::new(services.toolkit.clone(), config.render.caption_words_per_chunk),
            composer: ClipComposer::new(services.toolkit.clone()),
            assembler: VideoAssembler::new(services.toolkit.clone()),
            config,
            services,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Whether finished videos can be uploaded.
    pub fn can_upload(&self) -> bool {
        self.services.uploader.is_some()
    }

    /// Check that the media binaries are installed.
    pub async fn check_ready(&self) -> PipelineResult<()> {
        self.services
            .toolkit
            .check_available()
            .await
            .map_err(|e| PipelineError::unavailable(e.to_string()))
    }

    /// Probe artifact storage; `None` when uploads are not configured.
    pub async fn check_uploads(&self) -> Option<ServiceResult<()>> {
        match &self.services.uploader {
            Some(uploader) => Some(uploader.check().await),
            None => None,
        }
    }

    /// Create a run rooted in the configured scratch directory.
    pub fn start(&self) -> PipelineResult<PipelineRun> {
        PipelineRun::new(&self.config.work_dir)
    }

    /// Start and execute a run.
    pub async fn run(&self, text: &str, upload: bool) -> PipelineResult<RunOutcome> {
        let mut run = self.start()?;
        self.execute(&mut run, text, upload).await
    }

    /// Execute `run` to completion or failure.
    ///
    /// Every transient file is released before this returns, except the
    /// artifact of a local-only run.
    pub async fn execute(&self, run: &mut PipelineRun, text: &str, upload: bool) -> PipelineResult<RunOutcome> {
        let logger = RunLogger::new(run.id(), "visual_video");
        let span = logger.create_span();

        async {
            logger.log_start(&format!("{} chars, upload={}", text.chars().count(), upload));
            metrics::record_run_started();

            let result = match self.produce(run, text, upload, &logger).await {
                Ok(produced) => self.deliver(run, produced, upload).await,
                Err(e) => Err(e),
            };

            let released = run.tracker.release_all().await;
            metrics::record_resources_released(released);

            match result {
                Ok((output, unit_count, total_duration_secs)) => {
                    run.advance(RunState::Terminated)?;
                    let mode = if output.url().is_some() { "uploaded" } else { "local" };
                    let elapsed = run.started.elapsed().as_secs_f64();
                    metrics::record_run_completed(mode, elapsed);
                    logger.log_completion(&format!(
                        "{unit_count} units, {total_duration_secs:.2}s of video, {released} files released"
                    ));

                    Ok(RunOutcome {
                        run_id: run.id.clone(),
                        output,
                        unit_count,
                        total_duration_secs,
                        states: run.history.clone(),
                    })
                }
                Err(e) => {
                    run.fail();
                    metrics::record_run_failed(e.stage());
                    if e.is_unavailable() {
                        logger.log_warning(&e.to_string());
                    } else {
                        logger.log_error(&format!("[{}] {}", e.stage(), e));
                    }
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Summarize through assembly.
    async fn produce(
        &self,
        run: &mut PipelineRun,
        text: &str,
        upload: bool,
        logger: &RunLogger,
    ) -> PipelineResult<Produced> {
        // Blank input fails as no_content without touching any dependency.
        if !text.trim().is_empty() {
            self.preflight(upload).await?;
        }

        let script = self.summarizer.summarize(text).await;
        run.advance(RunState::Summarized)?;

        let units = segment(&script);
        if units.is_empty() {
            return Err(PipelineError::NoContent);
        }
        run.advance(RunState::Segmented)?;
        logger.log_progress(&format!("{} narration units", units.len()));

        let prompts = self.aligner.align(&units).await?;
        run.advance(RunState::PromptsAligned)?;

        let (clips, total_duration_secs) = self.render_units(&units, &prompts, &run.tracker).await?;
        run.advance(RunState::UnitsComposed)?;
        metrics::record_units_rendered(clips.len());

        let artifact = self.assembler.assemble(&clips, &run.tracker).await?;
        run.advance(RunState::Assembled)?;

        Ok(Produced {
            artifact,
            unit_count: units.len(),
            total_duration_secs,
        })
    }

    /// Fail fast when the run could not finish anyway.
    async fn preflight(&self, upload: bool) -> PipelineResult<()> {
        if upload && !self.can_upload() {
            return Err(PipelineError::unavailable("artifact storage is not configured"));
        }
        self.check_ready().await
    }

    /// Produce every unit's assets, then compose the clips in index order.
    ///
    /// Up to `unit_parallelism` units are in flight at once and the buffered
    /// stream yields them in order. After a failure no new unit starts, but
    /// units already in flight run to completion so that every file they
    /// write exists before cleanup.
    async fn render_units(
        &self,
        units: &[NarrationUnit],
        prompts: &[ImagePrompt],
        tracker: &ResourceTracker,
    ) -> PipelineResult<(Vec<UnitClip>, f64)> {
        let aborted = AtomicBool::new(false);
        let mut prepared = stream::iter(units)
            .map(|unit| {
                let unit_prompts: Vec<ImagePrompt> = prompts
                    .iter()
                    .filter(|p| p.unit_index == unit.index)
                    .cloned()
                    .collect();
                let aborted = &aborted;
                async move {
                    if aborted.load(Ordering::SeqCst) {
                        return None;
                    }
                    let result = self.prepare_unit(unit, &unit_prompts, tracker).await;
                    if result.is_err() {
                        aborted.store(true, Ordering::SeqCst);
                    }
                    Some(result)
                }
                .boxed()
            })
            .buffered(self.config.unit_parallelism.max(1))
            .boxed();

        let mut assets: Vec<UnitAssets> = Vec::with_capacity(units.len());
        let mut first_error = None;
        while let Some(result) = prepared.next().await {
            match result {
                Some(Ok(unit)) if first_error.is_none() => assets.push(unit),
                Some(Err(e)) if first_error.is_none() => first_error = Some(e),
                _ => {}
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        let mut clips = Vec::with_capacity(assets.len());
        let mut total = 0.0;
        for unit in &assets {
            let clip = self
                .composer
                .compose(unit.unit_index, &unit.images, &unit.audio, &unit.captions, tracker)
                .await?;
            total += clip.duration_secs;
            clips.push(clip);
        }

        Ok((clips, total))
    }

    async fn prepare_unit(
        &self,
        unit: &NarrationUnit,
        prompts: &[ImagePrompt],
        tracker: &ResourceTracker,
    ) -> PipelineResult<UnitAssets> {
        let audio = self.narrator.narrate(unit, tracker).await?;
        let images = self.visuals.render_unit(prompts, tracker).await;
        let captions = self.captions.render(unit, audio.duration_secs, tracker).await?;

        Ok(UnitAssets {
            unit_index: unit.index,
            audio,
            images,
            captions,
        })
    }

    /// Upload the artifact, or hand its path to the caller.
    async fn deliver(
        &self,
        run: &mut PipelineRun,
        produced: Produced,
        upload: bool,
    ) -> PipelineResult<(VideoOutput, usize, f64)> {
        let output = if upload {
            let uploader = self
                .services
                .uploader
                .as_ref()
                .ok_or_else(|| PipelineError::unavailable("artifact storage is not configured"))?;
            let url = uploader
                .upload(produced.artifact.path())
                .await
                .map_err(|e| PipelineError::Upload(e.to_string()))?;
            run.advance(RunState::Uploaded)?;
            VideoOutput::Uploaded { url }
        } else {
            run.tracker.exempt(&produced.artifact);
            run.advance(RunState::LocalOnly)?;
            VideoOutput::LocalOnly {
                path: produced.artifact.into_path(),
            }
        };

        Ok((output, produced.unit_count, produced.total_duration_secs))
    }
}
