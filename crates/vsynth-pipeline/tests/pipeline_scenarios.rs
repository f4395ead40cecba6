//! End-to-end pipeline runs against in-memory fakes.

use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vsynth_media::{ClipPlan, MediaError, MediaResult, VideoToolkit};
use vsynth_models::{ResourceKind, RunState, VideoOutput};
use vsynth_pipeline::{
    ArtifactUploader, ImageGenerationParams, ImageGenerator, LanguageModel, Pipeline, PipelineConfig,
    PipelineError, PipelineServices, ServiceError, ServiceResult, SpeechSynthesizer,
};

const NARRATION_SECS: f64 = 2.5;

/// Replies to alignment requests from a queue; summary requests get `summary`.
struct FakeLanguageModel {
    alignment_replies: Mutex<VecDeque<ServiceResult<String>>>,
    summary: Option<String>,
    calls: AtomicUsize,
}

impl FakeLanguageModel {
    fn new(replies: Vec<ServiceResult<String>>) -> Self {
        Self {
            alignment_replies: Mutex::new(replies.into()),
            summary: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for FakeLanguageModel {
    async fn generate(&self, prompt: &str) -> ServiceResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !prompt.contains("image_prompts_per_sentence") {
            return self
                .summary
                .clone()
                .ok_or_else(|| ServiceError::empty("no summary scripted"));
        }
        self.alignment_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::empty("no reply scripted")))
    }
}

/// Returns a tiny PNG unless the prompt is listed as failing.
#[derive(Default)]
struct FakeImageGenerator {
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl FakeImageGenerator {
    fn failing(prompts: &[&str]) -> Self {
        Self {
            failing: prompts.iter().map(|p| p.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for FakeImageGenerator {
    async fn generate(&self, prompt: &str, params: &ImageGenerationParams) -> ServiceResult<Vec<Vec<u8>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(params.aspect_ratio, "16:9");
        if self.failing.contains(prompt) {
            return Err(ServiceError::Status {
                status: 400,
                body: "prompt rejected".to_string(),
            });
        }
        Ok(vec![b"\x89PNG fake".to_vec()])
    }
}

#[derive(Default)]
struct FakeSpeech {
    fail_on: Option<String>,
    /// Latency of every synthesis call
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeSpeech {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSpeech {
    async fn synthesize(&self, text: &str) -> ServiceResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on.as_deref() == Some(text) {
            return Err(ServiceError::Transport("connection reset".to_string()));
        }
        Ok(b"ID3 fake audio".to_vec())
    }
}

/// Records what it was asked to upload and whether the file existed then.
struct FakeUploader {
    fail: bool,
    uploads: Mutex<Vec<(PathBuf, bool)>>,
}

impl FakeUploader {
    fn new(fail: bool) -> Self {
        Self {
            fail,
            uploads: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ArtifactUploader for FakeUploader {
    async fn upload(&self, path: &Path) -> ServiceResult<String> {
        self.uploads
            .lock()
            .unwrap()
            .push((path.to_path_buf(), path.exists()));
        if self.fail {
            return Err(ServiceError::Transport("bucket unreachable".to_string()));
        }
        Ok("https://cdn.example.com/videos/2026/10/abc.mp4".to_string())
    }
}

/// Writes placeholder files wherever a real toolkit would render.
#[derive(Default)]
struct FakeToolkit {
    unavailable: bool,
    /// Probed narration length; `NARRATION_SECS` when unset
    narration_secs: Option<f64>,
    captions: Mutex<Vec<String>>,
    plans: Mutex<Vec<ClipPlan>>,
    concatenated: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl VideoToolkit for FakeToolkit {
    async fn check_available(&self) -> MediaResult<()> {
        if self.unavailable {
            return Err(MediaError::FfmpegNotFound);
        }
        Ok(())
    }

    async fn probe_duration(&self, path: &Path) -> MediaResult<f64> {
        assert!(path.exists(), "narration must be written before probing");
        Ok(self.narration_secs.unwrap_or(NARRATION_SECS))
    }

    async fn render_caption(&self, text: &str, text_file: &Path, output: &Path) -> MediaResult<()> {
        tokio::fs::write(text_file, text).await?;
        tokio::fs::write(output, b"caption").await?;
        self.captions.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn compose_clip(&self, plan: &ClipPlan) -> MediaResult<()> {
        tokio::fs::write(&plan.output, b"clip").await?;
        self.plans.lock().unwrap().push(plan.clone());
        Ok(())
    }

    async fn concatenate(&self, clips: &[PathBuf], list_file: &Path, output: &Path) -> MediaResult<()> {
        tokio::fs::write(list_file, b"list").await?;
        tokio::fs::write(output, b"video").await?;
        self.concatenated.lock().unwrap().extend_from_slice(clips);
        Ok(())
    }
}

struct Harness {
    llm: Arc<FakeLanguageModel>,
    images: Arc<FakeImageGenerator>,
    speech: Arc<FakeSpeech>,
    uploader: Option<Arc<FakeUploader>>,
    toolkit: Arc<FakeToolkit>,
    work_dir: tempfile::TempDir,
}

impl Harness {
    fn new(llm: FakeLanguageModel) -> Self {
        Self {
            llm: Arc::new(llm),
            images: Arc::new(FakeImageGenerator::default()),
            speech: Arc::new(FakeSpeech::default()),
            uploader: None,
            toolkit: Arc::new(FakeToolkit::default()),
            work_dir: tempfile::tempdir().unwrap(),
        }
    }

    fn images(mut self, images: FakeImageGenerator) -> Self {
        self.images = Arc::new(images);
        self
    }

    fn speech(mut self, speech: FakeSpeech) -> Self {
        self.speech = Arc::new(speech);
        self
    }

    fn uploader(mut self, uploader: FakeUploader) -> Self {
        self.uploader = Some(Arc::new(uploader));
        self
    }

    fn toolkit(mut self, toolkit: FakeToolkit) -> Self {
        self.toolkit = Arc::new(toolkit);
        self
    }

    fn config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default().with_work_dir(self.work_dir.path());
        config.summarize = false;
        config
    }

    fn pipeline(&self) -> Pipeline {
        self.pipeline_with(self.config())
    }

    fn pipeline_with(&self, config: PipelineConfig) -> Pipeline {
        let services = PipelineServices {
            llm: self.llm.clone(),
            images: self.images.clone(),
            speech: self.speech.clone(),
            uploader: self
                .uploader
                .clone()
                .map(|u| u as Arc<dyn ArtifactUploader>),
            toolkit: self.toolkit.clone(),
        };
        Pipeline::new(config, services)
    }

    fn external_calls(&self) -> usize {
        self.llm.calls() + self.images.calls() + self.speech.calls()
    }
}

fn prompts_reply(prompts: &[&str]) -> ServiceResult<String> {
    Ok(serde_json::json!({ "image_prompts_per_sentence": prompts }).to_string())
}

#[tokio::test]
async fn test_two_sentences_produce_local_video() {
    let h = Harness::new(FakeLanguageModel::new(vec![prompts_reply(&[
        "a sun rising over hills",
        "a sun setting over the sea",
    ])]));
    let pipeline = h.pipeline();
    let mut run = pipeline.start().unwrap();

    let outcome = pipeline
        .execute(&mut run, "The sun rises. The sun sets.", false)
        .await
        .unwrap();

    assert_eq!(outcome.unit_count, 2);
    assert!((outcome.total_duration_secs - 2.0 * NARRATION_SECS).abs() < 1e-9);
    assert_eq!(
        outcome.states,
        vec![
            RunState::Received,
            RunState::Summarized,
            RunState::Segmented,
            RunState::PromptsAligned,
            RunState::UnitsComposed,
            RunState::Assembled,
            RunState::LocalOnly,
            RunState::Terminated,
        ]
    );
    assert_eq!(run.state(), RunState::Terminated);

    let video = match &outcome.output {
        VideoOutput::LocalOnly { path } => path.clone(),
        other => panic!("expected local output, got {other:?}"),
    };
    assert!(video.exists(), "local artifact is exempt from cleanup");
    assert!(run.tracker().remaining_on_disk().is_empty());

    assert_eq!(h.llm.calls(), 1);
    assert_eq!(h.images.calls(), 2);
    assert_eq!(h.speech.calls(), 2);
    assert_eq!(
        *h.toolkit.captions.lock().unwrap(),
        vec!["The sun rises.".to_string(), "The sun sets.".to_string()]
    );

    let plans = h.toolkit.plans.lock().unwrap();
    assert_eq!(plans.len(), 2);
    for plan in plans.iter() {
        assert_eq!(plan.duration, NARRATION_SECS);
        assert_eq!(plan.images.len(), 1);
        let caption_end = plan.captions.last().unwrap().end();
        assert!((caption_end - NARRATION_SECS).abs() < 1e-9);
    }
}

#[tokio::test]
async fn test_uploaded_run_releases_everything() {
    let h = Harness::new(FakeLanguageModel::new(vec![prompts_reply(&["sunrise", "sunset"])]))
        .uploader(FakeUploader::new(false));
    let pipeline = h.pipeline();
    let mut run = pipeline.start().unwrap();

    let outcome = pipeline
        .execute(&mut run, "The sun rises. The sun sets.", true)
        .await
        .unwrap();

    assert_eq!(
        outcome.output.url(),
        Some("https://cdn.example.com/videos/2026/10/abc.mp4")
    );
    assert!(outcome.states.contains(&RunState::Uploaded));
    assert!(run.tracker().remaining_on_disk().is_empty());

    let uploads = h.uploader.as_ref().unwrap().uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    let (uploaded, existed) = &uploads[0];
    assert!(*existed, "artifact must exist while uploading");
    assert!(!uploaded.exists(), "artifact must be released after upload");
}

#[tokio::test]
async fn test_empty_input_fails_before_external_calls() {
    let h = Harness::new(FakeLanguageModel::new(vec![]));
    let mut config = h.config();
    config.summarize = true;
    let pipeline = h.pipeline_with(config);
    let mut run = pipeline.start().unwrap();

    let err = pipeline.execute(&mut run, "", false).await.unwrap_err();

    assert!(matches!(err, PipelineError::NoContent));
    assert_eq!(err.code(), "no_content");
    assert_eq!(h.external_calls(), 0);
    assert_eq!(run.state(), RunState::Failed);
    assert!(run.tracker().issued().is_empty());
}

#[tokio::test]
async fn test_failed_image_voids_unit_and_cleanup_removes_other_units() {
    let h = Harness::new(FakeLanguageModel::new(vec![prompts_reply(&["sunrise", "sunset"])]))
        .images(FakeImageGenerator::failing(&["sunrise"]));
    let pipeline = h.pipeline();
    let mut run = pipeline.start().unwrap();

    let err = pipeline
        .execute(&mut run, "The sun rises. The sun sets.", false)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::NoImages { unit_index: 0 }));
    assert_eq!(err.stage(), "clip_composer");
    assert_eq!(run.state(), RunState::Failed);
    assert_eq!(h.images.calls(), 2);

    let unit1_image = run
        .tracker()
        .issued()
        .into_iter()
        .find(|h| h.kind() == ResourceKind::Image)
        .expect("unit 1 image was generated");
    assert!(unit1_image.path().to_string_lossy().contains("-u1-"));
    assert!(!unit1_image.path().exists());
    assert!(run.tracker().remaining_on_disk().is_empty());
    assert!(h.toolkit.plans.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_prompt_count_mismatch_exhausts_attempts() {
    let h = Harness::new(FakeLanguageModel::new(vec![
        prompts_reply(&["only one"]),
        prompts_reply(&["only one"]),
        prompts_reply(&["only one"]),
    ]));
    let pipeline = h.pipeline();

    let err = pipeline
        .run("The sun rises. The sun sets.", false)
        .await
        .unwrap_err();

    match err {
        PipelineError::Alignment {
            expected,
            received,
            attempts,
        } => {
            assert_eq!(expected, 2);
            assert_eq!(received, 1);
            assert_eq!(attempts, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(h.llm.calls(), 3);
    assert_eq!(h.speech.calls(), 0);
    assert_eq!(h.images.calls(), 0);
}

#[tokio::test]
async fn test_alignment_recovers_within_budget() {
    let h = Harness::new(FakeLanguageModel::new(vec![
        Err(ServiceError::Transport("timeout".to_string())),
        Ok("I'm sorry, here you go".to_string()),
        prompts_reply(&["sunrise", "sunset"]),
    ]));
    let pipeline = h.pipeline();

    let outcome = pipeline
        .run("The sun rises. The sun sets.", false)
        .await
        .unwrap();

    assert_eq!(outcome.unit_count, 2);
    assert_eq!(h.llm.calls(), 3);
}

#[tokio::test]
async fn test_unusable_replies_fail_prompt_generation() {
    let h = Harness::new(FakeLanguageModel::new(vec![
        Err(ServiceError::Transport("timeout".to_string())),
        Ok("not json".to_string()),
        Ok("still not json".to_string()),
    ]));
    let pipeline = h.pipeline();

    let err = pipeline.run("The sun rises.", false).await.unwrap_err();

    assert!(matches!(err, PipelineError::PromptGeneration { attempts: 3, .. }));
    assert_eq!(err.code(), "prompt_generation_failed");
}

#[tokio::test]
async fn test_upload_without_storage_is_unavailable() {
    let h = Harness::new(FakeLanguageModel::new(vec![prompts_reply(&["sunrise"])]));
    let pipeline = h.pipeline();
    assert!(!pipeline.can_upload());

    let err = pipeline.run("The sun rises.", true).await.unwrap_err();

    assert!(err.is_unavailable());
    assert_eq!(h.external_calls(), 0);
}

#[tokio::test]
async fn test_missing_ffmpeg_is_unavailable() {
    let h = Harness::new(FakeLanguageModel::new(vec![prompts_reply(&["sunrise"])])).toolkit(FakeToolkit {
        unavailable: true,
        ..Default::default()
    });
    let pipeline = h.pipeline();

    assert!(pipeline.check_ready().await.unwrap_err().is_unavailable());
    let err = pipeline.run("The sun rises.", false).await.unwrap_err();
    assert!(err.is_unavailable());
    assert_eq!(h.external_calls(), 0);
}

#[tokio::test]
async fn test_upload_failure_still_cleans_up() {
    let h = Harness::new(FakeLanguageModel::new(vec![prompts_reply(&["sunrise"])]))
        .uploader(FakeUploader::new(true));
    let pipeline = h.pipeline();
    let mut run = pipeline.start().unwrap();

    let err = pipeline.execute(&mut run, "The sun rises.", true).await.unwrap_err();

    assert!(matches!(err, PipelineError::Upload(ref m) if m.contains("bucket unreachable")));
    assert_eq!(run.state(), RunState::Failed);
    assert!(run.history().contains(&RunState::Assembled));
    assert!(run.tracker().remaining_on_disk().is_empty());
}

#[tokio::test]
async fn test_narration_failure_is_fatal() {
    let h = Harness::new(FakeLanguageModel::new(vec![prompts_reply(&["sunrise", "sunset"])])).speech(
        FakeSpeech {
            fail_on: Some("The sun sets.".to_string()),
            ..Default::default()
        },
    );
    let pipeline = h.pipeline();
    let mut run = pipeline.start().unwrap();

    let err = pipeline
        .execute(&mut run, "The sun rises. The sun sets.", false)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Narration { unit_index: 1, .. }));
    assert!(!run.tracker().issued().is_empty());
    assert!(run.tracker().remaining_on_disk().is_empty());
}

#[tokio::test]
async fn test_cleanup_is_idempotent() {
    let h = Harness::new(FakeLanguageModel::new(vec![prompts_reply(&["sunrise"])]));
    let pipeline = h.pipeline();
    let mut run = pipeline.start().unwrap();

    let outcome = pipeline.execute(&mut run, "The sun rises.", false).await.unwrap();
    let video = outcome.output.local_path().cloned().unwrap();

    assert_eq!(run.tracker().release_all().await, 0);
    assert_eq!(run.tracker().release_all().await, 0);
    assert!(video.exists());
}

#[tokio::test]
async fn test_parallel_units_assemble_in_order() {
    let h = Harness::new(FakeLanguageModel::new(vec![prompts_reply(&["one", "two", "three"])]));
    let mut config = h.config();
    config.unit_parallelism = 3;
    let pipeline = h.pipeline_with(config);

    let outcome = pipeline
        .run("First line. Second line. Third line.", false)
        .await
        .unwrap();

    assert_eq!(outcome.unit_count, 3);
    let clips = h.toolkit.concatenated.lock().unwrap();
    assert_eq!(clips.len(), 3);
    for (i, clip) in clips.iter().enumerate() {
        assert!(clip.to_string_lossy().contains(&format!("-u{i}-")));
    }
}

#[tokio::test]
async fn test_summary_replaces_input() {
    let h = Harness::new(
        FakeLanguageModel::new(vec![prompts_reply(&["a quiet moonlit lake"])])
            .with_summary("The moon glows softly over the lake."),
    );
    let mut config = h.config();
    config.summarize = true;
    let pipeline = h.pipeline_with(config);

    let outcome = pipeline
        .run("A very long transcript. It rambles. It repeats itself. It goes on.", false)
        .await
        .unwrap();

    assert_eq!(outcome.unit_count, 1);
    assert_eq!(h.llm.calls(), 2);
    assert_eq!(
        *h.toolkit.captions.lock().unwrap(),
        vec![
            "The moon glows softly".to_string(),
            "over the lake.".to_string()
        ]
    );
}

#[tokio::test]
async fn test_runs_reject_skipped_states() {
    let h = Harness::new(FakeLanguageModel::new(vec![]));
    let pipeline = h.pipeline();
    let mut run = pipeline.start().unwrap();

    let err = run.advance(RunState::Assembled).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidTransition(_)));
    assert_eq!(run.state(), RunState::Received);

    run.advance(RunState::Summarized).unwrap();
    assert_eq!(run.history(), &[RunState::Received, RunState::Summarized]);
}

/// Unit index, clip length, image slices and caption timing of a plan.
fn plan_timing(plan: &ClipPlan) -> (usize, f64, Vec<(f64, f64)>, Vec<(usize, f64, f64)>) {
    (
        plan.unit_index,
        plan.duration,
        plan.images.iter().map(|i| (i.slice.start, i.slice.duration)).collect(),
        plan.captions
            .iter()
            .map(|c| (c.chunk_index, c.start_offset, c.duration))
            .collect(),
    )
}

#[tokio::test]
async fn test_repeated_runs_produce_identical_timing() {
    let h = Harness::new(FakeLanguageModel::new(vec![
        prompts_reply(&["sunrise", "sunset"]),
        prompts_reply(&["sunrise", "sunset"]),
    ]));
    let pipeline = h.pipeline();
    let text = "The sun rises over the quiet hills. The sun sets.";

    let first = pipeline.run(text, false).await.unwrap();
    let second = pipeline.run(text, false).await.unwrap();

    assert_ne!(first.run_id, second.run_id);
    assert_eq!(first.unit_count, second.unit_count);
    assert_eq!(first.total_duration_secs, second.total_duration_secs);
    assert!((first.total_duration_secs - 2.0 * NARRATION_SECS).abs() < 1e-9);

    let plans = h.toolkit.plans.lock().unwrap();
    assert_eq!(plans.len(), 4);
    assert_eq!(plan_timing(&plans[0]), plan_timing(&plans[2]));
    assert_eq!(plan_timing(&plans[1]), plan_timing(&plans[3]));

    let captions = h.toolkit.captions.lock().unwrap();
    assert_eq!(captions[..captions.len() / 2], captions[captions.len() / 2..]);
}

#[tokio::test]
async fn test_short_narration_is_floored_to_one_second() {
    let h = Harness::new(FakeLanguageModel::new(vec![prompts_reply(&["a bell at dawn"])])).toolkit(FakeToolkit {
        narration_secs: Some(0.3),
        ..Default::default()
    });
    let pipeline = h.pipeline();

    let outcome = pipeline.run("A tiny bell rang once at dawn.", false).await.unwrap();

    assert_eq!(outcome.total_duration_secs, 1.0);

    let plans = h.toolkit.plans.lock().unwrap();
    assert_eq!(plans.len(), 1);
    let plan = &plans[0];
    assert_eq!(plan.duration, 1.0);
    assert_eq!(plan.images.len(), 1);
    assert_eq!(plan.images[0].slice.duration, 1.0);

    assert_eq!(plan.captions.len(), 2);
    let total: f64 = plan.captions.iter().map(|c| c.duration).sum();
    assert!((total - 1.0).abs() < 1e-3);
    assert_eq!(plan.captions[0].start_offset, 0.0);
    assert!((plan.captions[1].start_offset - plan.captions[0].end()).abs() < 1e-9);
    assert!((plan.captions[1].end() - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_empty_input_is_no_content_without_ffmpeg() {
    let h = Harness::new(FakeLanguageModel::new(vec![])).toolkit(FakeToolkit {
        unavailable: true,
        ..Default::default()
    });
    let pipeline = h.pipeline();

    let err = pipeline.run("   ", false).await.unwrap_err();

    assert!(matches!(err, PipelineError::NoContent));
    assert_eq!(h.external_calls(), 0);
}

#[tokio::test]
async fn test_empty_input_is_no_content_without_storage() {
    let h = Harness::new(FakeLanguageModel::new(vec![]));
    let pipeline = h.pipeline();
    assert!(!pipeline.can_upload());

    let err = pipeline.run("", true).await.unwrap_err();

    assert!(matches!(err, PipelineError::NoContent));
    assert_eq!(err.code(), "no_content");
}

#[tokio::test]
async fn test_parallel_failure_waits_for_in_flight_units() {
    let h = Harness::new(FakeLanguageModel::new(vec![prompts_reply(&["one", "two", "three"])])).speech(
        FakeSpeech {
            fail_on: Some("First line.".to_string()),
            delay: Some(Duration::from_millis(30)),
            ..Default::default()
        },
    );
    let mut config = h.config();
    config.unit_parallelism = 3;
    let pipeline = h.pipeline_with(config);
    let mut run = pipeline.start().unwrap();

    let err = pipeline
        .execute(&mut run, "First line. Second line. Third line.", false)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Narration { unit_index: 0, .. }));
    assert_eq!(h.speech.calls(), 3);

    // Units 1 and 2 were already in flight and finished their captions
    let captions: Vec<_> = run
        .tracker()
        .issued()
        .into_iter()
        .filter(|h| h.kind() == ResourceKind::Caption)
        .collect();
    assert!(captions.iter().any(|c| c.path().to_string_lossy().contains("-u2-")));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(run.tracker().remaining_on_disk().is_empty());
    assert!(h.toolkit.plans.lock().unwrap().is_empty());
}
