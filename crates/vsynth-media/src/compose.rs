//! Per-unit clip composition.
//!
//! A unit clip is a slideshow of the unit's images, each shown for an equal
//! slice of the narration, with caption overlays enabled during their own
//! slices and the narration as soundtrack. The output is clamped to the
//! narration duration.

use std::path::{Path, PathBuf};

use vsynth_models::{slice_evenly, CaptionOverlay, NarrationAudio, RenderSettings, RenderedImage, TimeSlice};

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};

/// An image with the slice of the unit it is shown for.
#[derive(Debug, Clone, PartialEq)]
pub struct SlicedImage {
    pub path: PathBuf,
    pub slice: TimeSlice,
}

/// Everything needed to render one unit clip.
#[derive(Debug, Clone)]
pub struct ClipPlan {
    pub unit_index: usize,
    pub images: Vec<SlicedImage>,
    pub captions: Vec<CaptionOverlay>,
    pub audio: PathBuf,
    /// Clip duration, always the narration duration
    pub duration: f64,
    pub output: PathBuf,
}

/// Slice `images` evenly across the narration and pair them with captions.
///
/// Fails with [`MediaError::NoImages`] when the unit has no images.
pub fn plan_clip(
    unit_index: usize,
    images: &[RenderedImage],
    audio: &NarrationAudio,
    captions: &[CaptionOverlay],
    output: impl AsRef<Path>,
) -> MediaResult<ClipPlan> {
    if images.is_empty() {
        return Err(MediaError::NoImages { unit_index });
    }

    let duration = audio.duration_secs;
    let images = images
        .iter()
        .zip(slice_evenly(duration, images.len()))
        .map(|(image, slice)| SlicedImage {
            path: image.path.path().to_path_buf(),
            slice,
        })
        .collect();

    let mut captions = captions.to_vec();
    captions.sort_by_key(|c| c.chunk_index);

    Ok(ClipPlan {
        unit_index,
        images,
        captions,
        audio: audio.path.path().to_path_buf(),
        duration,
        output: output.as_ref().to_path_buf(),
    })
}

/// Build the FFmpeg command for a clip plan.
///
/// Input order: images, then captions, then narration audio.
pub fn build_clip_command(plan: &ClipPlan, settings: &RenderSettings) -> FfmpegCommand {
    let fps = settings.fps.to_string();
    let mut cmd = FfmpegCommand::new(&plan.output);

    let last_image = plan.images.len().saturating_sub(1);
    for (i, image) in plan.images.iter().enumerate() {
        // One frame of headroom on the last image so rounding never leaves
        // the tail of the clip without video
        let shown = if i == last_image {
            image.slice.duration + settings.frame_secs()
        } else {
            image.slice.duration
        };
        cmd = cmd.input_with_args(
            [
                "-loop".to_string(),
                "1".to_string(),
                "-framerate".to_string(),
                fps.clone(),
                "-t".to_string(),
                format!("{:.3}", shown),
            ],
            image.path.to_string_lossy(),
        );
    }

    for caption in &plan.captions {
        cmd = cmd.input_with_args(
            [
                "-loop".to_string(),
                "1".to_string(),
                "-framerate".to_string(),
                fps.clone(),
                "-t".to_string(),
                format!("{:.3}", plan.duration + settings.frame_secs()),
            ],
            caption.path.path().to_string_lossy(),
        );
    }

    cmd = cmd.input(&plan.audio);

    cmd.filter_complex(clip_filter_graph(plan, settings))
        .map("[vout]")
        .map("[aout]")
        .duration(plan.duration)
        .video_codec(settings.video_codec.clone())
        .preset(settings.preset.clone())
        .crf(settings.crf)
        .output_args(["-pix_fmt", "yuv420p"])
        .frame_rate(settings.fps)
        .audio_codec(settings.audio_codec.clone())
        .audio_bitrate(settings.audio_bitrate.clone())
        .output_args(["-ar".to_string(), settings.audio_sample_rate.to_string(), "-ac".to_string(), "2".to_string()])
}

/// Filter graph: normalize images to the canvas, concatenate them, stack
/// caption overlays, pad the narration with silence.
pub fn clip_filter_graph(plan: &ClipPlan, settings: &RenderSettings) -> String {
    let (w, h) = (settings.width, settings.height);
    let image_count = plan.images.len();
    let mut parts = Vec::new();

    for i in 0..image_count {
        parts.push(format!(
            "[{i}:v]scale={w}:{h}:force_original_aspect_ratio=decrease,\
             pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:color=black,setsar=1,fps={fps},format=yuv420p[img{i}]",
            fps = settings.fps,
        ));
    }

    let labels: String = (0..image_count).map(|i| format!("[img{i}]")).collect();
    parts.push(format!("{labels}concat=n={image_count}:v=1:a=0[base]"));

    let mut current = "base".to_string();
    for (n, caption) in plan.captions.iter().enumerate() {
        let input = image_count + n;
        let next = format!("cap{n}");
        parts.push(format!(
            "[{current}][{input}:v]overlay=0:0:enable='gte(t,{:.3})*lt(t,{:.3})'[{next}]",
            caption.start_offset,
            caption.end(),
        ));
        current = next;
    }
    parts.push(format!("[{current}]format=yuv420p[vout]"));

    let audio_input = image_count + plan.captions.len();
    parts.push(format!(
        "[{audio_input}:a]apad,aresample={},aformat=channel_layouts=stereo[aout]",
        settings.audio_sample_rate
    ));

    parts.join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsynth_models::{ResourceHandle, ResourceKind};

    fn image(unit: usize, name: &str) -> RenderedImage {
        RenderedImage {
            unit_index: unit,
            path: ResourceHandle::new(format!("/w/{name}"), ResourceKind::Image),
        }
    }

    fn audio(duration: f64) -> NarrationAudio {
        NarrationAudio {
            unit_index: 0,
            path: ResourceHandle::new("/w/voice.mp3", ResourceKind::Audio),
            duration_secs: duration,
        }
    }

    fn caption(chunk: usize, start: f64, duration: f64) -> CaptionOverlay {
        CaptionOverlay {
            unit_index: 0,
            chunk_index: chunk,
            path: ResourceHandle::new(format!("/w/cap{chunk}.png"), ResourceKind::Caption),
            start_offset: start,
            duration,
        }
    }

    #[test]
    fn test_zero_images_fails() {
        let result = plan_clip(3, &[], &audio(2.0), &[], "/w/clip.mp4");
        assert!(matches!(result, Err(MediaError::NoImages { unit_index: 3 })));
    }

    #[test]
    fn test_images_fill_audio_duration() {
        let images = vec![image(0, "a.png"), image(0, "b.png"), image(0, "c.png")];
        let plan = plan_clip(0, &images, &audio(4.5), &[], "/w/clip.mp4").unwrap();

        assert_eq!(plan.images.len(), 3);
        assert!((plan.images[1].slice.start - 1.5).abs() < 1e-9);
        let sum: f64 = plan.images.iter().map(|i| i.slice.duration).sum();
        assert!((sum - 4.5).abs() < 1e-9);
        assert_eq!(plan.duration, 4.5);
    }

    #[test]
    fn test_captions_sorted_by_chunk() {
        let captions = vec![caption(1, 1.0, 1.0), caption(0, 0.0, 1.0)];
        let plan = plan_clip(0, &[image(0, "a.png")], &audio(2.0), &captions, "/w/clip.mp4").unwrap();
        assert_eq!(plan.captions[0].chunk_index, 0);
        assert_eq!(plan.captions[1].chunk_index, 1);
    }

    #[test]
    fn test_filter_graph_layers_captions_over_slideshow() {
        let settings = RenderSettings::default();
        let captions = vec![caption(0, 0.0, 1.0), caption(1, 1.0, 1.0)];
        let images = vec![image(0, "a.png"), image(0, "b.png")];
        let plan = plan_clip(0, &images, &audio(2.0), &captions, "/w/clip.mp4").unwrap();

        let graph = clip_filter_graph(&plan, &settings);
        assert!(graph.contains("[img0][img1]concat=n=2:v=1:a=0[base]"));
        assert!(graph.contains("[base][2:v]overlay=0:0:enable='gte(t,0.000)*lt(t,1.000)'[cap0]"));
        assert!(graph.contains("[cap0][3:v]overlay=0:0:enable='gte(t,1.000)*lt(t,2.000)'[cap1]"));
        assert!(graph.contains("[cap1]format=yuv420p[vout]"));
        assert!(graph.contains("[4:a]apad"));
    }

    #[test]
    fn test_clip_command_clamps_to_audio() {
        let settings = RenderSettings::default();
        let plan = plan_clip(0, &[image(0, "a.png")], &audio(2.25), &[], "/w/clip.mp4").unwrap();
        let args = build_clip_command(&plan, &settings).build_args();

        let t_positions: Vec<_> = args
            .iter()
            .enumerate()
            .filter(|(_, a)| *a == "-t")
            .map(|(i, _)| i)
            .collect();
        // Image input gets headroom, output is clamped to the narration
        assert_eq!(args[t_positions[0] + 1], "2.292");
        assert_eq!(args[*t_positions.last().unwrap() + 1], "2.250");
        assert!(args.contains(&"[vout]".to_string()));
        assert_eq!(args.last().unwrap(), "/w/clip.mp4");
    }
}
