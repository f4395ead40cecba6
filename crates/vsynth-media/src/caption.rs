//! Caption chunk planning and overlay rendering.
//!
//! A unit's text is split into fixed-size word chunks and each chunk is
//! drawn onto a fully transparent canvas-sized PNG: bottom-centered, white
//! text on a semi-opaque box that hugs the text plus padding. Overlays are
//! later stacked at `0:0` over the slideshow, each enabled for its slice.

use std::path::{Path, PathBuf};
use tracing::debug;

use vsynth_models::{slice_evenly, RenderSettings, TimeSlice};

use crate::command::{escape_filter_value, FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// One caption chunk with its time slice inside the unit.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionChunk {
    pub index: usize,
    pub text: String,
    pub slice: TimeSlice,
}

/// Split `text` into chunks of `words_per_chunk` words, timed evenly across
/// `total_duration`.
///
/// The last chunk may be shorter. Text with no words becomes a single chunk
/// carrying the text unchanged, so every unit has at least one overlay.
pub fn plan_caption_chunks(text: &str, words_per_chunk: usize, total_duration: f64) -> Vec<CaptionChunk> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let texts: Vec<String> = if words.is_empty() {
        vec![text.to_string()]
    } else {
        words
            .chunks(words_per_chunk.max(1))
            .map(|chunk| chunk.join(" "))
            .collect()
    };

    slice_evenly(total_duration, texts.len())
        .into_iter()
        .zip(texts)
        .enumerate()
        .map(|(index, (slice, text))| CaptionChunk { index, text, slice })
        .collect()
}

/// First existing font from `candidates`, with `~` expanded to `$HOME`.
///
/// `None` means FFmpeg's built-in default font is used.
pub fn resolve_caption_font(candidates: &[String]) -> Option<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);

    candidates.iter().find_map(|candidate| {
        let path = match candidate.strip_prefix("~/") {
            Some(rest) => home.as_ref()?.join(rest),
            None => PathBuf::from(candidate),
        };
        path.is_file().then_some(path)
    })
}

/// Build the drawtext filter for one caption.
///
/// Text is read from `text_file` so no escaping of the caption itself is
/// needed; `expansion=none` keeps `%` literal.
pub fn caption_filter(text_file: &Path, font: Option<&Path>, settings: &RenderSettings) -> String {
    let mut filter = String::from("drawtext=");
    if let Some(font) = font {
        filter.push_str(&format!(
            "fontfile='{}':",
            escape_filter_value(&font.to_string_lossy())
        ));
    }
    filter.push_str(&format!(
        "textfile='{}':expansion=none:fontsize={}:fontcolor=white:\
         box=1:boxcolor=black@{:.2}:boxborderw={}:\
         x=(w-text_w)/2:y=h-text_h-{}",
        escape_filter_value(&text_file.to_string_lossy()),
        settings.caption_font_size,
        settings.caption_box_opacity,
        settings.caption_box_padding,
        settings.caption_bottom_margin,
    ));
    filter
}

/// Build the command rendering one transparent caption overlay PNG.
pub fn build_caption_command(
    text_file: &Path,
    output: &Path,
    font: Option<&Path>,
    settings: &RenderSettings,
) -> FfmpegCommand {
    FfmpegCommand::new(output)
        .input_with_args(
            ["-f", "lavfi"],
            format!("color=c=black@0.0:s={}:d=1,format=rgba", settings.canvas()),
        )
        .video_filter(caption_filter(text_file, font, settings))
        .single_frame()
        .output_args(["-pix_fmt", "rgba", "-update", "1"])
}

/// Write `text` to `text_file` and render its overlay to `output`.
pub async fn render_caption(
    runner: &FfmpegRunner,
    text: &str,
    text_file: &Path,
    output: &Path,
    settings: &RenderSettings,
) -> MediaResult<()> {
    tokio::fs::write(text_file, text).await?;

    let font = resolve_caption_font(&settings.caption_fonts);
    debug!(font = ?font, output = %output.display(), "Rendering caption overlay");

    let cmd = build_caption_command(text_file, output, font.as_deref(), settings);
    runner.run(&cmd).await
}
