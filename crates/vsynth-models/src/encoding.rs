//! Rendering and encoding settings for narrated videos.

use serde::{Deserialize, Serialize};

/// Output canvas width (16:9)
pub const CANVAS_WIDTH: u32 = 1280;
/// Output canvas height (16:9)
pub const CANVAS_HEIGHT: u32 = 720;
/// Output frame rate
pub const DEFAULT_FPS: u32 = 24;
/// Default video codec (H.264)
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
/// Default audio codec
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Default encoding preset
pub const DEFAULT_PRESET: &str = "fast";
/// Default CRF (Constant Rate Factor)
pub const DEFAULT_CRF: u8 = 20;
/// Default audio bitrate
pub const DEFAULT_AUDIO_BITRATE: &str = "128k";
/// Audio sample rate shared by every clip so concatenation stays uniform
pub const DEFAULT_AUDIO_SAMPLE_RATE: u32 = 44_100;

/// Caption settings
pub const CAPTION_FONT_SIZE: u32 = 44;
pub const CAPTION_WORDS_PER_CHUNK: usize = 4;
pub const CAPTION_BOTTOM_MARGIN: u32 = 60;
pub const CAPTION_BOX_PADDING: u32 = 10;
/// Background box alpha (180/255)
pub const CAPTION_BOX_OPACITY: f32 = 0.7;

/// Minimum narration duration; shorter audio is padded up to this.
pub const MIN_UNIT_DURATION_SECS: f64 = 1.0;

/// Font files tried in order for captions. `~` expands to `$HOME`.
pub const CAPTION_FONT_CANDIDATES: &[&str] = &[
    "~/Library/Fonts/DejaVuSans-Bold.ttf",
    "/Library/Fonts/DejaVuSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
];

/// Rendering configuration shared by caption, clip and assembly stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_video_codec")]
    pub video_codec: String,
    #[serde(default = "default_preset")]
    pub preset: String,
    #[serde(default = "default_crf")]
    pub crf: u8,
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,
    #[serde(default = "default_sample_rate")]
    pub audio_sample_rate: u32,
    #[serde(default = "default_font_size")]
    pub caption_font_size: u32,
    #[serde(default = "default_words_per_chunk")]
    pub caption_words_per_chunk: usize,
    #[serde(default = "default_bottom_margin")]
    pub caption_bottom_margin: u32,
    #[serde(default = "default_box_padding")]
    pub caption_box_padding: u32,
    #[serde(default = "default_box_opacity")]
    pub caption_box_opacity: f32,
    /// Font files tried in order; empty falls back to FFmpeg's default font
    #[serde(default = "default_font_candidates")]
    pub caption_fonts: Vec<String>,
}

fn default_width() -> u32 {
    CANVAS_WIDTH
}
fn default_height() -> u32 {
    CANVAS_HEIGHT
}
fn default_fps() -> u32 {
    DEFAULT_FPS
}
fn default_video_codec() -> String {
    DEFAULT_VIDEO_CODEC.to_string()
}
fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}
fn default_crf() -> u8 {
    DEFAULT_CRF
}
fn default_audio_codec() -> String {
    DEFAULT_AUDIO_CODEC.to_string()
}
fn default_audio_bitrate() -> String {
    DEFAULT_AUDIO_BITRATE.to_string()
}
fn default_sample_rate() -> u32 {
    DEFAULT_AUDIO_SAMPLE_RATE
}
fn default_font_size() -> u32 {
    CAPTION_FONT_SIZE
}
fn default_words_per_chunk() -> usize {
    CAPTION_WORDS_PER_CHUNK
}
fn default_bottom_margin() -> u32 {
    CAPTION_BOTTOM_MARGIN
}
fn default_box_padding() -> u32 {
    CAPTION_BOX_PADDING
}
fn default_box_opacity() -> f32 {
    CAPTION_BOX_OPACITY
}
fn default_font_candidates() -> Vec<String> {
    CAPTION_FONT_CANDIDATES.iter().map(|s| s.to_string()).collect()
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            fps: DEFAULT_FPS,
            video_codec: default_video_codec(),
            preset: default_preset(),
            crf: DEFAULT_CRF,
            audio_codec: default_audio_codec(),
            audio_bitrate: default_audio_bitrate(),
            audio_sample_rate: DEFAULT_AUDIO_SAMPLE_RATE,
            caption_font_size: CAPTION_FONT_SIZE,
            caption_words_per_chunk: CAPTION_WORDS_PER_CHUNK,
            caption_bottom_margin: CAPTION_BOTTOM_MARGIN,
            caption_box_padding: CAPTION_BOX_PADDING,
            caption_box_opacity: CAPTION_BOX_OPACITY,
            caption_fonts: default_font_candidates(),
        }
    }
}

impl RenderSettings {
    /// Canvas size as `WxH`, the form FFmpeg's `color` source expects.
    pub fn canvas(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Frame duration in seconds.
    pub fn frame_secs(&self) -> f64 {
        1.0 / self.fps.max(1) as f64
    }
}
