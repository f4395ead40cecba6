#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for narrated video rendering.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with multiple inputs
//! - Progress parsing from `-progress pipe:2`
//! - Media duration probing via FFprobe
//! - Caption chunk planning and transparent caption overlay rendering
//! - Per-unit clip composition (image slideshow + captions + narration)
//! - Ordered concatenation of unit clips into the final video
//! - The `VideoToolkit` seam the pipeline renders through

pub mod caption;
pub mod command;
pub mod compose;
pub mod concat;
pub mod error;
pub mod probe;
pub mod progress;
pub mod toolkit;

pub use caption::{plan_caption_chunks, render_caption, resolve_caption_font, CaptionChunk};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use compose::{build_clip_command, plan_clip, ClipPlan, SlicedImage};
pub use concat::{concatenate, write_concat_list};
pub use error::{MediaError, MediaResult};
pub use probe::{probe_duration, probe_media, MediaInfo};
pub use progress::FfmpegProgress;
pub use toolkit::{FfmpegToolkit, VideoToolkit};
