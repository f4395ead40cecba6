//! Ordered concatenation of unit clips.

use std::path::{Path, PathBuf};

use vsynth_models::RenderSettings;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Render the concat demuxer list for `clips`, in the given order.
pub fn concat_list_contents(clips: &[PathBuf]) -> String {
    clips
        .iter()
        .map(|clip| {
            let path = clip.to_string_lossy().replace('\'', "'\\''");
            format!("file '{path}'\n")
        })
        .collect()
}

/// Write the concat demuxer list for `clips` to `list_file`.
pub async fn write_concat_list(clips: &[PathBuf], list_file: &Path) -> MediaResult<()> {
    if clips.is_empty() {
        return Err(MediaError::EmptyConcat);
    }
    tokio::fs::write(list_file, concat_list_contents(clips)).await?;
    Ok(())
}

/// Build the command joining a concat list into the final video.
///
/// Clips are re-encoded so timestamps stay continuous across boundaries.
pub fn build_concat_command(list_file: &Path, output: &Path, settings: &RenderSettings) -> FfmpegCommand {
    FfmpegCommand::new(output)
        .input_with_args(["-f", "concat", "-safe", "0"], list_file.to_string_lossy())
        .video_codec(settings.video_codec.clone())
        .preset(settings.preset.clone())
        .crf(settings.crf)
        .output_args(["-pix_fmt", "yuv420p"])
        .frame_rate(settings.fps)
        .audio_codec(settings.audio_codec.clone())
        .audio_bitrate(settings.audio_bitrate.clone())
        .output_args(["-movflags", "+faststart"])
}

/// Concatenate `clips` in order into `output`, using `list_file` as scratch.
pub async fn concatenate(
    runner: &FfmpegRunner,
    clips: &[PathBuf],
    list_file: &Path,
    output: &Path,
    settings: &RenderSettings,
) -> MediaResult<()> {
    write_concat_list(clips, list_file).await?;
    runner.run(&build_concat_command(list_file, output, settings)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_preserves_order_and_escapes() {
        let clips = vec![
            PathBuf::from("/w/u0-clip.mp4"),
            PathBuf::from("/w/it's-u1.mp4"),
        ];
        let contents = concat_list_contents(&clips);
        assert_eq!(
            contents,
            "file '/w/u0-clip.mp4'\nfile '/w/it'\\''s-u1.mp4'\n"
        );
    }

    #[tokio::test]
    async fn test_empty_concat_fails() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("list.txt");
        let result = write_concat_list(&[], &list).await;
        assert!(matches!(result, Err(MediaError::EmptyConcat)));
        assert!(!list.exists());
    }

    #[test]
    fn test_concat_command_shape() {
        let settings = RenderSettings::default();
        let args = build_concat_command(Path::new("/w/list.txt"), Path::new("/w/out.mp4"), &settings)
            .build_args();
        let joined = args.join(" ");
        assert!(joined.contains("-f concat -safe 0 -i /w/list.txt"));
        assert!(joined.contains("-r 24"));
        assert!(joined.contains("-movflags +faststart"));
        assert_eq!(args.last().unwrap(), "/w/out.mp4");
    }
}
