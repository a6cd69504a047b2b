//! Audio extraction and trimming using FFmpeg

use crate::error::ConversionError;
use crate::fetcher::VideoAsset;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Extractor {
    ffmpeg_path: PathBuf,
}

/// A trimmed audio segment, ordered by download order.
#[derive(Debug)]
pub struct AudioClip {
    pub path: PathBuf,
    pub source_title: String,
}

impl Extractor {
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self { ffmpeg_path }
    }

    /// Extract the audio track of `asset`, drop the first `offset_secs`
    /// seconds, and encode the remainder as an MP3 clip at `clip_path`.
    ///
    /// Sources whose audio is not longer than the offset are rejected: the
    /// trimmed clip would be empty and the mashup invariant (one non-empty
    /// clip per video) could not hold.
    pub async fn extract(
        &self,
        asset: &VideoAsset,
        offset_secs: u32,
        clip_path: &Path,
    ) -> Result<AudioClip, ConversionError> {
        let duration = self.probe_duration(&asset.media_path).await?;
        if duration <= offset_secs as f64 {
            return Err(ConversionError::SourceTooShort {
                title: asset.entry.title.clone(),
                duration,
                offset: offset_secs,
            });
        }

        info!(
            "Trimming first {}s of \"{}\" ({:.1}s)",
            offset_secs, asset.entry.title, duration
        );

        let status = Command::new(&self.ffmpeg_path)
            .args([
                "-hide_banner",
                "-loglevel",
                "error",
                // Input seek: decode starts at the trim offset
                "-ss",
                &offset_secs.to_string(),
                "-i",
                asset.media_path.to_str().unwrap(),
                "-vn",
                "-c:a",
                "libmp3lame",
                "-b:a",
                "192k",
                "-y",
                clip_path.to_str().unwrap(),
            ])
            .status()
            .await
            .map_err(map_spawn_error)?;

        if !status.success() {
            return Err(ConversionError::FfmpegFailed(status.code()));
        }

        debug!("Wrote clip: {}", clip_path.display());
        Ok(AudioClip {
            path: clip_path.to_path_buf(),
            source_title: asset.entry.title.clone(),
        })
    }

    /// Read the source duration in seconds (FFmpeg prints it on stderr).
    pub async fn probe_duration(&self, input: &Path) -> Result<f64, ConversionError> {
        let output = Command::new(&self.ffmpeg_path)
            .args([
                "-hide_banner",
                "-i",
                input.to_str().unwrap(),
                "-f",
                "null",
                "-",
            ])
            .output()
            .await
            .map_err(map_spawn_error)?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        parse_duration(&stderr)
            .ok_or_else(|| ConversionError::UnknownDuration(input.display().to_string()))
    }
}

fn map_spawn_error(e: std::io::Error) -> ConversionError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ConversionError::FfmpegNotFound
    } else {
        ConversionError::Io(e)
    }
}

fn parse_duration(ffmpeg_output: &str) -> Option<f64> {
    // Look for pattern like "Duration: 00:03:45.12"
    let re = regex::Regex::new(r"Duration: (\d+):(\d+):(\d+)\.(\d+)").ok()?;
    let caps = re.captures(ffmpeg_output)?;

    let hours: f64 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: f64 = caps.get(2)?.as_str().parse().ok()?;
    let seconds: f64 = caps.get(3)?.as_str().parse().ok()?;
    let centiseconds: f64 = caps.get(4)?.as_str().parse().ok()?;

    Some(hours * 3600.0 + minutes * 60.0 + seconds + centiseconds / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        let stderr = "Input #0, matroska,webm, from 'x.webm':\n  Duration: 00:03:45.12, start: 0.0";
        let d = parse_duration(stderr).unwrap();
        assert!((d - 225.12).abs() < 0.001);
    }

    #[test]
    fn test_parse_duration_with_hours() {
        let d = parse_duration("Duration: 01:02:03.50").unwrap();
        assert!((d - 3723.5).abs() < 0.001);
    }

    #[test]
    fn test_parse_duration_missing() {
        assert!(parse_duration("no duration here").is_none());
    }
}
