//! Clip concatenation using FFmpeg's concat demuxer

use crate::error::AssemblyError;
use crate::extractor::AudioClip;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Output container, selected by the destination's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Mp3,
    Flac,
    Wav,
    Aac,
    Opus,
}

impl OutputFormat {
    /// Map a destination path to a format; no extension defaults to MP3,
    /// an unrecognized one is an error.
    pub fn from_path(path: &Path) -> Result<Self, AssemblyError> {
        let Some(ext) = path.extension() else {
            return Ok(OutputFormat::Mp3);
        };
        match ext.to_string_lossy().to_lowercase().as_str() {
            "mp3" => Ok(OutputFormat::Mp3),
            "flac" => Ok(OutputFormat::Flac),
            "wav" => Ok(OutputFormat::Wav),
            "aac" | "m4a" => Ok(OutputFormat::Aac),
            "opus" => Ok(OutputFormat::Opus),
            other => Err(AssemblyError::UnsupportedFormat(other.to_string())),
        }
    }

    fn codec_args(&self) -> Vec<&'static str> {
        match self {
            // Clips are uniform MP3, so the mashup is a stream copy
            OutputFormat::Mp3 => vec!["-c", "copy"],
            OutputFormat::Flac => vec!["-c:a", "flac", "-compression_level", "12"],
            OutputFormat::Wav => vec!["-c:a", "pcm_s24le"],
            OutputFormat::Aac => vec!["-c:a", "aac", "-b:a", "256k"],
            OutputFormat::Opus => vec!["-c:a", "libopus", "-b:a", "192k"],
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Mp3 => write!(f, "MP3"),
            OutputFormat::Flac => write!(f, "FLAC"),
            OutputFormat::Wav => write!(f, "WAV"),
            OutputFormat::Aac => write!(f, "AAC"),
            OutputFormat::Opus => write!(f, "Opus"),
        }
    }
}

#[derive(Debug)]
pub struct Assembler {
    ffmpeg_path: PathBuf,
}

impl Assembler {
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self { ffmpeg_path }
    }

    /// Concatenate `clips` in order into `output`. No crossfade, no gain
    /// normalization; any unreadable clip fails the whole assembly.
    pub async fn assemble(
        &self,
        clips: &[AudioClip],
        output: &Path,
        work_dir: &Path,
    ) -> Result<(), AssemblyError> {
        if clips.is_empty() {
            return Err(AssemblyError::NoClips);
        }

        let format = OutputFormat::from_path(output)?;
        let list_path = work_dir.join("concat.txt");
        tokio::fs::write(&list_path, concat_list(clips)).await?;

        debug!("Track listing:\n{}", track_list(clips).trim_end());
        info!(
            "Concatenating {} clips into {} ({})",
            clips.len(),
            output.display(),
            format
        );

        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(["-hide_banner", "-loglevel", "error"]);
        cmd.args(["-f", "concat", "-safe", "0"]);
        cmd.arg("-i").arg(&list_path);

        for arg in format.codec_args() {
            cmd.arg(arg);
        }

        // Without an extension ffmpeg has no muxer to infer
        if output.extension().is_none() {
            cmd.args(["-f", "mp3"]);
        }

        cmd.arg("-y").arg(output);

        let status = cmd.status().await?;

        if !status.success() {
            // No partial artifacts: a failed concat must not leave output behind
            let _ = tokio::fs::remove_file(output).await;
            return Err(AssemblyError::FfmpegFailed(status.code()));
        }

        if !output.exists() {
            return Err(AssemblyError::MissingOutput(output.display().to_string()));
        }

        debug!("Assembled mashup: {}", output.display());
        Ok(())
    }
}

/// Build the concat demuxer list, one `file '...'` directive per clip in
/// input order. Single quotes inside a path need the '\'' escape.
fn concat_list(clips: &[AudioClip]) -> String {
    clips
        .iter()
        .map(|clip| format!("file '{}'\n", escape_concat_path(&clip.path)))
        .collect()
}

fn escape_concat_path(path: &Path) -> String {
    path.display().to_string().replace('\'', "'\\''")
}

/// One `Track NN: title` line per clip, in mashup order.
fn track_list(clips: &[AudioClip]) -> String {
    clips
        .iter()
        .enumerate()
        .map(|(index, clip)| format!("Track {:02}: {}\n", index + 1, clip.source_title))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(path: &str) -> AudioClip {
        AudioClip {
            path: PathBuf::from(path),
            source_title: path.to_string(),
        }
    }

    #[test]
    fn test_concat_list_preserves_order() {
        let clips = [clip("/tmp/clip_000.mp3"), clip("/tmp/clip_001.mp3")];
        let list = concat_list(&clips);
        assert_eq!(
            list,
            "file '/tmp/clip_000.mp3'\nfile '/tmp/clip_001.mp3'\n"
        );
    }

    #[test]
    fn test_concat_list_escapes_quotes() {
        let clips = [clip("/tmp/it's here.mp3")];
        assert_eq!(concat_list(&clips), "file '/tmp/it'\\''s here.mp3'\n");
    }

    #[test]
    fn test_track_list_names_sources_in_order() {
        let clips = [
            AudioClip {
                path: PathBuf::from("/tmp/clip_000.mp3"),
                source_title: "First Song".to_string(),
            },
            AudioClip {
                path: PathBuf::from("/tmp/clip_001.mp3"),
                source_title: "Second Song".to_string(),
            },
        ];
        assert_eq!(
            track_list(&clips),
            "Track 01: First Song\nTrack 02: Second Song\n"
        );
    }

    #[tokio::test]
    async fn test_assemble_rejects_empty_clip_list() {
        let assembler = Assembler::new(PathBuf::from("ffmpeg"));
        let work_dir = tempfile::tempdir().unwrap();
        let err = assembler
            .assemble(&[], Path::new("mashup.mp3"), work_dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, AssemblyError::NoClips));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            OutputFormat::from_path(Path::new("mashup.mp3")).unwrap(),
            OutputFormat::Mp3
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("out/mashup.FLAC")).unwrap(),
            OutputFormat::Flac
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("mashup")).unwrap(),
            OutputFormat::Mp3
        );
        assert!(matches!(
            OutputFormat::from_path(Path::new("mashup.xyz")),
            Err(AssemblyError::UnsupportedFormat(_))
        ));
    }
}
