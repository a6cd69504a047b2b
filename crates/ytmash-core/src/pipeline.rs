//! Pipeline orchestration: search, download, trim, assemble

use crate::assembler::Assembler;
use crate::config::{PathsConfig, TempConfig};
use crate::error::{ConversionError, MashupError};
use crate::extractor::Extractor;
use crate::fetcher::{Fetcher, VideoEntry};
use crate::request::MashupRequest;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub request: MashupRequest,
    pub output_path: PathBuf,
    pub keep_temp: bool,
    pub paths: PathsConfig,
    pub temp: TempConfig,
}

/// Pipeline progress stages
#[derive(Debug, Clone)]
pub enum PipelineStage {
    Searching { term: String, count: u32 },
    Downloading { index: usize, total: usize, title: String },
    Trimming { index: usize, total: usize, title: String },
    Assembling { clip_count: usize },
    Complete { output: PathBuf, elapsed: Duration },
    Failed { stage: String, error: String },
}

/// Main processing pipeline: one run per invocation, strictly sequential.
pub struct Pipeline {
    config: PipelineConfig,
    progress_tx: mpsc::Sender<PipelineStage>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, progress_tx: mpsc::Sender<PipelineStage>) -> Self {
        Self {
            config,
            progress_tx,
        }
    }

    /// Run the pipeline to completion. Consumes the pipeline so the
    /// progress channel closes when the run ends, letting consumers drain
    /// and exit.
    pub async fn run(self) -> Result<PathBuf, MashupError> {
        // Per-run working directory, removed on drop
        let temp_dir = match self.config.temp.directory {
            Some(ref parent) => {
                tokio::fs::create_dir_all(parent).await?;
                tempfile::tempdir_in(parent)?
            }
            None => tempfile::tempdir()?,
        };
        let work_dir = temp_dir.path().to_path_buf();

        let result = self.run_stages(&work_dir).await;

        // keep_temp applies to failed runs too
        if self.config.keep_temp {
            std::mem::forget(temp_dir);
            debug!("Working files kept at: {}", work_dir.display());
        }

        result
    }

    async fn run_stages(&self, work_dir: &Path) -> Result<PathBuf, MashupError> {
        let start_time = Instant::now();
        let request = &self.config.request;

        info!(
            "Starting mashup run: {} x{} (trim {}s)",
            request.singer_name(),
            request.video_count(),
            request.clip_offset_secs()
        );
        debug!("Working directory: {}", work_dir.display());

        let yt_dlp_path = self.config.paths.yt_dlp_path()?;
        let ffmpeg_path = self.config.paths.ffmpeg_path()?;

        // 1. Search
        let _ = self
            .progress_tx
            .send(PipelineStage::Searching {
                term: request.singer_name().to_string(),
                count: request.video_count(),
            })
            .await;

        let fetcher = Fetcher::new(yt_dlp_path, work_dir.to_path_buf());
        let entries = fetcher
            .search(request.singer_name(), request.video_count() as usize)
            .await
            .map_err(|e| {
                let _ = self.progress_tx.try_send(PipelineStage::Failed {
                    stage: "search".to_string(),
                    error: e.to_string(),
                });
                e
            })?;

        check_entry_durations(&entries, request.clip_offset_secs()).map_err(|e| {
            let _ = self.progress_tx.try_send(PipelineStage::Failed {
                stage: "search".to_string(),
                error: e.to_string(),
            });
            e
        })?;

        // 2. Download, one video at a time, in search order
        let total = entries.len();
        let mut assets = Vec::with_capacity(total);
        for (index, entry) in entries.iter().enumerate() {
            let _ = self
                .progress_tx
                .send(PipelineStage::Downloading {
                    index: index + 1,
                    total,
                    title: entry.title.clone(),
                })
                .await;

            let asset = fetcher.download(entry).await.map_err(|e| {
                let _ = self.progress_tx.try_send(PipelineStage::Failed {
                    stage: "download".to_string(),
                    error: e.to_string(),
                });
                e
            })?;
            assets.push(asset);
        }

        // 3. Trim each clip, keeping download order
        let extractor = Extractor::new(ffmpeg_path.clone());
        let mut clips = Vec::with_capacity(total);
        for (index, asset) in assets.iter().enumerate() {
            let _ = self
                .progress_tx
                .send(PipelineStage::Trimming {
                    index: index + 1,
                    total,
                    title: asset.entry.title.clone(),
                })
                .await;

            let clip_path = work_dir.join(format!("clip_{:03}.mp3", index));
            let clip = extractor
                .extract(asset, request.clip_offset_secs(), &clip_path)
                .await
                .map_err(|e| {
                    let _ = self.progress_tx.try_send(PipelineStage::Failed {
                        stage: "trim".to_string(),
                        error: e.to_string(),
                    });
                    e
                })?;
            clips.push(clip);
        }

        // 4. Assemble
        let _ = self
            .progress_tx
            .send(PipelineStage::Assembling {
                clip_count: clips.len(),
            })
            .await;

        if let Some(parent) = self.config.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let assembler = Assembler::new(ffmpeg_path);
        assembler
            .assemble(&clips, &self.config.output_path, work_dir)
            .await
            .map_err(|e| {
                let _ = self.progress_tx.try_send(PipelineStage::Failed {
                    stage: "assemble".to_string(),
                    error: e.to_string(),
                });
                e
            })?;

        let elapsed = start_time.elapsed();
        info!(
            "Mashup complete: {} ({:.1}s)",
            self.config.output_path.display(),
            elapsed.as_secs_f32()
        );

        let _ = self
            .progress_tx
            .send(PipelineStage::Complete {
                output: self.config.output_path.clone(),
                elapsed,
            })
            .await;

        Ok(self.config.output_path.clone())
    }
}

/// Flat-playlist metadata carries durations for most entries. A source
/// that cannot yield a non-empty clip fails the run here, before its
/// download; entries without a duration are checked by the extractor
/// instead.
fn check_entry_durations(entries: &[VideoEntry], offset_secs: u32) -> Result<(), ConversionError> {
    for entry in entries {
        if let Some(duration) = entry.duration {
            if duration <= offset_secs as f64 {
                return Err(ConversionError::SourceTooShort {
                    title: entry.title.clone(),
                    duration,
                    offset: offset_secs,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, duration: Option<f64>) -> VideoEntry {
        VideoEntry {
            id: title.to_string(),
            title: title.to_string(),
            url: None,
            duration,
        }
    }

    #[test]
    fn test_short_search_duration_rejected_before_download() {
        let entries = [entry("Long Song", Some(213.0)), entry("Teaser", Some(15.0))];
        match check_entry_durations(&entries, 20) {
            Err(ConversionError::SourceTooShort { title, .. }) => assert_eq!(title, "Teaser"),
            other => panic!("expected SourceTooShort, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_search_durations_pass_through() {
        let entries = [entry("No Metadata", None), entry("Long Song", Some(213.0))];
        assert!(check_entry_durations(&entries, 20).is_ok());
    }

    fn failing_config(keep_temp: bool, parent: &Path) -> PipelineConfig {
        PipelineConfig {
            request: MashupRequest::new("Nina Simone", 11, 20).unwrap(),
            output_path: parent.join("mashup.mp3"),
            keep_temp,
            paths: PathsConfig {
                // Points at nothing, so the run fails at the search stage
                yt_dlp: Some(parent.join("missing-yt-dlp")),
                ffmpeg: Some(parent.join("missing-ffmpeg")),
            },
            temp: TempConfig {
                cleanup: true,
                directory: Some(parent.join("work")),
            },
        }
    }

    async fn run_failing_pipeline(keep_temp: bool, parent: &Path) -> Result<PathBuf, MashupError> {
        let (tx, mut rx) = mpsc::channel(32);
        let drain = tokio::spawn(async move { while rx.recv().await.is_some() {} });
        let result = Pipeline::new(failing_config(keep_temp, parent), tx).run().await;
        drain.await.unwrap();
        result
    }

    fn work_dir_count(parent: &Path) -> usize {
        std::fs::read_dir(parent.join("work"))
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_keep_temp_retains_work_dir_when_run_fails() {
        let parent = tempfile::tempdir().unwrap();
        let result = run_failing_pipeline(true, parent.path()).await;
        assert!(result.is_err());
        assert_eq!(work_dir_count(parent.path()), 1);
    }

    #[tokio::test]
    async fn test_failed_run_cleans_up_work_dir_by_default() {
        let parent = tempfile::tempdir().unwrap();
        let result = run_failing_pipeline(false, parent.path()).await;
        assert!(result.is_err());
        assert_eq!(work_dir_count(parent.path()), 0);
    }
}
