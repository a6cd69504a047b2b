//! Video search and download using yt-dlp

use crate::error::FetchError;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

// Some CDNs answer 403 to the default yt-dlp agent.
const USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";

#[derive(Debug)]
pub struct Fetcher {
    yt_dlp_path: PathBuf,
    work_dir: PathBuf,
}

/// One flat search hit, in yt-dlp relevance order.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

impl VideoEntry {
    /// URL to hand to yt-dlp; flat search entries carry one, otherwise
    /// rebuild it from the video id.
    pub fn download_url(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={}", self.id))
    }
}

/// A downloaded media file in the run's working directory.
#[derive(Debug)]
pub struct VideoAsset {
    pub entry: VideoEntry,
    pub media_path: PathBuf,
}

impl Fetcher {
    pub fn new(yt_dlp_path: PathBuf, work_dir: PathBuf) -> Self {
        Self {
            yt_dlp_path,
            work_dir,
        }
    }

    /// Search for exactly `count` videos matching `term`.
    ///
    /// Fewer results than requested is a hard failure; the pipeline never
    /// builds a partial mashup.
    pub async fn search(&self, term: &str, count: usize) -> Result<Vec<VideoEntry>, FetchError> {
        info!("Searching for {} videos matching \"{}\"", count, term);

        let expr = format!("ytsearch{}:{}", count, term);
        let output = Command::new(&self.yt_dlp_path)
            .args(["--flat-playlist", "--dump-json", "--no-warnings", &expr])
            .output()
            .await
            .map_err(map_spawn_error)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            return Err(FetchError::SearchFailed(output.status.code()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let entries = parse_search_output(&stdout, count)?;
        debug!("Search returned {} entries", entries.len());
        Ok(entries)
    }

    /// Download one video's media into the working directory.
    pub async fn download(&self, entry: &VideoEntry) -> Result<VideoAsset, FetchError> {
        info!("Downloading: {}", entry.title);

        let output_template = self.work_dir.join("%(id)s.%(ext)s");
        let url = entry.download_url();

        let output = Command::new(&self.yt_dlp_path)
            .args([
                // Audio-only stream where available
                "-f",
                "bestaudio/best",
                "--no-playlist",
                "--no-overwrites",
                "--no-warnings",
                "--user-agent",
                USER_AGENT,
                "-o",
                output_template.to_str().unwrap(),
                &url,
            ])
            .output()
            .await
            .map_err(map_spawn_error)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);

            if stderr.contains("Video unavailable") || stderr.contains("Private video") {
                return Err(FetchError::VideoUnavailable(entry.title.clone()));
            }

            return Err(FetchError::YtDlpFailed(output.status.code()));
        }

        let media_path = self.find_media_file(&entry.id)?;
        debug!("Downloaded to: {}", media_path.display());

        Ok(VideoAsset {
            entry: entry.clone(),
            media_path,
        })
    }

    fn find_media_file(&self, video_id: &str) -> Result<PathBuf, FetchError> {
        // Containers yt-dlp commonly produces for bestaudio
        let extensions = ["webm", "m4a", "opus", "mp4", "mkv", "mp3", "ogg", "aac"];

        for ext in extensions {
            let path = self.work_dir.join(format!("{}.{}", video_id, ext));
            if path.exists() {
                return Ok(path);
            }
        }

        Err(FetchError::MissingMediaFile(video_id.to_string()))
    }
}

fn map_spawn_error(e: std::io::Error) -> FetchError {
    if e.kind() == std::io::ErrorKind::NotFound {
        FetchError::YtDlpNotFound
    } else {
        FetchError::Io(e)
    }
}

/// Parse one JSON object per line of flat-playlist output, deduplicated by
/// video id with order preserved, and require at least `requested` entries.
fn parse_search_output(stdout: &str, requested: usize) -> Result<Vec<VideoEntry>, FetchError> {
    let mut entries: Vec<VideoEntry> = Vec::new();

    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        let entry: VideoEntry =
            serde_json::from_str(line).map_err(|e| FetchError::MetadataParse(e.to_string()))?;
        if !entries.iter().any(|e| e.id == entry.id) {
            entries.push(entry);
        }
    }

    if entries.len() < requested {
        return Err(FetchError::NotEnoughResults {
            requested,
            found: entries.len(),
        });
    }

    entries.truncate(requested);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_line(id: &str, title: &str) -> String {
        format!(
            r#"{{"id": "{}", "title": "{}", "url": "https://www.youtube.com/watch?v={}", "duration": 213.0}}"#,
            id, title, id
        )
    }

    #[test]
    fn test_parse_search_output_preserves_order() {
        let stdout = format!(
            "{}\n{}\n{}\n",
            entry_line("a1", "First"),
            entry_line("b2", "Second"),
            entry_line("c3", "Third"),
        );
        let entries = parse_search_output(&stdout, 3).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].title, "First");
        assert_eq!(entries[2].title, "Third");
    }

    #[test]
    fn test_parse_search_output_shortfall_is_an_error() {
        let stdout = format!("{}\n{}\n", entry_line("a1", "First"), entry_line("b2", "Second"));
        match parse_search_output(&stdout, 11) {
            Err(FetchError::NotEnoughResults { requested, found }) => {
                assert_eq!(requested, 11);
                assert_eq!(found, 2);
            }
            other => panic!("expected NotEnoughResults, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_output_dedups_by_id() {
        let stdout = format!("{}\n{}\n", entry_line("a1", "First"), entry_line("a1", "Repeat"));
        match parse_search_output(&stdout, 2) {
            Err(FetchError::NotEnoughResults { found, .. }) => assert_eq!(found, 1),
            other => panic!("expected NotEnoughResults, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_output_rejects_garbage() {
        assert!(matches!(
            parse_search_output("not json\n", 1),
            Err(FetchError::MetadataParse(_))
        ));
    }

    #[test]
    fn test_download_url_falls_back_to_id() {
        let entry = VideoEntry {
            id: "dQw4w9WgXcQ".to_string(),
            title: "A Song".to_string(),
            url: None,
            duration: None,
        };
        assert_eq!(
            entry.download_url(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }
}
