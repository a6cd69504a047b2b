//! Configuration management for ytmash

use crate::error::ConfigError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub output: OutputConfig,
    pub temp: TempConfig,
    pub web: WebConfig,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to yt-dlp binary (auto-detected if not set)
    pub yt_dlp: Option<PathBuf>,
    /// Path to FFmpeg binary (auto-detected if not set)
    pub ffmpeg: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory CLI output paths resolve against
    pub default_directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TempConfig {
    /// Remove the per-run working directory after processing
    pub cleanup: bool,
    /// Custom parent for working directories (uses system temp if not set)
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Listen address for ytmash-web
    pub bind_addr: String,
    /// Directory where the web server keeps finished mashups
    pub artifact_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP relay host; delivery is reported as unconfigured when unset
    pub host: Option<String>,
    /// Submission port (STARTTLS)
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// From address for outgoing mail
    pub from: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                yt_dlp: None,
                ffmpeg: None,
            },
            output: OutputConfig {
                default_directory: PathBuf::from("."),
            },
            temp: TempConfig {
                cleanup: true,
                directory: None,
            },
            web: WebConfig {
                bind_addr: "127.0.0.1:5870".to_string(),
                artifact_dir: PathBuf::from("mashups"),
            },
            smtp: SmtpConfig {
                host: None,
                port: 587,
                username: None,
                password: None,
                from: None,
            },
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Load from default config directory
        if let Some(config_dir) = dirs::config_dir() {
            let default_config = config_dir.join("ytmash/config.toml");
            if default_config.exists() {
                figment = figment.merge(Toml::file(&default_config));
            }
        }

        // Load from specified config file
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment, e.g. YTMASH_SMTP__HOST
        figment = figment.merge(Env::prefixed("YTMASH_").split("__"));

        figment
            .extract()
            .map_err(|e| ConfigError::LoadError(e.to_string()))
    }
}

impl PathsConfig {
    /// Get yt-dlp path, auto-detecting if not configured
    pub fn yt_dlp_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.yt_dlp {
            Ok(path.clone())
        } else {
            which::which("yt-dlp")
                .map_err(|_| ConfigError::InvalidValue("yt-dlp not found in PATH".to_string()))
        }
    }

    /// Get FFmpeg path, auto-detecting if not configured
    pub fn ffmpeg_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.ffmpeg {
            Ok(path.clone())
        } else {
            which::which("ffmpeg")
                .map_err(|_| ConfigError::InvalidValue("ffmpeg not found in PATH".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.paths.yt_dlp.is_none());
        assert!(config.temp.cleanup);
        assert_eq!(config.smtp.port, 587);
        assert!(config.smtp.host.is_none());
        assert_eq!(config.web.bind_addr, "127.0.0.1:5870");
    }

    #[test]
    fn test_paths_prefer_configured_overrides() {
        let paths = PathsConfig {
            yt_dlp: Some(PathBuf::from("/opt/tools/yt-dlp")),
            ffmpeg: Some(PathBuf::from("/opt/tools/ffmpeg")),
        };
        // Configured paths win over PATH lookup, even if they do not exist
        assert_eq!(
            paths.yt_dlp_path().unwrap(),
            PathBuf::from("/opt/tools/yt-dlp")
        );
        assert_eq!(
            paths.ffmpeg_path().unwrap(),
            PathBuf::from("/opt/tools/ffmpeg")
        );
    }
}
