//! Error types for ytmash-core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MashupError>;

#[derive(Error, Debug)]
pub enum MashupError {
    #[error("Invalid request: {0}")]
    Usage(#[from] UsageError),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Assembly failed: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejected before any network access; the pipeline never starts.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UsageError {
    #[error("singer name must not be empty")]
    EmptySingerName,

    #[error("number of videos must be greater than 10 (got {0})")]
    TooFewVideos(u32),

    #[error("audio duration must be at least 20 seconds (got {0})")]
    OffsetTooShort(u32),

    #[error("not a valid email address: {0}")]
    InvalidEmail(String),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("yt-dlp not found. Install with: brew install yt-dlp")]
    YtDlpNotFound,

    #[error("yt-dlp search failed with exit code: {0:?}")]
    SearchFailed(Option<i32>),

    #[error("search found {found} videos, {requested} requested")]
    NotEnoughResults { requested: usize, found: usize },

    #[error("yt-dlp download failed with exit code: {0:?}")]
    YtDlpFailed(Option<i32>),

    #[error("video unavailable or private: {0}")]
    VideoUnavailable(String),

    #[error("no media file found for video {0}")]
    MissingMediaFile(String),

    #[error("failed to parse search metadata: {0}")]
    MetadataParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("FFmpeg not found. Install with: brew install ffmpeg")]
    FfmpegNotFound,

    #[error("ffmpeg failed with exit code: {0:?}")]
    FfmpegFailed(Option<i32>),

    #[error("could not determine duration of {0}")]
    UnknownDuration(String),

    #[error("source audio of \"{title}\" is {duration:.1}s, not longer than the {offset}s trim offset")]
    SourceTooShort {
        title: String,
        duration: f64,
        offset: u32,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("no clips to assemble")]
    NoClips,

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("ffmpeg concat failed with exit code: {0:?}")]
    FfmpegFailed(Option<i32>),

    #[error("output file was not created: {0}")]
    MissingOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Email delivery failures (web entry point only). Non-fatal to the
/// artifact: the mashup stays on disk for a manual retry.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("SMTP is not configured; set [smtp] host and from in config.toml")]
    SmtpNotConfigured,

    #[error("invalid sender address: {0}")]
    InvalidSender(String),

    #[error("failed to read mashup for attachment: {0}")]
    AttachmentRead(#[from] std::io::Error),

    #[error("failed to build message: {0}")]
    MessageBuild(String),

    #[error("SMTP send failed: {0}")]
    SendFailed(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
