use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ytmash")]
#[command(author, version, about = "Build a singer mashup from YouTube audio")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Singer or band to search for
    #[arg(value_name = "SINGER_NAME")]
    pub singer_name: Option<String>,

    /// Number of videos to fetch (must be greater than 10)
    #[arg(value_name = "VIDEO_COUNT")]
    pub video_count: Option<u32>,

    /// Seconds trimmed from the start of each clip (at least 20)
    #[arg(value_name = "CLIP_OFFSET")]
    pub clip_offset: Option<u32>,

    /// Output audio file, e.g. mashup.mp3
    #[arg(value_name = "OUTPUT_FILE")]
    pub output_file: Option<PathBuf>,

    /// Keep the per-run working directory (for debugging)
    #[arg(long)]
    pub keep_temp: bool,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that yt-dlp and ffmpeg are available
    Doctor,

    /// Show effective configuration
    Config,
}
