mod args;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::{Cli, Commands};

const USAGE: &str = "Usage: ytmash <SINGER_NAME> <VIDEO_COUNT> <CLIP_OFFSET> <OUTPUT_FILE>";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let filter = match cli.verbose {
        0 => "ytmash=info,ytmash_core=info",
        1 => "ytmash=debug,ytmash_core=debug",
        2 => "ytmash=trace,ytmash_core=trace",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Some(Commands::Doctor) => commands::doctor::run(cli.config.as_deref()).await,
        Some(Commands::Config) => commands::config::run(cli.config.as_deref()).await,
        None => {
            match (cli.singer_name, cli.video_count, cli.clip_offset, cli.output_file) {
                (Some(singer), Some(count), Some(offset), Some(output)) => {
                    commands::mashup::run(
                        &singer,
                        count,
                        offset,
                        &output,
                        cli.keep_temp,
                        cli.config.as_deref(),
                    )
                    .await
                }
                (None, None, None, None) => {
                    // No arguments, print help
                    use clap::CommandFactory;
                    Cli::command().print_help()?;
                    println!();
                    Ok(())
                }
                _ => {
                    eprintln!("{}", USAGE);
                    std::process::exit(2);
                }
            }
        }
    }
}
