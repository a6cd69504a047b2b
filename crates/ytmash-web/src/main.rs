//! ytmash-web - mashup form server
//!
//! Serves the request form, runs the pipeline per submission, and emails
//! the finished mashup.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use ytmash_core::Config;

use ytmash_web::mailer::Mailer;
use ytmash_web::{build_router, AppState};

#[derive(Parser)]
#[command(name = "ytmash-web")]
#[command(version, about = "Web front end for ytmash")]
struct Cli {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let filter = match cli.verbose {
        0 => "ytmash_web=info,ytmash_core=info,tower_http=warn",
        1 => "ytmash_web=debug,ytmash_core=debug,tower_http=debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let bind_addr = config.web.bind_addr.clone();

    info!("Starting ytmash-web v{}", env!("CARGO_PKG_VERSION"));

    tokio::fs::create_dir_all(&config.web.artifact_dir).await?;
    info!("Artifacts kept in {}", config.web.artifact_dir.display());

    if !Mailer::new(config.smtp.clone()).is_configured() {
        warn!("SMTP not configured; finished mashups will be kept on disk without email delivery");
    }

    let state = AppState::new(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
