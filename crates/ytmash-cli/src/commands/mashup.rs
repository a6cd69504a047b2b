use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::sync::mpsc;
use tracing::debug;

use ytmash_core::{
    config::Config,
    pipeline::{Pipeline, PipelineConfig, PipelineStage},
    MashupRequest,
};

use crate::USAGE;

pub async fn run(
    singer: &str,
    count: u32,
    offset: u32,
    output: &Path,
    keep_temp: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = Config::load(config_path)?;

    // Validated before anything touches the network
    let request = match MashupRequest::new(singer, count, offset) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let output_path = config.output.default_directory.join(output);
    debug!("Mashup will be written to {}", output_path.display());

    let pipeline_config = PipelineConfig {
        request,
        output_path,
        keep_temp: keep_temp || !config.temp.cleanup,
        paths: config.paths.clone(),
        temp: config.temp.clone(),
    };

    // Create progress channel
    let (tx, mut rx) = mpsc::channel(32);

    // Create progress bar
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {msg}",
        )?
        .progress_chars("=>-"),
    );

    // Spawn progress handler
    let progress_handle = tokio::spawn(async move {
        while let Some(stage) = rx.recv().await {
            match stage {
                PipelineStage::Searching { term, count } => {
                    pb.set_position(2);
                    pb.set_message(format!("Searching {} videos for {}", count, truncate(&term, 30)));
                }
                PipelineStage::Downloading { index, total, title } => {
                    pb.set_position(2 + (58 * index / total) as u64);
                    pb.set_message(format!(
                        "[{}/{}] Downloading: {}",
                        index,
                        total,
                        truncate(&title, 40)
                    ));
                }
                PipelineStage::Trimming { index, total, title } => {
                    pb.set_position(60 + (25 * index / total) as u64);
                    pb.set_message(format!(
                        "[{}/{}] Trimming: {}",
                        index,
                        total,
                        truncate(&title, 40)
                    ));
                }
                PipelineStage::Assembling { clip_count } => {
                    pb.set_position(90);
                    pb.set_message(format!("Concatenating {} clips...", clip_count));
                }
                PipelineStage::Complete { output, elapsed } => {
                    pb.set_position(100);
                    pb.finish_with_message(format!(
                        "Done: {} ({:.1}s)",
                        output.display(),
                        elapsed.as_secs_f32()
                    ));
                }
                PipelineStage::Failed { stage, error } => {
                    pb.abandon_with_message(format!("Failed at {}: {}", stage, error));
                }
            }
        }
    });

    // Run pipeline
    let pipeline = Pipeline::new(pipeline_config, tx);
    let result = pipeline.run().await;

    // Wait for progress handler
    progress_handle.await?;

    match result {
        Ok(output) => {
            println!("\nMashup: {}", output.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("\nError: {}", e);
            Err(e.into())
        }
    }
}

// Char-based so multibyte titles don't split mid-character
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
