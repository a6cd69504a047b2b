//! HTTP handlers: landing form, mashup submission, health check

use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use lettre::message::Mailbox;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;
use ytmash_core::error::UsageError;
use ytmash_core::pipeline::{Pipeline, PipelineConfig, PipelineStage};
use ytmash_core::MashupRequest;

use crate::error::{PageError, PageResult};
use crate::mailer::Mailer;
use crate::{pages, AppState};

/// Form fields as submitted from the landing page
#[derive(Debug, Deserialize)]
pub struct MashupForm {
    pub singer_name: String,
    pub video_count: u32,
    pub clip_offset: u32,
    pub email: String,
}

/// GET / - landing form
pub async fn root_page() -> impl IntoResponse {
    Html(pages::form_page(None))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "ytmash-web".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime.num_seconds().max(0) as u64,
    })
}

/// POST /mashup
///
/// Runs the whole pipeline inline, then attempts delivery. The response is
/// the outcome page, so the request blocks for the duration of the run. A
/// delivery failure still returns 200 with the retained artifact path; the
/// mashup exists even though the email did not go out.
pub async fn submit_mashup(
    State(state): State<AppState>,
    Form(form): Form<MashupForm>,
) -> PageResult<Response> {
    // All validation happens before any network access
    let request = MashupRequest::new(&form.singer_name, form.video_count, form.clip_offset)?;
    let recipient: Mailbox = form
        .email
        .trim()
        .parse()
        .map_err(|_| UsageError::InvalidEmail(form.email.trim().to_string()))?;

    let artifact_dir = &state.config.web.artifact_dir;
    tokio::fs::create_dir_all(artifact_dir).await?;
    // Random artifact name so concurrent submissions never collide
    let output_path = artifact_dir.join(format!("mashup-{}.mp3", Uuid::new_v4()));

    info!(
        singer = request.singer_name(),
        videos = request.video_count(),
        recipient = %recipient,
        "Mashup requested"
    );

    let pipeline_config = PipelineConfig {
        request: request.clone(),
        output_path,
        keep_temp: !state.config.temp.cleanup,
        paths: state.config.paths.clone(),
        temp: state.config.temp.clone(),
    };

    // Progress goes to the log; the browser only sees the outcome page
    let (progress_tx, mut progress_rx) = mpsc::channel(32);
    let drain = tokio::spawn(async move {
        while let Some(stage) = progress_rx.recv().await {
            match stage {
                PipelineStage::Searching { term, count } => {
                    info!("Searching YouTube for \"{}\" ({} videos)", term, count);
                }
                PipelineStage::Downloading { index, total, title } => {
                    info!("[{}/{}] Downloading: {}", index, total, title);
                }
                PipelineStage::Trimming { index, total, title } => {
                    info!("[{}/{}] Trimming: {}", index, total, title);
                }
                PipelineStage::Assembling { clip_count } => {
                    info!("Assembling {} clips", clip_count);
                }
                PipelineStage::Complete { output, elapsed } => {
                    info!(
                        "Mashup ready: {} ({:.1}s)",
                        output.display(),
                        elapsed.as_secs_f32()
                    );
                }
                PipelineStage::Failed { stage, error } => {
                    warn!("Pipeline failed during {}: {}", stage, error);
                }
            }
        }
    });

    let result = Pipeline::new(pipeline_config, progress_tx).run().await;
    drain
        .await
        .map_err(|e| PageError::Internal(e.to_string()))?;
    let output = result?;

    let mailer = Mailer::new(state.config.smtp.clone());
    match mailer
        .send_mashup(recipient.clone(), request.singer_name(), &output)
        .await
    {
        Ok(()) => Ok(Html(pages::success_page(
            request.singer_name(),
            &recipient.to_string(),
        ))
        .into_response()),
        Err(e) => {
            warn!("Delivery failed, mashup kept at {}: {}", output.display(), e);
            Ok(Html(pages::delivery_failed_page(&e.to_string(), &output)).into_response())
        }
    }
}
