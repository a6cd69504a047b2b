//! ytmash-web library interface
//!
//! Exposes the router and state for integration testing

pub mod error;
pub mod mailer;
pub mod pages;
pub mod routes;

pub use crate::error::{PageError, PageResult};

use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use ytmash_core::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration (paths, temp policy, SMTP relay)
    pub config: Arc<Config>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::root_page))
        .route("/mashup", post(routes::submit_mashup))
        .route("/health", get(routes::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
