//! Error types for ytmash-web

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use ytmash_core::error::UsageError;
use ytmash_core::MashupError;

use crate::pages;

pub type PageResult<T> = std::result::Result<T, PageError>;

/// Errors a form submission surfaces as a page
#[derive(Debug, Error)]
pub enum PageError {
    /// Rejected input (400); re-renders the form with an inline message
    #[error("{0}")]
    Usage(#[from] UsageError),

    /// Pipeline failure (500); the run aborted with no mashup
    #[error("{0}")]
    Pipeline(#[from] MashupError),

    /// IO error (500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            PageError::Usage(ref err) => (
                StatusCode::BAD_REQUEST,
                pages::form_page(Some(&err.to_string())),
            ),
            PageError::Pipeline(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                pages::failure_page(&err.to_string()),
            ),
            PageError::Io(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                pages::failure_page(&err.to_string()),
            ),
            PageError::Internal(ref msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, pages::failure_page(msg))
            }
        };

        (status, Html(body)).into_response()
    }
}
