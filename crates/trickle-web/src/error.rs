//! Handler error type.
//!
//! Nothing is recovered locally: every variant becomes a bare 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    #[error("jinja error: {0}")]
    Jinja(#[from] minijinja::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
