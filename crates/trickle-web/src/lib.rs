//! trickle-web: axum routes comparing ways to deliver a slow page.
//!
//! Every page renders the same [`SampleContext`](trickle_core::SampleContext),
//! whose `mylongresponse` field is a blocking progress sequence. The
//! routes differ only in how the body reaches the client.
//!
//! # Routes
//!
//! | Route | Handler |
//! |---|---|
//! | `/` | Landing page |
//! | `/httpresponse`, `/simple_httpresponse` | Buffered askama render |
//! | `/streaminghttpresponse` | Raw stream, no template |
//! | `/naive` | Streamed body around an eager askama render |
//! | `/jinja` | Lazy minijinja render, flushed per progress line |
//! | `/mystreamed_content` | Lazy minijinja render of the long content page |

pub mod error;
pub mod jinja;
pub mod pages;
pub mod streaming;
pub mod views;

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::routing::get;
use tracing::debug;
use trickle_core::{ConfigResult, DelaySettings, TrickleConfig};

pub use error::WebError;
pub use jinja::JinjaRenderer;

/// Jinja templates shipped with this crate.
pub const DEFAULT_JINJA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/jinja");

/// Shared state for all handlers. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub delay: DelaySettings,
    pub jinja: Arc<JinjaRenderer>,
}

impl AppState {
    pub fn new(delay: DelaySettings, jinja: JinjaRenderer) -> Self {
        Self {
            delay,
            jinja: Arc::new(jinja),
        }
    }

    pub fn from_config(config: &TrickleConfig) -> ConfigResult<Self> {
        let delay = config.delay_settings()?;
        let dir = config.templates_dir(Path::new(DEFAULT_JINJA_DIR));
        Ok(Self::new(delay, JinjaRenderer::new(dir, config.trim_blocks())))
    }
}

/// Build the complete router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/httpresponse", get(pages::httpresponse))
        .route("/simple_httpresponse", get(pages::httpresponse))
        .route("/streaminghttpresponse", get(streaming::unstructured))
        .route("/naive", get(pages::naive))
        .route("/jinja", get(streaming::jinja))
        .route("/mystreamed_content", get(streaming::mystreamed_content))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, &'static str) {
    debug!(path = %uri.path(), "no route");
    (StatusCode::NOT_FOUND, "Not Found")
}
