//! Pages delivered as streaming bodies.

use std::io::Write;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use tracing::debug;
use trickle_core::{ProgressSequence, SampleContext};
use trickle_stream::{ChunkStream, spawn_producer};

use crate::views::{NAVIGATION_MENU, UNSTRUCTURED_DESCRIPTION, UNSTRUCTURED_TITLE};
use crate::{AppState, WebError};

pub const STREAMING_TEMPLATE: &str = "streaming_with_jinja.html";
pub const CONTENT_TEMPLATE: &str = "mystreamed_content.html";

/// Wrap a chunk stream as an HTML response body.
pub fn html_stream(stream: ChunkStream) -> Response {
    (
        [(CONTENT_TYPE, "text/html; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response()
}

/// GET /jinja
pub async fn jinja(State(state): State<AppState>) -> Result<Response, WebError> {
    debug!(units = state.delay.process_time, "streaming jinja page");
    let context = SampleContext::new(&state.delay);
    let stream = state.jinja.generate(STREAMING_TEMPLATE, context)?;
    Ok(html_stream(stream))
}

/// GET /mystreamed_content
pub async fn mystreamed_content(State(state): State<AppState>) -> Result<Response, WebError> {
    debug!(units = state.delay.content_process_time, "streaming content page");
    let context = SampleContext::for_content(&state.delay);
    let stream = state.jinja.generate(CONTENT_TEMPLATE, context)?;
    Ok(html_stream(stream))
}

/// GET /streaminghttpresponse
///
/// No template: the menu, title and description go out as-is, the
/// context contributes only its key names, and a second progress
/// sequence is written line by line with no markup in between. The
/// sequence inside the context is never iterated.
pub async fn unstructured(State(state): State<AppState>) -> Response {
    let delay = state.delay;
    debug!(units = delay.process_time, "streaming raw page");

    let stream = spawn_producer("unstructured", move |writer| -> std::io::Result<()> {
        let context = SampleContext::new(&delay);

        writer.write_all(NAVIGATION_MENU.as_bytes())?;
        writer.write_all(UNSTRUCTURED_TITLE.as_bytes())?;
        writer.write_all(UNSTRUCTURED_DESCRIPTION.as_bytes())?;
        for key in context.keys() {
            writer.write_all(key.as_bytes())?;
        }
        for line in ProgressSequence::new(delay.process_time, delay.unit) {
            writer.write_all(line.as_bytes())?;
        }
        Ok(())
    });

    html_stream(stream)
}
