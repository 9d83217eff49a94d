//! Pages rendered with askama.
//!
//! Askama compiles templates into code that writes the whole page into a
//! `String`, so every value, including the slow progress sequence, is
//! evaluated before anything can be sent. `/naive` shows that wrapping
//! such a render in a streaming body does not help.

use std::io::Write;

use askama::Template;
use axum::extract::State;
use axum::response::{Html, Response};
use tracing::debug;
use trickle_core::SampleContext;
use trickle_stream::spawn_producer;

use crate::streaming::html_stream;
use crate::views::{BUFFERED_INTRO, ContextView, NAIVE_INTRO, PageIntro};
use crate::{AppState, WebError};

// ── Landing ─────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    active_page: &'static str,
}

pub async fn index() -> Result<Html<String>, WebError> {
    Ok(Html(IndexTemplate { active_page: "index" }.render()?))
}

// ── Buffered ────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "httpresponse.html")]
struct HttpResponseTemplate {
    active_page: &'static str,
    intro: PageIntro,
    context: ContextView,
}

pub async fn httpresponse(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let delay = state.delay;
    debug!(units = delay.process_time, "rendering buffered page");

    let html = tokio::task::spawn_blocking(move || {
        let context = SampleContext::new(&delay).drain();
        HttpResponseTemplate {
            active_page: "httpresponse",
            intro: BUFFERED_INTRO,
            context: context.into(),
        }
        .render()
    })
    .await??;

    Ok(Html(html))
}

// ── Naive streaming ─────────────────────────────────────────────

#[derive(Template)]
#[template(path = "naive.html")]
struct NaiveTemplate {
    active_page: &'static str,
    intro: PageIntro,
    context: ContextView,
}

pub async fn naive(State(state): State<AppState>) -> Response {
    let delay = state.delay;
    debug!(units = delay.process_time, "streaming eagerly rendered page");

    let stream = spawn_producer("naive", move |writer| -> Result<(), WebError> {
        // The render drains the progress sequence before returning.
        let html = NaiveTemplate {
            active_page: "naive",
            intro: NAIVE_INTRO,
            context: SampleContext::new(&delay).drain().into(),
        }
        .render()?;

        for line in html.split_inclusive('\n') {
            writer.write_all(line.as_bytes())?;
        }
        Ok(())
    });

    html_stream(stream)
}
