//! Blocking producers feeding streaming response bodies.
//!
//! Template renderers and the simulated slow computation are plain
//! blocking code: they write into a `std::io::Write` and sleep between
//! writes. This crate bridges them to an async response body.
//!
//! # Streaming Model
//!
//! [`spawn_producer`] runs a closure on tokio's blocking pool and hands
//! it a [`ChunkWriter`]. Every `write` call becomes one chunk in a
//! bounded channel; the returned [`ChunkStream`] yields those chunks in
//! order and can be passed straight to `axum::body::Body::from_stream`.
//!
//! Nothing is buffered beyond the channel capacity. A slow client makes
//! the producer block on send; a vanished client makes the next write
//! fail with `BrokenPipe`, which ends the producer.

mod channel;
mod error;

pub use channel::{ChunkStream, ChunkWriter, DEFAULT_CHANNEL_CAPACITY, channel, spawn_producer};
pub use error::Error;
