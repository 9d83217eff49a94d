//! Chunk channel between a blocking producer and an async body.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_core::Stream;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::Error;

/// Chunks in flight before the producer blocks.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

type Item = Result<Bytes, Error>;

/// Blocking write half. Each `write` call is sent as one chunk.
///
/// Must only be used from a blocking context (a `spawn_blocking` task or
/// a plain thread); sending parks the thread while the channel is full.
pub struct ChunkWriter {
    tx: mpsc::Sender<Item>,
    chunks: usize,
    bytes: usize,
}

/// Async read half, yielding chunks in write order.
pub struct ChunkStream {
    rx: mpsc::Receiver<Item>,
}

/// Create a connected writer/stream pair.
pub fn channel(capacity: usize) -> (ChunkWriter, ChunkStream) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        ChunkWriter {
            tx,
            chunks: 0,
            bytes: 0,
        },
        ChunkStream { rx },
    )
}

impl ChunkWriter {
    /// Chunks sent so far.
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    /// Bytes sent so far.
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    /// `true` once the stream side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Send a terminal error to the stream side.
    pub fn fail(&mut self, err: Error) {
        // Nobody left to tell if the receiver is gone.
        let _ = self.tx.blocking_send(Err(err));
    }
}

impl io::Write for ChunkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.tx
            .blocking_send(Ok(Bytes::copy_from_slice(buf)))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "response body dropped"))?;
        self.chunks += 1;
        self.bytes += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Stream for ChunkStream {
    type Item = Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

/// Run `produce` on the blocking pool and stream what it writes.
///
/// The stream ends when `produce` returns. If it fails or panics while
/// the client is still connected, an [`Error`] becomes the final item so
/// the HTTP layer aborts the body instead of ending it cleanly.
///
/// Must be called from within a tokio runtime.
pub fn spawn_producer<F, E>(label: &'static str, produce: F) -> ChunkStream
where
    F: FnOnce(&mut ChunkWriter) -> Result<(), E> + Send + 'static,
    E: std::fmt::Display,
{
    let (mut writer, stream) = channel(DEFAULT_CHANNEL_CAPACITY);

    tokio::task::spawn_blocking(move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| produce(&mut writer)));
        match outcome {
            Ok(Ok(())) => {
                debug!(
                    stream = label,
                    chunks = writer.chunks,
                    bytes = writer.bytes,
                    "stream complete"
                );
            }
            Ok(Err(e)) if writer.is_closed() => {
                warn!(
                    stream = label,
                    chunks = writer.chunks,
                    error = %e,
                    "client disconnected mid-stream"
                );
            }
            Ok(Err(e)) => {
                error!(stream = label, error = %e, "stream producer failed");
                writer.fail(Error::Producer(e.to_string()));
            }
            Err(_) => {
                error!(stream = label, chunks = writer.chunks, "stream producer panicked");
                writer.fail(Error::Panicked);
            }
        }
    });

    stream
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::{Duration, Instant};

    use futures_util::StreamExt;

    #[tokio::test]
    async fn chunks_arrive_in_write_order() {
        let stream = spawn_producer("test", |w| -> io::Result<()> {
            w.write_all(b"alpha ")?;
            w.write_all(b"beta ")?;
            w.write_all(b"gamma")?;
            Ok(())
        });

        let chunks: Vec<Bytes> = stream.map(|c| c.unwrap()).collect().await;
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.concat(), b"alpha beta gamma");
    }

    #[tokio::test]
    async fn empty_writes_are_not_chunks() {
        let stream = spawn_producer("test", |w| -> io::Result<()> {
            w.write_all(b"")?;
            w.write_all(b"x")?;
            Ok(())
        });

        let chunks: Vec<_> = stream.collect().await;
        assert_eq!(chunks.len(), 1);
    }

    #[tokio::test]
    async fn producer_error_is_final_item() {
        let stream = spawn_producer("test", |w| {
            w.write_all(b"partial").map_err(|e| e.to_string())?;
            Err::<(), _>("template exploded".to_string())
        });

        let items: Vec<_> = stream.collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap().as_ref(), b"partial");
        assert_eq!(
            items[1],
            Err(Error::Producer("template exploded".to_string()))
        );
    }

    #[tokio::test]
    async fn first_chunk_does_not_wait_for_producer() {
        let start = Instant::now();
        let mut stream = spawn_producer("test", |w| -> io::Result<()> {
            w.write_all(b"head")?;
            std::thread::sleep(Duration::from_millis(300));
            w.write_all(b"tail")?;
            Ok(())
        });

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.as_ref(), b"head");
        assert!(start.elapsed() < Duration::from_millis(300));

        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(second.as_ref(), b"tail");
        assert!(start.elapsed() >= Duration::from_millis(300));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn producer_panic_aborts_the_stream() {
        let stream = spawn_producer("test", |w| -> io::Result<()> {
            w.write_all(b"before")?;
            panic!("renderer bug");
        });

        let items: Vec<_> = stream.collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], Err(Error::Panicked));
    }

    #[test]
    fn write_after_stream_dropped_is_broken_pipe() {
        let (mut writer, stream) = channel(1);
        drop(stream);
        assert!(writer.is_closed());

        let err = writer.write(b"nobody listening").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(writer.chunks(), 0);
    }

    #[test]
    fn writer_counts_chunks_and_bytes() {
        let (mut writer, _stream) = channel(4);
        writer.write_all(b"abc").unwrap();
        writer.write_all(b"de").unwrap();
        assert_eq!(writer.chunks(), 2);
        assert_eq!(writer.bytes(), 5);
    }
}
