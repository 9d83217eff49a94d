use thiserror::Error;

/// Terminal item of a [`ChunkStream`](crate::ChunkStream).
///
/// Once a response has started streaming the HTTP layer can only abort
/// the body, so this is all the client-side error handling there is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("stream producer failed: {0}")]
    Producer(String),

    #[error("stream producer panicked")]
    Panicked,
}
