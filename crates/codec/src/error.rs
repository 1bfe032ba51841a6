//! The module contains the errors the codec can throw.

use thiserror::Error;

/// A failed stage of the transport pipeline.
///
/// Failures are deterministic functions of the input bytes; nothing here is
/// worth retrying. Decoding surfaces whichever stage rejected the payload
/// without partial results.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to serialize payload: {0}")]
    Serialize(String),
    #[error("failed to deserialize payload: {0}")]
    Deserialize(String),
    #[error("not a valid transport string: {0}")]
    Alphabet(String),
    #[error("compression failed: {0}")]
    Compress(#[source] std::io::Error),
    #[error("corrupt compressed stream: {0}")]
    Decompress(#[source] std::io::Error),
    #[error("compression task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
