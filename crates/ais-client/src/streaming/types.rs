//! Types for streaming sessions

use thiserror::Error;

/// Boxed error produced by the underlying byte stream
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a single frame could not be turned into a message
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Frame was not a valid JSON object for the expected shape
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Discriminator named a variant outside the known set
    #[error("unknown message type: {0}")]
    UnknownVariant(String),

    /// A single line exceeded the configured frame limit
    #[error("frame exceeds {limit} bytes")]
    FrameTooLarge { limit: usize },
}

/// Reason a stream session stopped
///
/// Exactly one of these is recorded per session. [`StreamError::EndOfStream`]
/// is a sentinel: the server closed the body without a fault.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The byte stream ended cleanly
    #[error("end of stream")]
    EndOfStream,

    /// Reading from the byte stream failed
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// A frame could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The session was cancelled before the stream ended
    #[error("stream cancelled")]
    Cancelled,

    /// The requested framing name is not supported
    #[error("unknown stream framing: {0}")]
    UnknownFraming(String),
}

impl StreamError {
    /// True for the clean end-of-stream sentinel
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }

    /// True when the session was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type for streaming operations
pub type StreamResult<T> = std::result::Result<T, StreamError>;
