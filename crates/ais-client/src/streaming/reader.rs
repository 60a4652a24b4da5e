//! Line-oriented frame reader
//!
//! Splits a chunked byte stream into newline-delimited frames without
//! buffering more than the frame currently being assembled.

use bytes::{Bytes, BytesMut};
use futures::stream::{Stream, StreamExt};
use tracing::trace;

use super::types::{BoxError, DecodeError, StreamError, StreamResult};

/// Default upper bound for a single frame (1 MiB)
pub const DEFAULT_MAX_FRAME_LEN: usize = 1024 * 1024;

/// Reads newline-terminated frames from a byte stream
#[derive(Debug)]
pub struct FrameReader<S> {
    /// The underlying byte stream (response body)
    stream: S,
    /// Partial frame plus the unconsumed tail of the last chunk
    buffer: BytesMut,
    /// Bytes of `buffer` already known to contain no newline
    scanned: usize,
    /// Largest frame accepted before failing
    max_frame_len: usize,
    /// Underlying stream returned `None`
    exhausted: bool,
}

impl<S, E> FrameReader<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<BoxError>,
{
    /// Create a reader with the default frame limit
    pub fn new(stream: S) -> Self {
        Self::with_max_frame_len(stream, DEFAULT_MAX_FRAME_LEN)
    }

    /// Create a reader with a custom frame limit
    pub fn with_max_frame_len(stream: S, max_frame_len: usize) -> Self {
        Self {
            stream,
            buffer: BytesMut::new(),
            scanned: 0,
            max_frame_len,
            exhausted: false,
        }
    }

    /// Read the next frame
    ///
    /// Returns `Ok(None)` once the stream has ended and every buffered byte
    /// has been handed out. A trailing region without a newline is returned
    /// as a final frame.
    pub async fn next_frame(&mut self) -> StreamResult<Option<Bytes>> {
        loop {
            if let Some(offset) = self.buffer[self.scanned..].iter().position(|&b| b == b'\n') {
                let pos = self.scanned + offset;
                let mut line = self.buffer.split_to(pos + 1);
                self.scanned = 0;

                // Drop the newline and an optional carriage return
                line.truncate(pos);
                if line.last() == Some(&b'\r') {
                    line.truncate(pos - 1);
                }
                return self.check_len(line).map(Some);
            }

            self.scanned = self.buffer.len();
            if self.buffer.len() > self.max_frame_len {
                return Err(DecodeError::FrameTooLarge {
                    limit: self.max_frame_len,
                }
                .into());
            }

            if self.exhausted {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let mut line = self.buffer.split();
                self.scanned = 0;
                if line.last() == Some(&b'\r') {
                    line.truncate(line.len() - 1);
                }
                return self.check_len(line).map(Some);
            }

            match self.stream.next().await {
                Some(Ok(chunk)) => {
                    trace!("read {} bytes", chunk.len());
                    self.buffer.extend_from_slice(&chunk);
                }
                Some(Err(e)) => return Err(StreamError::Transport(e.into())),
                None => self.exhausted = true,
            }
        }
    }

    fn check_len(&self, line: BytesMut) -> StreamResult<Bytes> {
        if line.len() > self.max_frame_len {
            return Err(DecodeError::FrameTooLarge {
                limit: self.max_frame_len,
            }
            .into());
        }
        Ok(line.freeze())
    }
}
