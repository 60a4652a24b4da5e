//! Streaming responses awaiting a decode session

use std::marker::PhantomData;
use std::time::Duration;

use reqwest::Response;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::Result;
use crate::streaming::{Framing, StreamMessage, StreamOptions, StreamSession};

/// A successful response whose body is a continuous stream of `M`
///
/// Nothing is read from the body until [`open`](Self::open) is called.
#[derive(Debug)]
pub struct StreamResponse<M> {
    response: Response,
    framing: Framing,
    max_frame_len: usize,
    timeout: Option<Duration>,
    _message: PhantomData<fn() -> M>,
}

impl<M: StreamMessage> StreamResponse<M> {
    pub(crate) fn new(
        response: Response,
        framing: Framing,
        max_frame_len: usize,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            response,
            framing,
            max_frame_len,
            timeout,
            _message: PhantomData,
        }
    }

    /// HTTP status of the response
    pub fn status(&self) -> reqwest::StatusCode {
        self.response.status()
    }

    /// Framing the body will be decoded with
    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Start decoding the body
    pub fn open(self) -> Result<StreamSession<M>> {
        self.open_with_cancel(CancellationToken::new())
    }

    /// Start decoding the body, cancelling when `cancel` fires
    pub fn open_with_cancel(self, cancel: CancellationToken) -> Result<StreamSession<M>> {
        debug!("Decoding {} body from {}", self.framing, self.response.url());

        let options = StreamOptions {
            max_frame_len: self.max_frame_len,
            cancel,
        };
        let body = Box::pin(self.response.bytes_stream());
        let session = StreamSession::open_with(body, self.framing, options)?;
        if let Some(timeout) = self.timeout {
            session.cancel_after(timeout);
        }
        Ok(session)
    }
}
