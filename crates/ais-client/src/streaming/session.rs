//! Stream sessions and the background pump that feeds them

use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use futures::stream::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::framing::Framing;
use super::message::StreamMessage;
use super::reader::{FrameReader, DEFAULT_MAX_FRAME_LEN};
use super::types::{BoxError, StreamError, StreamResult};

/// Tuning for a stream session
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Largest accepted frame in bytes
    pub max_frame_len: usize,
    /// Parent token; cancelling it cancels the session
    pub cancel: CancellationToken,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            cancel: CancellationToken::new(),
        }
    }
}

/// Cloneable handle that cancels a session from anywhere
#[derive(Debug, Clone)]
pub struct CancelHandle(CancellationToken);

impl CancelHandle {
    /// Request shutdown of the session. Repeated calls have no further effect.
    pub fn cancel(&self) {
        self.0.cancel();
    }

    /// True once cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.0.is_cancelled()
    }
}

/// A live decode session over one response body
///
/// Messages are delivered in wire order until the session terminates. After
/// [`next`](Self::next) returns `None`, [`termination`](Self::termination)
/// reports why: [`StreamError::EndOfStream`] when the server closed the body
/// cleanly, otherwise the failure or [`StreamError::Cancelled`].
///
/// Dropping the session cancels it.
pub struct StreamSession<M> {
    framing: Framing,
    messages: mpsc::Receiver<M>,
    cancel: CancellationToken,
    termination: Arc<OnceLock<StreamError>>,
    closed: bool,
}

impl<M: StreamMessage> StreamSession<M> {
    /// Start decoding `body` with default options
    pub fn open<S, E>(body: S, framing: Framing) -> StreamResult<Self>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        Self::open_with(body, framing, StreamOptions::default())
    }

    /// Start decoding `body` with custom options
    ///
    /// Must be called from within a tokio runtime.
    pub fn open_with<S, E>(body: S, framing: Framing, options: StreamOptions) -> StreamResult<Self>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        let reader = FrameReader::with_max_frame_len(body, options.max_frame_len);
        let cancel = options.cancel.child_token();
        let termination = Arc::new(OnceLock::new());

        // Capacity 1 plus the reserve in `pump` makes every send a rendezvous
        let (tx, rx) = mpsc::channel(1);

        debug!("Opening {} stream session", framing);

        let pump_cancel = cancel.clone();
        let pump_termination = termination.clone();
        tokio::spawn(async move {
            let outcome = pump(reader, framing, &tx, &pump_cancel).await;
            match &outcome {
                StreamError::EndOfStream => debug!("Stream ended"),
                StreamError::Cancelled => debug!("Stream cancelled"),
                other => warn!("Stream failed: {}", other),
            }
            // Recorded before the channel closes so consumers always see it
            let _ = pump_termination.set(outcome);
            drop(tx);
        });

        Ok(Self {
            framing,
            messages: rx,
            cancel,
            termination,
            closed: false,
        })
    }

    /// Receive the next message
    ///
    /// Returns `None` once the session has terminated. Nothing is returned
    /// after cancellation, even a message that was already handed over.
    pub async fn next(&mut self) -> Option<M> {
        std::future::poll_fn(|cx| self.poll_message(cx)).await
    }
}

impl<M> StreamSession<M> {
    /// Framing this session decodes
    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Request shutdown. Safe to call any number of times.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Handle for cancelling the session from another task
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(self.cancel.clone())
    }

    /// Cancel the session once `timeout` has elapsed
    pub fn cancel_after(&self, timeout: Duration) {
        let token = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(timeout) => {
                    debug!("Stream deadline of {:?} reached", timeout);
                    token.cancel();
                }
                _ = token.cancelled() => {}
            }
        });
    }

    fn poll_message(&mut self, cx: &mut Context<'_>) -> Poll<Option<M>> {
        loop {
            match self.messages.poll_recv(cx) {
                Poll::Ready(Some(_)) if self.cancel.is_cancelled() => continue,
                Poll::Ready(None) => {
                    self.closed = true;
                    return Poll::Ready(None);
                }
                polled => return polled,
            }
        }
    }

    /// True once the message channel has been observed closed
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Why the session stopped
    ///
    /// `None` until the consumer has seen the end of the message sequence.
    pub fn termination(&self) -> Option<&StreamError> {
        if self.closed {
            self.termination.get()
        } else {
            None
        }
    }
}

impl<M> Stream for StreamSession<M> {
    type Item = M;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<M>> {
        self.get_mut().poll_message(cx)
    }
}

impl<M> Drop for StreamSession<M> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<M> std::fmt::Debug for StreamSession<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSession")
            .field("framing", &self.framing)
            .field("closed", &self.closed)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

/// Drive reader → decoder → channel until the session terminates
///
/// Owns the reader, so the body is released exactly once when this returns.
async fn pump<S, E, M>(
    mut reader: FrameReader<S>,
    framing: Framing,
    tx: &mpsc::Sender<M>,
    cancel: &CancellationToken,
) -> StreamError
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<BoxError>,
    M: StreamMessage,
{
    let mut delivered: u64 = 0;

    let outcome = loop {
        if cancel.is_cancelled() {
            break StreamError::Cancelled;
        }

        let frame = tokio::select! {
            biased;
            _ = cancel.cancelled() => break StreamError::Cancelled,
            frame = reader.next_frame() => frame,
        };

        let frame = match frame {
            Ok(Some(frame)) => frame,
            Ok(None) => break StreamError::EndOfStream,
            Err(e) => break e,
        };

        let message = match framing.decode::<M>(&frame) {
            Ok(Some(message)) => message,
            Ok(None) => continue,
            Err(e) => break StreamError::Decode(e),
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break StreamError::Cancelled,
            sent = tx.send(message) => {
                if sent.is_err() {
                    debug!("Stream consumer went away");
                    break StreamError::Cancelled;
                }
            }
        }

        // Hand-off completes only once the consumer has taken the message
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break StreamError::Cancelled,
            permit = tx.reserve() => {
                if permit.is_err() {
                    debug!("Stream consumer went away");
                    break StreamError::Cancelled;
                }
            }
        }
        delivered += 1;
    };

    drop(reader);
    debug!("Released stream body after {} message(s)", delivered);

    outcome
}
