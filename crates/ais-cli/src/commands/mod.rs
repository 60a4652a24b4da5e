//! Command implementations for ais-cli

pub mod area;
pub mod decode;
pub mod latest;
pub mod stream;

pub use area::area;
pub use decode::decode;
pub use latest::latest;
pub use stream::{stream, StreamArgs};

use ais_client::streaming::StreamMessage;
use ais_client::{StreamError, StreamSession};
use anyhow::{anyhow, Result};

use crate::output::{OutputContext, Record};

/// Print messages from `session` until it terminates or `limit` is reached
///
/// Returns the number of messages printed. Decode and transport failures are
/// reported as errors; end of stream and cancellation are not.
pub(crate) async fn consume<M>(
    mut session: StreamSession<M>,
    limit: Option<usize>,
    ctx: &OutputContext,
) -> Result<usize>
where
    M: StreamMessage + Record,
{
    let mut count = 0;
    // Nothing is delivered once the session is cancelled
    while let Some(message) = session.next().await {
        ctx.print_streamed(&message);
        count += 1;
        if limit.is_some_and(|limit| count >= limit) {
            session.cancel();
        }
    }

    match session.termination() {
        Some(StreamError::EndOfStream) | None => {
            ctx.success(&format!("Stream ended after {} message(s)", count));
            Ok(count)
        }
        Some(StreamError::Cancelled) => {
            ctx.info(&format!("Stream stopped after {} message(s)", count));
            Ok(count)
        }
        Some(other) => {
            ctx.error(&format!("Stream failed: {}", other));
            Err(anyhow!("stream failed after {} message(s): {}", count, other))
        }
    }
}
