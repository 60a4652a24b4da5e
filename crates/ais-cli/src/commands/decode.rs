//! Decode command - replay a captured feed from disk

use std::path::Path;

use ais_client::streaming::{StreamMessage, StreamOptions};
use ais_client::{AisMessage, CombinedMessage, Framing, StreamSession};
use anyhow::{Context, Result};
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::consume;
use crate::output::{OutputContext, Record};
use crate::DecodeKind;

/// Decode a captured body with the same engine the live streams use
///
/// Returns the number of messages printed.
pub async fn decode(
    file: &Path,
    framing: Framing,
    kind: DecodeKind,
    limit: Option<usize>,
    max_frame_len: usize,
    shutdown: &CancellationToken,
    ctx: &OutputContext,
) -> Result<usize> {
    let options = StreamOptions {
        max_frame_len,
        cancel: shutdown.clone(),
    };

    match kind {
        DecodeKind::Ais => replay::<AisMessage>(file, framing, options, limit, ctx).await,
        DecodeKind::Combined => {
            replay::<CombinedMessage>(file, framing, options, limit, ctx).await
        }
        DecodeKind::Raw => replay::<serde_json::Value>(file, framing, options, limit, ctx).await,
    }
}

async fn replay<M>(
    file: &Path,
    framing: Framing,
    options: StreamOptions,
    limit: Option<usize>,
    ctx: &OutputContext,
) -> Result<usize>
where
    M: StreamMessage + Record,
{
    let input: Box<dyn AsyncRead + Send + Unpin> = if file == Path::new("-") {
        Box::new(tokio::io::stdin())
    } else {
        let handle = tokio::fs::File::open(file)
            .await
            .with_context(|| format!("Failed to open {}", file.display()))?;
        Box::new(handle)
    };
    debug!("Decoding {} as {}", file.display(), framing);

    let session = StreamSession::<M>::open_with(ReaderStream::new(input), framing, options)?;
    consume(session, limit, ctx).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use std::io::Write;

    fn quiet() -> OutputContext {
        OutputContext::new(OutputFormat::Json, true, true)
    }

    fn capture(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const SSE_CAPTURE: &str = concat!(
        ": hello\n",
        "event: message\n",
        "data: {\"mmsi\":1,\"msgtime\":\"2023-01-24T10:15:00Z\",\"name\":\"A\"}\n",
        "\n",
        "data: {\"type\":\"Feature\",\"geometry\":{\"type\":\"Point\",\"coordinates\":[5.3,60.4]},",
        "\"properties\":{\"mmsi\":2,\"msgtime\":\"2023-01-24T10:15:00Z\",\"eta\":\"01241800\"}}\n",
        "\n",
    );

    #[tokio::test]
    async fn test_decode_sse_capture() {
        let file = capture(SSE_CAPTURE);
        let count = decode(
            file.path(),
            Framing::EventStream,
            DecodeKind::Combined,
            None,
            1024,
            &CancellationToken::new(),
            &quiet(),
        )
        .await
        .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_decode_plain_with_limit() {
        let lines: String = (1..=10)
            .map(|i| format!("{{\"mmsi\":{},\"msgtime\":\"2023-01-24T10:15:00Z\"}}\n", i))
            .collect();
        let file = capture(&lines);
        let count = decode(
            file.path(),
            Framing::PlainObject,
            DecodeKind::Raw,
            Some(3),
            1024,
            &CancellationToken::new(),
            &quiet(),
        )
        .await
        .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_decode_failure_is_an_error() {
        let file = capture("{\"type\":\"Position\",\"mmsi\":1,\"msgtime\":\"2023-01-24T10:15:00Z\"}\nnot json\n");
        let result = decode(
            file.path(),
            Framing::PlainObject,
            DecodeKind::Ais,
            None,
            1024,
            &CancellationToken::new(),
            &quiet(),
        )
        .await;
        let message = result.unwrap_err().to_string();
        assert!(message.contains("after 1 message"), "{}", message);
    }

    #[tokio::test]
    async fn test_decode_interrupted() {
        let file = capture(SSE_CAPTURE);
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        let count = decode(
            file.path(),
            Framing::EventStream,
            DecodeKind::Combined,
            None,
            1024,
            &shutdown,
            &quiet(),
        )
        .await
        .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_decode_missing_file() {
        let result = decode(
            Path::new("/nonexistent/capture.ndjson"),
            Framing::PlainObject,
            DecodeKind::Raw,
            None,
            1024,
            &CancellationToken::new(),
            &quiet(),
        )
        .await;
        assert!(result.is_err());
    }
}
