//! Wire framings and per-frame decoding

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::bytes::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::message::StreamMessage;
use super::types::{DecodeError, StreamError};

/// `data:` line carrying exactly one JSON object
static SSE_DATA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^data:\s+(\{.*\})\s*$").expect("event-stream pattern is valid")
});

/// How messages are laid out in a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framing {
    /// One JSON object per line
    PlainObject,
    /// Server-Sent Events; objects arrive on `data:` lines
    EventStream,
}

impl Framing {
    /// Decode one frame
    ///
    /// `Ok(None)` means the frame carries no message and should be skipped.
    pub fn decode<M: StreamMessage>(self, frame: &[u8]) -> Result<Option<M>, DecodeError> {
        match self {
            Self::PlainObject => {
                if frame.iter().all(u8::is_ascii_whitespace) {
                    return Ok(None);
                }
                M::decode(frame).map(Some)
            }
            Self::EventStream => {
                if frame.is_empty() {
                    return Ok(None);
                }
                match SSE_DATA_LINE.captures(frame).and_then(|c| c.get(1)) {
                    Some(object) => M::decode(object.as_bytes()).map(Some),
                    None => {
                        trace!("skipping event-stream line ({} bytes)", frame.len());
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Value for the `Accept` header of a request using this framing
    pub fn accept(self) -> &'static str {
        match self {
            Self::PlainObject => "application/json",
            Self::EventStream => "text/event-stream",
        }
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlainObject => write!(f, "plain-object"),
            Self::EventStream => write!(f, "event-stream"),
        }
    }
}

impl FromStr for Framing {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "plain-object" | "json" | "ndjson" => Ok(Self::PlainObject),
            "sse" | "event-stream" => Ok(Self::EventStream),
            other => Err(StreamError::UnknownFraming(other.to_string())),
        }
    }
}
