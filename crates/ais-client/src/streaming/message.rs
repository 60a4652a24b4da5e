//! Decoding seam between the stream engine and the record types

use super::types::DecodeError;

/// A record that can be decoded from the bytes of one JSON object
///
/// Implementors own the variant dispatch: the engine only hands over the raw
/// object and delivers whatever comes back.
pub trait StreamMessage: Sized + Send + 'static {
    /// Decode a single JSON object
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError>;
}

/// Untyped passthrough, useful for capturing unfamiliar feeds
impl StreamMessage for serde_json::Value {
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
