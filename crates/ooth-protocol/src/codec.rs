//! Codec trait and the JSON implementation.
//!
//! The client decodes three things: strategy envelopes, status messages
//! and push frames. All of them go through a [`Codec`], so the decoding
//! step is one seam rather than `serde_json` calls scattered through the
//! facade.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because the codec is shared with the push
/// task, which Tokio may run on any worker thread.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`). The auth service speaks
/// nothing else.
///
/// ## Example
///
/// ```rust
/// use ooth_protocol::{Codec, JsonCodec, StatusMessage, User};
///
/// let codec = JsonCodec;
/// let msg: StatusMessage = codec.decode(br#"{"user": {"_id": "u1"}}"#).unwrap();
/// assert_eq!(msg.user, Some(User::new("u1")));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
