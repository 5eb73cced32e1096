//! Error types for the protocol layer.
//!
//! Each crate in the workspace defines its own error enum. A
//! `ProtocolError` means the bytes arrived but did not make sense:
//! bad JSON, a bad URL, or the service itself saying "error".

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (malformed JSON, missing `_id`, wrong types).
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A configured or derived URL is unusable.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The service answered `{"status": "error", "message": ...}`.
    ///
    /// Displays as the bare service message so callers can show it as-is.
    #[error("{0}")]
    Service(String),
}
