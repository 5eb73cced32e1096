//! Unified error type for the Ooth client.

use ooth_protocol::ProtocolError;
use ooth_transport::TransportError;

use crate::ConfigError;

/// Top-level error returned by every client operation.
///
/// When an operation fails, the current user is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum OothError {
    /// The service answered `{"status": "error", "message": ...}`.
    /// Displays as the bare service message.
    #[error("{0}")]
    Service(String),

    /// The HTTP call itself failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response could not be decoded (or a request could not be
    /// encoded).
    #[error(transparent)]
    Protocol(ProtocolError),

    /// The client configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<ProtocolError> for OothError {
    /// Lifts a service-reported error out of the protocol layer so callers
    /// can match on [`OothError::Service`] directly.
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Service(message) => Self::Service(message),
            other => Self::Protocol(other),
        }
    }
}

impl OothError {
    /// The service-supplied message, if this is a service error.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::Service(message) => Some(message),
            _ => None,
        }
    }
}

/// Failures of the live push channel.
///
/// Never returned to a caller: the push adapter logs them and carries
/// on (or stops quietly). HTTP-driven startup and mutations don't care.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The socket could not be opened.
    #[error("push channel connect failed: {0}")]
    Connect(TransportError),

    /// The socket errored after opening.
    #[error("push channel receive failed: {0}")]
    Receive(TransportError),

    /// A frame was not a valid status message.
    #[error("push channel frame rejected: {0}")]
    Decode(ProtocolError),
}
