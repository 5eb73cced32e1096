//! Transport abstraction layer for the Ooth client.
//!
//! Provides the two I/O seams the client is generic over:
//!
//! - [`HttpTransport`]: one request in, one response out. The client
//!   never talks to `reqwest` directly, so tests can swap in a recorder.
//! - [`PushConnector`] / [`PushConnection`]: the optional live socket
//!   the server uses to push session changes. Environments without
//!   socket support plug in [`NoPushChannel`].
//!
//! # Feature Flags
//!
//! - `http` (default): [`ReqwestTransport`] via `reqwest`
//! - `websocket` (default): [`WebSocketConnector`] via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

#[cfg(feature = "http")]
mod client;
mod error;
mod http;
mod push;
#[cfg(feature = "websocket")]
mod websocket;

#[cfg(feature = "http")]
pub use client::ReqwestTransport;
pub use error::TransportError;
pub use http::{Credentials, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use push::{NoConnection, NoPushChannel, PushConnection, PushConnector};
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketConnector};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for a push connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocates the next process-wide unique id.
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "push-{}", self.0)
    }
}
