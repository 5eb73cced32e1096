//! The push-socket capability: an injected "channel opener".
//!
//! Whether a runtime can hold a live socket open is a property of the
//! environment, not of the client. Instead of probing for it, the client
//! is handed a [`PushConnector`] at construction. Real deployments use
//! [`WebSocketConnector`](crate::WebSocketConnector); targets without
//! sockets use [`NoPushChannel`]; tests use a scripted mock.

use std::future::Future;

use crate::{ConnectionId, TransportError};

/// Opens push connections.
pub trait PushConnector: Send + Sync + 'static {
    /// The connection type produced by this connector.
    type Connection: PushConnection;

    /// Returns `false` when this environment cannot open sockets at all.
    ///
    /// The client skips the push channel entirely in that case and
    /// relies on HTTP status fetches alone.
    fn is_supported(&self) -> bool {
        true
    }

    /// Opens a connection to `url`.
    fn connect(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Self::Connection, TransportError>> + Send;
}

/// One open push connection. Receive-only: the server talks, we listen.
pub trait PushConnection: Send + 'static {
    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;

    /// Receives the next message payload.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    fn recv(
        &mut self,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, TransportError>> + Send;

    /// Closes the connection.
    fn close(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Connector for environments without socket support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPushChannel;

/// Connection type of [`NoPushChannel`]. Has no values.
#[derive(Debug)]
pub enum NoConnection {}

impl PushConnector for NoPushChannel {
    type Connection = NoConnection;

    fn is_supported(&self) -> bool {
        false
    }

    async fn connect(&self, _url: &str) -> Result<NoConnection, TransportError> {
        Err(TransportError::Unsupported)
    }
}

impl PushConnection for NoConnection {
    fn id(&self) -> ConnectionId {
        match *self {}
    }

    async fn recv(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        match *self {}
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_push_channel_is_unsupported() {
        let connector = NoPushChannel;
        assert!(!connector.is_supported());

        let result = connector.connect("ws://localhost/status").await;
        assert!(matches!(result, Err(TransportError::Unsupported)));
    }
}
