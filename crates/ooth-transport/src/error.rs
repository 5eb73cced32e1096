/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP call itself failed (unreachable host, TLS, body read).
    #[error("request failed: {0}")]
    Request(String),

    /// The underlying HTTP client could not be constructed.
    #[error("http client build failed: {0}")]
    ClientBuild(String),

    /// Opening the push socket failed.
    #[error("connect failed: {0}")]
    ConnectFailed(String),

    /// Receiving a push frame failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// The connection was closed.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// The runtime has no push socket support.
    #[error("push channel not supported in this environment")]
    Unsupported,
}
