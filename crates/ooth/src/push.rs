//! Push channel adapter: server-pushed session changes.
//!
//! The server sends `{"user": User | null}` on a socket at
//! `{ws|wss}://{host}{path}/status` whenever the session changes outside
//! this client (another tab logged out, the session expired, ...). Each
//! frame goes straight into [`SessionState::set_current`].
//!
//! Everything here is best-effort. A connector that can't open sockets,
//! a failed connect, a bad frame or a dropped socket is logged and
//! swallowed. There is no reconnect: that policy belongs to the
//! embedding application. Stopping the task closes the socket cleanly.

use std::sync::Arc;

use ooth_protocol::{Codec, StatusMessage};
use ooth_session::SessionState;
use ooth_transport::{PushConnection, PushConnector};
use tokio::sync::oneshot;

use crate::ChannelError;

/// Handle on a running push task.
#[derive(Debug)]
pub(crate) struct PushTask {
    shutdown: oneshot::Sender<()>,
}

impl PushTask {
    /// Asks the task to close its socket and exit.
    pub(crate) fn stop(self) {
        // The task may already be gone.
        let _ = self.shutdown.send(());
    }
}

/// Spawns the push task.
///
/// Returns `None` without spawning anything when the connector reports
/// that this environment has no socket support.
pub(crate) fn spawn<P, C>(
    connector: Arc<P>,
    url: String,
    state: Arc<SessionState>,
    codec: C,
) -> Option<PushTask>
where
    P: PushConnector,
    C: Codec,
{
    if !connector.is_supported() {
        tracing::debug!("push channel not supported, relying on status fetches");
        return None;
    }
    let (shutdown, stopped) = oneshot::channel();
    tokio::spawn(run(connector, url, state, codec, stopped));
    Some(PushTask { shutdown })
}

/// Connects, then feeds every frame into the session state until the
/// socket closes, errors or the task is stopped.
async fn run<P, C>(
    connector: Arc<P>,
    url: String,
    state: Arc<SessionState>,
    codec: C,
    mut stopped: oneshot::Receiver<()>,
) where
    P: PushConnector,
    C: Codec,
{
    let connected = tokio::select! {
        _ = &mut stopped => return,
        connected = connector.connect(&url) => connected,
    };
    let mut conn = match connected {
        Ok(conn) => conn,
        Err(e) => {
            let err = ChannelError::Connect(e);
            tracing::warn!(%url, error = %err, "push channel unavailable");
            return;
        }
    };

    let id = conn.id();
    tracing::info!(%id, %url, "push channel open");

    loop {
        tokio::select! {
            biased;

            _ = &mut stopped => {
                match conn.close().await {
                    Ok(()) => tracing::info!(%id, "push channel stopped"),
                    Err(e) => tracing::debug!(%id, error = %e, "push channel close failed"),
                }
                break;
            }

            received = conn.recv() => match received {
                Ok(Some(frame)) => match codec.decode::<StatusMessage>(&frame) {
                    Ok(msg) => {
                        tracing::debug!(%id, "push status received");
                        state.set_current(msg.user);
                    }
                    Err(e) => {
                        let err = ChannelError::Decode(e);
                        tracing::warn!(%id, error = %err, "skipping push frame");
                    }
                },
                Ok(None) => {
                    tracing::info!(%id, "push channel closed");
                    break;
                }
                Err(e) => {
                    let err = ChannelError::Receive(e);
                    tracing::error!(%id, error = %err, "push channel failed");
                    break;
                }
            },
        }
    }
}
