//! Shared mocks for the client integration tests.
//!
//! `MockHttp` answers by exact URL and records every request.
//! `MockPush` hands out one scripted connection per connect attempt; the
//! test keeps a `PushHandle` to feed frames and count attempts.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ooth::ooth_transport::{
    ConnectionId, HttpRequest, HttpResponse, HttpTransport, PushConnection, PushConnector,
    TransportError,
};
use tokio::sync::mpsc;

pub const BASE: &str = "https://auth.example.com";
pub const API_LOGIN: &str = "https://api.example.com/login";
pub const API_LOGOUT: &str = "https://api.example.com/logout";

/// How long a test waits for something asynchronous before failing.
pub const WAIT: Duration = Duration::from_secs(2);

// =========================================================================
// MockHttp
// =========================================================================

#[derive(Clone)]
pub enum Reply {
    /// Status code and JSON body.
    Json(u16, String),
    /// The call itself fails.
    Fail,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Self::Json(200, body.to_string())
    }
}

#[derive(Default)]
struct HttpState {
    routes: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

#[derive(Clone, Default)]
pub struct MockHttp {
    state: Arc<HttpState>,
}

impl MockHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers requests to `url` with `reply`. Replaces any earlier route.
    pub fn route(&self, url: &str, reply: Reply) -> &Self {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert(url.to_string(), reply);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, url: &str) -> Vec<HttpRequest> {
        self.requests().into_iter().filter(|r| r.url == url).collect()
    }
}

impl HttpTransport for MockHttp {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let reply = self.state.routes.lock().unwrap().get(&request.url).cloned();
        let url = request.url.clone();
        self.state.requests.lock().unwrap().push(request);
        match reply {
            Some(Reply::Json(status, body)) => Ok(HttpResponse::new(status, body)),
            Some(Reply::Fail) => Err(TransportError::Request(format!("{url}: connection refused"))),
            None => Err(TransportError::Request(format!("{url}: no route"))),
        }
    }
}

// =========================================================================
// MockPush
// =========================================================================

pub type Frame = Result<Vec<u8>, TransportError>;

pub struct MockPush {
    fail: bool,
    attempts: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
    urls: mpsc::UnboundedSender<String>,
    frames: Mutex<Option<mpsc::UnboundedReceiver<Frame>>>,
}

/// The test's side of a [`MockPush`].
pub struct PushHandle {
    attempts: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
    urls: mpsc::UnboundedReceiver<String>,
    frames: mpsc::UnboundedSender<Frame>,
}

/// A push connector whose connection yields whatever the handle sends.
/// With `fail`, every connect attempt errors.
pub fn mock_push(fail: bool) -> (MockPush, PushHandle) {
    let attempts = Arc::new(AtomicUsize::new(0));
    let closed = Arc::new(AtomicBool::new(false));
    let (url_tx, url_rx) = mpsc::unbounded_channel();
    let (frame_tx, frame_rx) = mpsc::unbounded_channel();
    (
        MockPush {
            fail,
            attempts: Arc::clone(&attempts),
            closed: Arc::clone(&closed),
            urls: url_tx,
            frames: Mutex::new(Some(frame_rx)),
        },
        PushHandle {
            attempts,
            closed,
            urls: url_rx,
            frames: frame_tx,
        },
    )
}

impl PushHandle {
    /// Waits for the next connect attempt and returns its URL.
    pub async fn attempted(&mut self) -> String {
        tokio::time::timeout(WAIT, self.urls.recv())
            .await
            .expect("push connect should be attempted")
            .expect("connector alive")
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Waits until the client closes its connection.
    pub async fn closed(&self) {
        tokio::time::timeout(WAIT, async {
            while !self.closed.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("push connection should be closed");
    }

    pub fn push(&self, json: &str) {
        let _ = self.frames.send(Ok(json.as_bytes().to_vec()));
    }

    pub fn push_error(&self) {
        let _ = self
            .frames
            .send(Err(TransportError::ReceiveFailed("reset by peer".into())));
    }
}

impl PushConnector for MockPush {
    type Connection = MockConnection;

    async fn connect(&self, url: &str) -> Result<MockConnection, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let _ = self.urls.send(url.to_string());
        if self.fail {
            return Err(TransportError::ConnectFailed("refused".into()));
        }
        let frames = self
            .frames
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| TransportError::ConnectFailed("already connected".into()))?;
        Ok(MockConnection {
            id: ConnectionId::next(),
            frames,
            closed: Arc::clone(&self.closed),
        })
    }
}

pub struct MockConnection {
    id: ConnectionId,
    frames: mpsc::UnboundedReceiver<Frame>,
    closed: Arc<AtomicBool>,
}

impl PushConnection for MockConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn recv(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        match self.frames.recv().await {
            Some(Ok(bytes)) => Ok(Some(bytes)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.frames.close();
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

// =========================================================================
// Helpers
// =========================================================================

/// Receives the next observed value or fails after [`WAIT`].
pub async fn next<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("observer should receive a value")
        .expect("subject alive")
}
