//! The client facade.
//!
//! Every public operation has the same shape: build a request, send it
//! through the [`HttpTransport`], decode the reply, and on success write
//! the resulting user into the [`SessionState`]. A failed call returns
//! its error and leaves the current user untouched.
//!
//! ```text
//! caller ──→ OothClient ──→ HttpTransport ──→ auth service
//!                 │
//!                 ▼
//!           SessionState ←── push task ←── PushConnector ←── auth service
//!                 │
//!                 ▼
//!             observers
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use ooth_protocol::urls::{cookie_header, endpoint, push_status_url};
use ooth_protocol::{Codec, JsonCodec, MethodReply, ServiceEnvelope, User};
use ooth_session::{Lifecycle, SessionState, UserSubject};
use ooth_transport::{
    Credentials, HttpRequest, HttpTransport, PushConnector, ReqwestTransport, WebSocketConnector,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::standalone::StandaloneMirror;
use crate::push::{self, PushTask};
use crate::{ClientConfig, OothError};

/// Client for a remote auth service.
///
/// Holds the single current-user value for this client instance. Share
/// it behind an `Arc` if several tasks need it; every method takes
/// `&self`.
///
/// # Example
///
/// ```rust,no_run
/// use ooth::prelude::*;
///
/// # async fn demo() -> Result<(), OothError> {
/// let client = OothClient::new(ClientConfig::new("https://auth.example.com")?)?;
/// let _watch = client.user().subscribe(|user| println!("user is now {user:?}"));
///
/// client.start().await?;
/// client
///     .authenticate("local", "login", Some(serde_json::json!({
///         "username": "alice",
///         "password": "hunter2",
///     })))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct OothClient<H = ReqwestTransport, P = WebSocketConnector> {
    config: ClientConfig,
    http: H,
    push: Arc<P>,
    codec: JsonCodec,
    state: Arc<SessionState>,
    lifecycle: Lifecycle,
    push_task: Mutex<Option<PushTask>>,
}

impl OothClient {
    /// Creates a client using `reqwest` for HTTP and WebSockets for push.
    ///
    /// # Errors
    /// Returns [`OothError::Transport`] if the HTTP client can't be built.
    pub fn new(config: ClientConfig) -> Result<Self, OothError> {
        Ok(Self::with_transports(
            config,
            ReqwestTransport::new()?,
            WebSocketConnector,
        ))
    }
}

impl<H, P> OothClient<H, P>
where
    H: HttpTransport,
    P: PushConnector,
{
    /// Creates a client with explicit transports.
    ///
    /// Pass [`NoPushChannel`](ooth_transport::NoPushChannel) as `push` in
    /// environments without socket support.
    pub fn with_transports(config: ClientConfig, http: H, push: P) -> Self {
        Self {
            config,
            http,
            push: Arc::new(push),
            codec: JsonCodec,
            state: Arc::new(SessionState::new()),
            lifecycle: Lifecycle::new(),
            push_task: Mutex::new(None),
        }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns `true` once [`start`](Self::start) has been called.
    pub fn is_started(&self) -> bool {
        self.lifecycle.is_started()
    }

    // -----------------------------------------------------------------------
    // Session state
    // -----------------------------------------------------------------------

    /// The observable current user.
    ///
    /// Created with "no user" on first access; the same holder is returned
    /// for the life of the client. Never touches the network.
    pub fn user(&self) -> Arc<UserSubject> {
        self.state.observable()
    }

    /// The latest known user, read synchronously.
    pub fn current(&self) -> Option<User> {
        self.state.current()
    }

    // -----------------------------------------------------------------------
    // Startup
    // -----------------------------------------------------------------------

    /// Initializes the client once, then just reads.
    ///
    /// The first call marks the client started, creates the user holder,
    /// opens the push channel (best-effort, in the background), fetches
    /// `GET /status` and stores the result. Later calls return the held
    /// user without any network activity.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// A failed status fetch is returned to the caller. The holder still
    /// exists (with "no user") and the push channel keeps running.
    pub async fn start(&self) -> Result<Option<User>, OothError> {
        if !self.lifecycle.begin() {
            return Ok(self.state.current());
        }

        tracing::info!(base_url = %self.config.base_url, "starting ooth client");
        self.state.observable();
        self.subscribe_status();
        self.status(None).await
    }

    fn subscribe_status(&self) {
        let url = push_status_url(&self.config.base_url);
        let task = push::spawn(Arc::clone(&self.push), url, Arc::clone(&self.state), self.codec);
        *self
            .push_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = task;
    }

    // -----------------------------------------------------------------------
    // Mutating operations
    // -----------------------------------------------------------------------

    /// Runs `POST {base}/{strategy}/{method}` and stores the returned user.
    ///
    /// In standalone mode the returned token is then handed to the
    /// secondary API as `Authorization: JWT {token}`. That leg is
    /// best-effort: its failure is logged and the user is stored anyway.
    ///
    /// # Errors
    /// - [`OothError::Service`] if the service reports `status: "error"`
    /// - [`OothError::Transport`] / [`OothError::Protocol`] if the call or
    ///   the decode fails
    pub async fn authenticate(
        &self,
        strategy: &str,
        method: &str,
        body: Option<Value>,
    ) -> Result<Option<User>, OothError> {
        let raw = self.call(strategy, method, body.as_ref()).await?;
        let envelope: ServiceEnvelope = self.codec.decode(&raw)?;
        let envelope = envelope.into_result()?;

        if let Some(standalone) = &self.config.standalone {
            StandaloneMirror::new(&self.http, standalone)
                .login(envelope.token.as_deref())
                .await;
        }

        tracing::info!(strategy, method, "authenticated");
        Ok(self.state.set_current(envelope.user))
    }

    /// Runs `POST {base}/{strategy}/{name}` for any other strategy call
    /// (profile updates, verification, password changes, ...).
    ///
    /// If the response carries a non-null `user`, it becomes the current
    /// user. The whole response is decoded into `T` and returned either
    /// way; use `serde_json::Value` for the raw object. Strategy payloads
    /// are free-form: a `user` that is not a valid record (no `_id`) is
    /// logged and left out of the session state, and other fields are
    /// never checked.
    ///
    /// # Errors
    /// Same as [`authenticate`](Self::authenticate). Nothing is stored
    /// unless the response also decodes into `T`.
    pub async fn method<T: DeserializeOwned>(
        &self,
        strategy: &str,
        name: &str,
        body: Option<Value>,
    ) -> Result<T, OothError> {
        let raw = self.call(strategy, name, body.as_ref()).await?;
        let reply: MethodReply = self.codec.decode(&raw)?;
        let reply = reply.into_result()?;
        let response: T = self.codec.decode(&raw)?;

        match reply.user() {
            Ok(Some(user)) => {
                self.state.set_current(Some(user));
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(strategy, method = name, error = %e, "ignoring malformed user in response");
            }
        }
        Ok(response)
    }

    /// Runs `POST {base}/logout`, then clears the current user.
    ///
    /// In standalone mode the secondary API logout is posted too. That
    /// leg is fire-and-forget: if it fails the user is still cleared.
    ///
    /// # Errors
    /// Only the primary call's transport failure is returned; in that case
    /// the user is NOT cleared.
    pub async fn logout(&self) -> Result<(), OothError> {
        let url = endpoint(&self.config.base_url, &["logout"]);
        self.http
            .send(HttpRequest::post(url).credentials(Credentials::Include))
            .await?;

        if let Some(standalone) = &self.config.standalone {
            StandaloneMirror::new(&self.http, standalone).logout().await;
        }

        tracing::info!("logged out");
        self.state.set_current(None);
        Ok(())
    }

    /// Fetches `GET {base}/status` and stores the result.
    ///
    /// - `Some(cookies)`: non-browser context. The pairs are sent as an
    ///   explicit `Cookie: k=v; k2=v2` header and the transport's own
    ///   cookie jar is NOT used.
    /// - `None`: ambient credentials (the cookie jar) go with the request
    ///   and no `Cookie` header is added.
    ///
    /// # Errors
    /// Transport, decode or service errors are returned; nothing is
    /// stored in that case.
    pub async fn status(&self, cookies: Option<&[(&str, &str)]>) -> Result<Option<User>, OothError> {
        let url = endpoint(&self.config.base_url, &["status"]);
        let request = match cookies {
            Some(pairs) => HttpRequest::get(url)
                .header("Cookie", cookie_header(pairs))
                .credentials(Credentials::Omit),
            None => HttpRequest::get(url).credentials(Credentials::Include),
        };

        let response = self.http.send(request).await?;
        let envelope: ServiceEnvelope = self.codec.decode(&response.body)?;
        let envelope = envelope.into_result()?;
        Ok(self.state.set_current(envelope.user))
    }

    /// Posts to a strategy endpoint and returns the raw response body.
    async fn call(
        &self,
        strategy: &str,
        method: &str,
        body: Option<&Value>,
    ) -> Result<Vec<u8>, OothError> {
        let url = endpoint(&self.config.base_url, &[strategy, method]);
        let mut request = HttpRequest::post(url).credentials(Credentials::Include);
        if let Some(body) = body {
            request = request.json_body(self.codec.encode(body)?);
        }

        let response = self.http.send(request).await?;
        if !response.is_success() {
            tracing::debug!(strategy, method, status = response.status, "non-2xx strategy response");
        }
        Ok(response.body)
    }
}

impl<H, P> Drop for OothClient<H, P> {
    fn drop(&mut self) {
        let task = self
            .push_task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.stop();
        }
    }
}
