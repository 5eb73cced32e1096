//! Standalone mode: mirroring session changes into a secondary API.
//!
//! After a login the secondary API is handed the service token as a
//! bearer credential; after a logout it gets a bare `POST`. Either call
//! failing produces a warning in the log and nothing else. The primary
//! result (the user set in the session state) is never rolled back.

use ooth_transport::{Credentials, HttpRequest, HttpTransport};

use crate::StandaloneConfig;

/// Outcome of one mirror call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MirrorOutcome {
    /// The secondary API answered 2xx.
    Mirrored,
    /// Nothing was sent (e.g. the service returned no token).
    Skipped,
    /// The call failed. Already logged as a warning.
    Failed(String),
}

/// Mirrors logins and logouts into the secondary API.
pub(crate) struct StandaloneMirror<'a, H> {
    http: &'a H,
    config: &'a StandaloneConfig,
}

impl<'a, H: HttpTransport> StandaloneMirror<'a, H> {
    pub(crate) fn new(http: &'a H, config: &'a StandaloneConfig) -> Self {
        Self { http, config }
    }

    /// `POST {api_login_url}` with `Authorization: JWT {token}`.
    pub(crate) async fn login(&self, token: Option<&str>) -> MirrorOutcome {
        let Some(token) = token else {
            tracing::warn!("service returned no token, skipping api login mirror");
            return MirrorOutcome::Skipped;
        };
        let request = HttpRequest::post(self.config.api_login_url.as_str())
            .header("Authorization", format!("JWT {token}"))
            .credentials(Credentials::Include);
        self.send("login", request).await
    }

    /// `POST {api_logout_url}`.
    pub(crate) async fn logout(&self) -> MirrorOutcome {
        let request = HttpRequest::post(self.config.api_logout_url.as_str())
            .credentials(Credentials::Include);
        self.send("logout", request).await
    }

    async fn send(&self, leg: &'static str, request: HttpRequest) -> MirrorOutcome {
        let url = request.url.clone();
        match self.http.send(request).await {
            Ok(response) if response.is_success() => {
                tracing::debug!(leg, %url, "api session mirrored");
                MirrorOutcome::Mirrored
            }
            Ok(response) => {
                let reason = format!("status {}", response.status);
                tracing::warn!(leg, %url, %reason, "api mirror rejected, continuing");
                MirrorOutcome::Failed(reason)
            }
            Err(e) => {
                tracing::warn!(leg, %url, error = %e, "api mirror failed, continuing");
                MirrorOutcome::Failed(e.to_string())
            }
        }
    }
}
