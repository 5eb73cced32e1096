//! [`HttpTransport`] implementation on top of `reqwest`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;

use crate::{Credentials, HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// HTTP transport backed by two `reqwest` clients sharing one config.
///
/// "Ambient credentials" are a cookie jar: requests with
/// [`Credentials::Include`] go through the jar-backed client, so session
/// cookies set by the auth service are stored and replayed.
/// [`Credentials::Omit`] requests use a jar-less client and carry only
/// the headers set on the request (e.g. an explicit `Cookie`).
#[derive(Clone)]
pub struct ReqwestTransport {
    with_jar: reqwest::Client,
    without_jar: reqwest::Client,
    jar: Arc<Jar>,
}

impl ReqwestTransport {
    /// Builds a transport with a fresh, empty cookie jar.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_jar(Arc::new(Jar::default()))
    }

    /// Builds a transport around an existing cookie jar.
    pub fn with_jar(jar: Arc<Jar>) -> Result<Self, TransportError> {
        let with_jar = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        let without_jar = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        Ok(Self {
            with_jar,
            without_jar,
            jar,
        })
    }

    /// The shared cookie jar used for credentialed requests.
    pub fn jar(&self) -> &Arc<Jar> {
        &self.jar
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let client = match request.credentials {
            Credentials::Include => &self.with_jar,
            Credentials::Omit => &self.without_jar,
        };
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        tracing::debug!(method = ?request.method, url = %request.url, "sending request");

        let mut builder = client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        tracing::debug!(status, url = %request.url, "request completed");
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
