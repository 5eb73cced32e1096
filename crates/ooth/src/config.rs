//! Client configuration.
//!
//! Configuration is fixed for the client's lifetime. Standalone mode is
//! modelled as `Option<StandaloneConfig>`, so "standalone without both
//! secondary URLs" cannot be represented once a config is built.

use ooth_protocol::Url;
use ooth_protocol::urls::normalize_base;

/// Environment variable holding the auth service base URL.
pub const ENV_URL: &str = "OOTH_URL";
/// Environment variable enabling standalone mode (`1`, `true`, `yes`, `on`).
pub const ENV_STANDALONE: &str = "OOTH_STANDALONE";
/// Environment variable holding the secondary API login URL.
pub const ENV_API_LOGIN_URL: &str = "OOTH_API_LOGIN_URL";
/// Environment variable holding the secondary API logout URL.
pub const ENV_API_LOGOUT_URL: &str = "OOTH_API_LOGOUT_URL";

/// Errors raised while building a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    /// A URL failed to parse or uses an unsupported scheme.
    #[error("invalid {field}: {reason}")]
    InvalidUrl { field: &'static str, reason: String },

    /// Standalone mode was requested without both secondary URLs.
    #[error("standalone mode requires both api login and api logout urls")]
    IncompleteStandalone,
}

// ---------------------------------------------------------------------------
// StandaloneConfig
// ---------------------------------------------------------------------------

/// The secondary API that mirrors session state in standalone mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandaloneConfig {
    /// Receives `Authorization: JWT {token}` after every login.
    pub api_login_url: Url,
    /// Receives a bare `POST` on every logout.
    pub api_logout_url: Url,
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Immutable configuration of an [`OothClient`](crate::OothClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the auth service.
    pub base_url: Url,
    /// `Some` in standalone mode.
    pub standalone: Option<StandaloneConfig>,
}

impl ClientConfig {
    /// Non-standalone config for `base_url`.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidUrl`] if the URL is not `http(s)`.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Self::builder(base_url).build()
    }

    /// Starts a builder.
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            base_url: base_url.into(),
            standalone: false,
            api_login_url: None,
            api_logout_url: None,
        }
    }

    /// Returns `true` in standalone mode.
    pub fn is_standalone(&self) -> bool {
        self.standalone.is_some()
    }

    /// Reads the config from `OOTH_*` environment variables.
    ///
    /// # Errors
    /// - [`ConfigError::MissingVar`] if `OOTH_URL` is unset
    /// - [`ConfigError::IncompleteStandalone`] if standalone is on but a
    ///   secondary URL is unset
    /// - [`ConfigError::InvalidUrl`] for malformed URLs
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_URL).ok_or(ConfigError::MissingVar(ENV_URL))?;
        let standalone = lookup(ENV_STANDALONE).is_some_and(|v| is_truthy(&v));

        let mut builder = Self::builder(base_url);
        builder.standalone = standalone;
        builder.api_login_url = lookup(ENV_API_LOGIN_URL);
        builder.api_logout_url = lookup(ENV_API_LOGOUT_URL);
        builder.build()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    normalize_base(raw).map_err(|e| ConfigError::InvalidUrl {
        field,
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// ClientConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for [`ClientConfig`].
///
/// ```rust
/// use ooth::ClientConfig;
///
/// let config = ClientConfig::builder("https://auth.example.com")
///     .standalone("https://api.example.com/login", "https://api.example.com/logout")
///     .build()
///     .unwrap();
/// assert!(config.is_standalone());
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    base_url: String,
    standalone: bool,
    api_login_url: Option<String>,
    api_logout_url: Option<String>,
}

impl ClientConfigBuilder {
    /// Enables standalone mode with both secondary URLs.
    pub fn standalone(
        mut self,
        api_login_url: impl Into<String>,
        api_logout_url: impl Into<String>,
    ) -> Self {
        self.standalone = true;
        self.api_login_url = Some(api_login_url.into());
        self.api_logout_url = Some(api_logout_url.into());
        self
    }

    /// Validates and builds the config.
    ///
    /// Secondary URLs are ignored unless standalone mode is on.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base_url = parse_url("base url", &self.base_url)?;

        let standalone = if self.standalone {
            let (Some(login), Some(logout)) = (self.api_login_url, self.api_logout_url) else {
                return Err(ConfigError::IncompleteStandalone);
            };
            Some(StandaloneConfig {
                api_login_url: parse_url("api login url", &login)?,
                api_logout_url: parse_url("api logout url", &logout)?,
            })
        } else {
            None
        };

        Ok(ClientConfig {
            base_url,
            standalone,
        })
    }
}
