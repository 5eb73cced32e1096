//! Wire types exchanged with the auth service.
//!
//! Every response the service sends is a JSON object. The shapes we care
//! about are small:
//!
//! - a [`User`] record (opaque apart from its `_id`),
//! - the [`ServiceEnvelope`] returned by login-style strategy calls,
//! - the looser [`MethodReply`] view of any other strategy call,
//! - the [`StatusMessage`] returned by `GET /status` and pushed over the
//!   live socket.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// An authenticated identity as reported by the service.
///
/// The client never interprets a user: it stores and forwards it. The only
/// field it relies on is the stable `_id`. Everything else the service
/// sends (profile, strategy data, ...) is kept in `fields` so it survives a
/// decode/encode cycle untouched.
///
/// `#[serde(flatten)]` folds the unknown keys into the map instead of
/// rejecting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl User {
    /// Creates a user with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Returns an extra field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user {}", self.id)
    }
}

// ---------------------------------------------------------------------------
// ServiceEnvelope
// ---------------------------------------------------------------------------

/// The `status` field of a strategy response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Ok,
    Error,
    /// Any other string. Treated like `ok`.
    #[serde(other)]
    Other,
}

/// Response of `POST {base}/{strategy}/{method}`.
///
/// Strategies may return their own payloads, so every field is optional.
/// A missing `status` counts as success.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ServiceStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl ServiceEnvelope {
    /// Returns `true` when the service reported `status: "error"`.
    pub fn is_error(&self) -> bool {
        self.status == Some(ServiceStatus::Error)
    }

    /// Converts a service-reported error into [`ProtocolError::Service`].
    ///
    /// # Errors
    /// Returns the service message (or `"unknown error"` when the service
    /// sent none) if `status` is `"error"`.
    pub fn into_result(self) -> Result<Self, ProtocolError> {
        if self.is_error() {
            let message = self
                .message
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(ProtocolError::Service(message));
        }
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// MethodReply
// ---------------------------------------------------------------------------

/// Loose view of a free-form strategy response.
///
/// Only `status`, `message` and `user` are looked at, all as raw JSON, so
/// a payload with e.g. a numeric `token` or a `user` object lacking `_id`
/// still decodes. Whatever else the strategy sends is left to the caller.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MethodReply {
    #[serde(default)]
    pub status: Option<Value>,

    #[serde(default)]
    pub message: Option<Value>,

    #[serde(default)]
    pub user: Option<Value>,
}

impl MethodReply {
    /// Returns `true` when the service reported `status: "error"`.
    pub fn is_error(&self) -> bool {
        self.status.as_ref().and_then(Value::as_str) == Some("error")
    }

    /// Converts a service-reported error into [`ProtocolError::Service`].
    ///
    /// # Errors
    /// Same contract as [`ServiceEnvelope::into_result`]. A non-string
    /// message is rendered as JSON text.
    pub fn into_result(self) -> Result<Self, ProtocolError> {
        if self.is_error() {
            let message = match &self.message {
                Some(Value::String(m)) => m.clone(),
                Some(Value::Null) | None => "unknown error".to_string(),
                Some(other) => other.to_string(),
            };
            return Err(ProtocolError::Service(message));
        }
        Ok(self)
    }

    /// The `user` field as a [`User`]. Absent and `null` both give `None`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if a non-null `user` is not a
    /// valid user record.
    pub fn user(&self) -> Result<Option<User>, ProtocolError> {
        match &self.user {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => User::deserialize(raw)
                .map(Some)
                .map_err(ProtocolError::Decode),
        }
    }
}

// ---------------------------------------------------------------------------
// StatusMessage
// ---------------------------------------------------------------------------

/// Session status: `{"user": User | null}`.
///
/// Used for both the `GET /status` response and every push-channel frame.
/// A missing `user` key decodes as "no user".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusMessage {
    #[serde(default)]
    pub user: Option<User>,
}
