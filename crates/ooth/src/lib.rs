//! # Ooth
//!
//! Client-side session synchronizer for a remote auth service.
//!
//! The client runs authentication calls against named strategies
//! (`local/login`, `local/register`, `google/login`, ...) and keeps ONE
//! current-user value in sync with the server, whether the change comes
//! from one of its own calls or from a server push (another tab logging
//! out, a session expiring).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ooth::prelude::*;
//!
//! # async fn demo() -> Result<(), OothError> {
//! let client = OothClient::new(ClientConfig::new("https://auth.example.com")?)?;
//! let mut updates = client.user().subscribe_channel();
//! client.start().await?;
//! while let Some(user) = updates.recv().await {
//!     println!("current user: {user:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! - [`ooth_transport`]: HTTP and push-socket I/O
//! - [`ooth_protocol`]: wire types, codec, URL derivation
//! - [`ooth_session`]: the observable current user
//! - this crate: configuration, the [`OothClient`] facade, the push
//!   adapter and standalone-mode mirroring

mod client;
mod config;
mod error;
mod push;
mod standalone;

pub use client::OothClient;
pub use config::{ClientConfig, ClientConfigBuilder, ConfigError, StandaloneConfig};
pub use error::{ChannelError, OothError};

pub use ooth_protocol;
pub use ooth_session;
pub use ooth_transport;

/// Everything an embedding application usually needs.
pub mod prelude {
    pub use crate::{ClientConfig, OothClient, OothError, StandaloneConfig};
    pub use ooth_protocol::User;
    pub use ooth_session::{Subscription, UserSubject};
    pub use ooth_transport::{NoPushChannel, ReqwestTransport, WebSocketConnector};
}
