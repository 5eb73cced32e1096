//! Wire protocol for the Ooth client.
//!
//! This crate defines what the client and the auth service say to each
//! other:
//!
//! - **Types** ([`User`], [`ServiceEnvelope`], [`MethodReply`],
//!   [`StatusMessage`]): the
//!   JSON shapes on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those shapes are
//!   converted to/from bytes.
//! - **URLs** ([`urls`]): endpoint, push-socket and `Cookie` header
//!   derivation.
//! - **Errors** ([`ProtocolError`]): what can go wrong in between.
//!
//! ```text
//! Transport (bytes) → Protocol (envelopes) → Session (current user)
//! ```

mod codec;
mod error;
mod types;
pub mod urls;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{MethodReply, ServiceEnvelope, ServiceStatus, StatusMessage, User};
pub use url::Url;
