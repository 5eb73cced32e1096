//! Session state for the Ooth client.
//!
//! This crate holds the one piece of shared mutable state the client has:
//! the current user.
//!
//! 1. **Subject**: a latest-value holder with ordered fan-out
//!    ([`Subject`], [`Subscription`])
//! 2. **Session state**: the lazily created current-user holder
//!    ([`SessionState`])
//! 3. **Lifecycle**: the "started" flag that makes startup run once
//!    ([`Lifecycle`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Client facade (above)  ← writes call results, exposes the observable
//!     ↕
//! Session layer (this crate)  ← holds the current user, notifies observers
//!     ↕
//! Protocol layer (below)  ← provides the User type
//! ```

mod state;
mod subject;

pub use state::{Lifecycle, SessionPhase, SessionState, UserSubject};
pub use subject::{Subject, Subscription};
