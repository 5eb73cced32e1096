//! Session state: the client's single current-user holder and its
//! startup flag.
//!
//! ```text
//!   Uninitialized ──(first observable()/set_current())──→ Active
//! ```
//!
//! There is no way back: once the holder exists it lives as long as the
//! [`SessionState`]. Teardown belongs to whoever owns the client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use ooth_protocol::User;

use crate::Subject;

/// The observable current user. `None` means "no authenticated session".
pub type UserSubject = Subject<Option<User>>;

/// Lifecycle phase of a [`SessionState`] holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No holder has been constructed yet.
    Uninitialized,
    /// The holder exists and its value is mutable for the rest of the
    /// process.
    Active,
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Single source of truth for the current user.
///
/// Written by startup, by the mutating client calls and by the push
/// channel; read by any number of observers. All writes go through
/// [`set_current`](Self::set_current), which is an atomic
/// replace-and-notify on the underlying [`Subject`].
#[derive(Debug, Default)]
pub struct SessionState {
    subject: OnceLock<Arc<UserSubject>>,
}

impl SessionState {
    /// Creates an uninitialized session state. No holder yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the observable holder, creating it with "no user" on the
    /// first call. Every call returns the same holder.
    pub fn observable(&self) -> Arc<UserSubject> {
        Arc::clone(self.subject.get_or_init(|| {
            tracing::debug!("session state initialized");
            Arc::new(Subject::new(None))
        }))
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        if self.subject.get().is_some() {
            SessionPhase::Active
        } else {
            SessionPhase::Uninitialized
        }
    }

    /// Returns `true` once the holder exists.
    pub fn is_active(&self) -> bool {
        self.phase() == SessionPhase::Active
    }

    /// Replaces the current user and notifies every observer.
    ///
    /// Returns the value set. Creates the holder if nobody has asked for
    /// it yet, so a value set early is still there for later readers.
    pub fn set_current(&self, user: Option<User>) -> Option<User> {
        match &user {
            Some(u) => tracing::debug!(user_id = %u.id, "current user set"),
            None => tracing::debug!("current user cleared"),
        }
        self.observable().set(user)
    }

    /// The latest known user, read synchronously.
    pub fn current(&self) -> Option<User> {
        self.observable().get()
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// The "started" flag: `false` until the first startup, `true` forever
/// after.
#[derive(Debug, Default)]
pub struct Lifecycle {
    started: AtomicBool,
}

impl Lifecycle {
    /// Creates a not-yet-started lifecycle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the flag to started.
    ///
    /// Returns `true` for exactly one caller: the one that performed the
    /// flip. Concurrent callers race on a compare-exchange, so at most
    /// one ever runs full initialization.
    pub fn begin(&self) -> bool {
        self.started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Returns `true` once [`begin`](Self::begin) has succeeded.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }
}
