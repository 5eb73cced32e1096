//! A latest-value holder with ordered fan-out to observers.
//!
//! [`Subject`] keeps exactly one current value. [`set`](Subject::set)
//! replaces it and notifies every registered observer before returning.
//! Fan-outs are serialized by a delivery lock, and each one works on the
//! observer list as it was when its value was stored. So if `set(a)`
//! returns before `set(b)` starts, every observer sees `a` before `b`.
//! Nothing is coalesced and nothing is dropped.
//!
//! Observers come in two flavours:
//!
//! - **Callbacks** ([`subscribe`](Subject::subscribe)) run synchronously
//!   inside `set`.
//! - **Channels** ([`subscribe_channel`](Subject::subscribe_channel))
//!   receive clones over an unbounded Tokio channel, for async consumers.
//!
//! New observers immediately receive the current value, then every later
//! one. They never see values replaced before they subscribed.
//!
//! # Re-entrancy
//!
//! Callbacks run with no state lock held. A callback may call
//! [`get`](Subject::get), subscribe other observers or drop its own
//! [`Subscription`]. It must not call [`set`](Subject::set) on the same
//! subject: the delivery lock is not re-entrant and that call would
//! deadlock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc;

type Callback<T> = Box<dyn FnMut(&T) + Send>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking callback leaves the value and the observer list
    // consistent, so poison is ignored.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One registered observer.
enum Observer<T> {
    Callback(Callback<T>),
    Channel(mpsc::UnboundedSender<T>),
}

impl<T: Clone> Observer<T> {
    /// Returns `false` once a channel's receiver is gone.
    fn deliver(&mut self, value: &T) -> bool {
        match self {
            Observer::Callback(cb) => {
                cb(value);
                true
            }
            Observer::Channel(tx) => tx.send(value.clone()).is_ok(),
        }
    }
}

struct Registration<T> {
    id: u64,
    active: AtomicBool,
    observer: Mutex<Observer<T>>,
}

struct State<T> {
    value: T,
    next_id: u64,
    /// In subscription order.
    observers: Vec<Arc<Registration<T>>>,
}

struct Shared<T> {
    /// Held for a whole fan-out.
    delivery: Mutex<()>,
    /// Held only briefly, never while an observer runs.
    state: Mutex<State<T>>,
}

impl<T> Shared<T> {
    fn remove(&self, ids: &[u64]) {
        let mut state = lock(&self.state);
        state.observers.retain(|reg| {
            let keep = !ids.contains(&reg.id);
            if !keep {
                reg.active.store(false, Ordering::Release);
            }
            keep
        });
    }
}

impl<T> State<T> {
    fn register(&mut self, observer: Observer<T>) -> Arc<Registration<T>> {
        let id = self.next_id;
        self.next_id += 1;
        let reg = Arc::new(Registration {
            id,
            active: AtomicBool::new(true),
            observer: Mutex::new(observer),
        });
        self.observers.push(Arc::clone(&reg));
        reg
    }
}

/// A value holder with subscribers.
///
/// Cloning a `Subject` is cheap and yields a handle to the SAME holder.
pub struct Subject<T> {
    inner: Arc<Shared<T>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + 'static> Subject<T> {
    /// Creates a subject holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Shared {
                delivery: Mutex::new(()),
                state: Mutex::new(State {
                    value: initial,
                    next_id: 0,
                    observers: Vec::new(),
                }),
            }),
        }
    }

    /// Returns a clone of the current value without subscribing.
    pub fn get(&self) -> T {
        lock(&self.inner.state).value.clone()
    }

    /// Replaces the current value and notifies every observer.
    ///
    /// Each observer receives exactly one notification per call. Returns
    /// the value that was set so callers can chain it as a result.
    pub fn set(&self, value: T) -> T {
        let _delivery = lock(&self.inner.delivery);
        let observers = {
            let mut state = lock(&self.inner.state);
            state.value = value.clone();
            state.observers.clone()
        };

        let mut gone = Vec::new();
        for reg in &observers {
            let mut observer = lock(&reg.observer);
            // Unsubscribed while an earlier observer ran.
            if !reg.active.load(Ordering::Acquire) {
                continue;
            }
            if !observer.deliver(&value) {
                gone.push(reg.id);
            }
        }
        if !gone.is_empty() {
            self.inner.remove(&gone);
        }
        value
    }

    /// Registers a callback.
    ///
    /// The callback is invoked right away with the current value, then
    /// once per later [`set`](Self::set). Dropping the returned
    /// [`Subscription`] unregisters it.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&T) + Send + 'static,
    {
        let mut state = lock(&self.inner.state);
        let reg = state.register(Observer::Callback(Box::new(callback)));
        // Taken before the state lock is released, so a concurrent `set`
        // waits for the replay before delivering anything newer.
        let mut observer = lock(&reg.observer);
        let current = state.value.clone();
        drop(state);

        observer.deliver(&current);
        drop(observer);
        Subscription::new(Arc::downgrade(&self.inner), reg.id)
    }

    /// Registers a channel observer and returns its receiving end.
    ///
    /// The first message is the current value. The registration is
    /// removed automatically once the receiver is dropped (on the next
    /// `set`).
    pub fn subscribe_channel(&self) -> mpsc::UnboundedReceiver<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = lock(&self.inner.state);
        // The receiver is alive, so this cannot fail.
        let _ = tx.send(state.value.clone());
        state.register(Observer::Channel(tx));
        rx
    }

    /// Number of live registrations.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.state).observers.len()
    }
}

impl<T> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Handle for one callback registration.
///
/// Dropping it (or calling [`unsubscribe`](Self::unsubscribe)) removes
/// the callback. Use [`detach`](Self::detach) to keep the callback for
/// as long as the subject lives. Dropping it from inside its own
/// callback is fine.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    fn new<T: Send + 'static>(inner: Weak<Shared<T>>, id: u64) -> Self {
        let cancel = move || {
            // The subject may already be gone; nothing to remove then.
            if let Some(inner) = inner.upgrade() {
                inner.remove(&[id]);
            }
        };
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Removes the callback now.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keeps the callback registered for the subject's whole life.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
