//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionStore` is the single source of truth for whether the client is
//! authenticated. The bootstrapper, credential gateway and refresh scheduler
//! write to it; the route guard and every screen only read or subscribe.
//!
//! DESIGN
//! ======
//! Writes are whole-value replacements followed by a synchronous notification
//! round, so no reader can observe a half-updated identity. Every applied
//! write bumps `revision`, which async callers capture before awaiting and
//! compare afterwards to discard results that raced with a newer write.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::net::types::Profile;

/// Authentication state; exactly one variant is active at any instant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Authority check has not resolved yet.
    #[default]
    Unknown,
    /// The backend has no valid session for this client.
    Unauthenticated,
    /// The backend session is valid.
    Authenticated(Profile),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Self::Authenticated(profile) => Some(profile),
            _ => None,
        }
    }
}

type Listener = Rc<dyn Fn(&SessionState)>;

struct StoreInner {
    state: RefCell<SessionState>,
    revision: Cell<u64>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener_id: Cell<u64>,
    closed: Cell<bool>,
}

/// Page-lifetime holder of the current [`SessionState`].
///
/// Cloning yields another handle to the same store.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<StoreInner>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.inner.state.borrow())
            .field("revision", &self.inner.revision.get())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(SessionState::Unknown),
                revision: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(0),
                closed: Cell::new(false),
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn get(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Borrow the current state without cloning the profile.
    pub fn with<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    /// Number of writes applied so far.
    pub fn revision(&self) -> u64 {
        self.inner.revision.get()
    }

    /// Register a listener invoked synchronously after every applied write.
    ///
    /// The listener stays registered for as long as the returned
    /// [`Subscription`] is alive.
    pub fn subscribe(&self, listener: impl Fn(&SessionState) + 'static) -> Subscription {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        if !self.inner.closed.get() {
            self.inner.listeners.borrow_mut().push((id, Rc::new(listener)));
        }
        Subscription { store: Rc::downgrade(&self.inner), id: Some(id) }
    }

    pub fn set_authenticated(&self, profile: Profile) {
        self.replace(SessionState::Authenticated(profile));
    }

    pub fn set_unauthenticated(&self) {
        self.replace(SessionState::Unauthenticated);
    }

    /// Drop every listener and ignore further writes. Called on root unmount.
    pub fn teardown(&self) {
        self.inner.closed.set(true);
        self.inner.listeners.borrow_mut().clear();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }

    fn replace(&self, next: SessionState) {
        if self.inner.closed.get() {
            return;
        }
        if *self.inner.state.borrow() == next {
            return;
        }
        self.inner.state.replace(next.clone());
        self.inner.revision.set(self.inner.revision.get() + 1);
        self.notify(&next);
    }

    fn notify(&self, state: &SessionState) {
        let revision = self.inner.revision.get();
        let snapshot: Vec<(u64, Listener)> = self.inner.listeners.borrow().clone();
        for (id, listener) in snapshot {
            // A listener wrote during this round; the nested round already
            // delivered the newer state to everyone still registered.
            if self.inner.revision.get() != revision {
                return;
            }
            // A listener removed earlier in this round must not be called.
            let still_registered = self.inner.listeners.borrow().iter().any(|(lid, _)| *lid == id);
            if still_registered {
                listener(state);
            }
        }
    }

    fn unsubscribe_id(inner: &StoreInner, id: u64) {
        inner.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }
}

/// Handle returned by [`SessionStore::subscribe`]; dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    store: Weak<StoreInner>,
    id: Option<u64>,
}

impl Subscription {
    /// Remove the listener now. Equivalent to dropping the handle.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let (Some(id), Some(inner)) = (self.id.take(), self.store.upgrade()) {
            SessionStore::unsubscribe_id(&inner, id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
