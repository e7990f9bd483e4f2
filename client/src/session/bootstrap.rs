//! Initial authority check and session revalidation.
//!
//! SYSTEM CONTEXT
//! ==============
//! `bootstrap` runs once at mount and is the only path out of
//! `SessionState::Unknown` that does not involve the user submitting
//! credentials. `revalidate` re-confirms an authenticated session with
//! `/auth/check-session` and can only ever move the store to
//! `Unauthenticated`.
//!
//! ERROR HANDLING
//! ==============
//! Network and backend failures are converted into state transitions and log
//! lines; nothing here returns an error to the UI tree.

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod bootstrap_test;

use std::cell::Cell;
use std::rc::Rc;

use leptos::logging::{log, warn};

use crate::net::backend::AuthBackend;
use crate::state::session::SessionStore;

#[derive(Clone)]
pub struct SessionBootstrapper {
    store: SessionStore,
    backend: Rc<dyn AuthBackend>,
    started: Rc<Cell<bool>>,
}

impl SessionBootstrapper {
    pub fn new(store: SessionStore, backend: Rc<dyn AuthBackend>) -> Self {
        Self { store, backend, started: Rc::new(Cell::new(false)) }
    }

    pub fn has_started(&self) -> bool {
        self.started.get()
    }

    /// Resolve the initial session state from `GET /users/me`.
    ///
    /// Only the first call does any work. If the store already left
    /// `Unknown` while the fetch was in flight (a login finished first), the
    /// fetched result is discarded.
    pub async fn bootstrap(&self) {
        if self.started.replace(true) {
            log!("session: bootstrap already ran");
            return;
        }

        let outcome = self.backend.fetch_profile().await;

        if !self.store.with(|state| state.is_unknown()) {
            log!("session: discarding bootstrap result, state resolved while in flight");
            return;
        }

        match outcome {
            Ok(profile) => {
                log!("session: bootstrap resolved authenticated as {}", profile.email());
                self.store.set_authenticated(profile);
            }
            Err(err) => {
                log!("session: bootstrap resolved unauthenticated ({err})");
                self.store.set_unauthenticated();
            }
        }
    }

    /// Confirm an authenticated session is still live.
    ///
    /// A definitive 401/403 logs the client out locally; transient failures
    /// keep the current state. Skipped unless currently authenticated.
    pub async fn revalidate(&self) {
        if !self.store.with(|state| state.is_authenticated()) {
            return;
        }
        let revision = self.store.revision();

        let result = self.backend.check_session().await;

        if self.store.revision() != revision {
            log!("session: discarding stale session check");
            return;
        }
        match result {
            Ok(()) => {}
            Err(err) if err.is_definitive_unauthorized() => {
                warn!("session: session check rejected ({err}), logging out");
                self.store.set_unauthenticated();
            }
            Err(err) => warn!("session: session check failed ({err}), keeping state"),
        }
    }
}
