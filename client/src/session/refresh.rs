//! Background session renewal while authenticated.
//!
//! ARCHITECTURE
//! ============
//! `attach` subscribes the scheduler to the store: entering `Authenticated`
//! starts a renewal task, leaving it stops the task within the same
//! notification round. Each start bumps a generation counter; a renewal
//! response is applied only if its generation is still current, so a call
//! that was in flight across logout/login can never act on the new session.
//!
//! TRADE-OFFS
//! ==========
//! Under `RefreshFailurePolicy::LogoutOnUnauthorized` a definitive 401/403
//! from `/auth/refresh-token` logs the client out. `LogOnly` keeps the
//! client authenticated until the next bootstrap and only reports the error.

#[cfg(test)]
#[path = "refresh_test.rs"]
mod refresh_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use futures::future::{AbortHandle, FutureExt, abortable};
use futures::task::{LocalSpawn, LocalSpawnExt};
use leptos::logging::{log, warn};

use crate::config::{RefreshFailurePolicy, RefreshSettings};
use crate::net::backend::AuthBackend;
use crate::state::session::{SessionState, SessionStore, Subscription};
use crate::util::runtime::Timer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerStatus {
    Stopped,
    Running,
}

struct SchedulerInner {
    store: SessionStore,
    backend: Rc<dyn AuthBackend>,
    timer: Rc<dyn Timer>,
    spawner: Rc<dyn LocalSpawn>,
    settings: RefreshSettings,
    generation: Cell<u64>,
    task: RefCell<Option<AbortHandle>>,
}

impl SchedulerInner {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation && self.task.borrow().is_some()
    }
}

#[derive(Clone)]
pub struct RefreshScheduler {
    inner: Rc<SchedulerInner>,
}

impl RefreshScheduler {
    pub fn new(
        store: SessionStore,
        backend: Rc<dyn AuthBackend>,
        timer: Rc<dyn Timer>,
        spawner: Rc<dyn LocalSpawn>,
        settings: RefreshSettings,
    ) -> Self {
        Self {
            inner: Rc::new(SchedulerInner {
                store,
                backend,
                timer,
                spawner,
                settings,
                generation: Cell::new(0),
                task: RefCell::new(None),
            }),
        }
    }

    pub fn status(&self) -> SchedulerStatus {
        if self.inner.task.borrow().is_some() { SchedulerStatus::Running } else { SchedulerStatus::Stopped }
    }

    /// Incremented on every start and stop.
    pub fn generation(&self) -> u64 {
        self.inner.generation.get()
    }

    /// Follow the store: run while `Authenticated`, stop otherwise.
    ///
    /// The current state is applied immediately.
    pub fn attach(&self) -> Subscription {
        let weak: Weak<SchedulerInner> = Rc::downgrade(&self.inner);
        let subscription = self.inner.store.subscribe(move |state| {
            if let Some(inner) = weak.upgrade() {
                RefreshScheduler { inner }.follow(state);
            }
        });
        self.inner.store.with(|state| self.follow(state));
        subscription
    }

    fn follow(&self, state: &SessionState) {
        if state.is_authenticated() {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Start renewing. No-op while already running.
    pub fn start(&self) {
        if self.inner.task.borrow().is_some() {
            return;
        }
        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);

        let (task, handle) = abortable(run_renewals(self.inner.clone(), generation));
        // Registered before spawning so the task sees itself as current.
        *self.inner.task.borrow_mut() = Some(handle);
        match self.inner.spawner.spawn_local(task.map(|_| ())) {
            Ok(()) => log!("session: refresh scheduler started (generation {generation})"),
            Err(err) => {
                self.inner.task.borrow_mut().take();
                warn!("session: refresh scheduler could not start ({err})");
            }
        }
    }

    /// Cancel the renewal task. No-op while already stopped.
    pub fn stop(&self) {
        let handle = self.inner.task.borrow_mut().take();
        let Some(handle) = handle else {
            return;
        };
        handle.abort();
        self.inner.generation.set(self.inner.generation.get() + 1);
        log!("session: refresh scheduler stopped");
    }
}

async fn run_renewals(inner: Rc<SchedulerInner>, generation: u64) {
    if inner.settings.renew_on_start {
        renew(&inner, generation).await;
    }
    while inner.is_current(generation) {
        inner.timer.sleep(inner.settings.interval).await;
        if !inner.is_current(generation) {
            break;
        }
        renew(&inner, generation).await;
    }
}

async fn renew(inner: &SchedulerInner, generation: u64) {
    let result = inner.backend.refresh_token().await;
    if !inner.is_current(generation) {
        log!("session: discarding refresh result from stale generation {generation}");
        return;
    }
    match result {
        Ok(()) => {}
        Err(err)
            if err.is_definitive_unauthorized()
                && inner.settings.failure_policy == RefreshFailurePolicy::LogoutOnUnauthorized =>
        {
            warn!("session: refresh rejected ({err}), logging out");
            inner.store.set_unauthenticated();
        }
        Err(err) => warn!("session: refresh failed ({err})"),
    }
}
