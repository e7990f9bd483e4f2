//! Scripted backend and wiring helpers for session tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::executor::LocalPool;

use crate::config::{ClientConfig, RefreshSettings};
use crate::net::backend::AuthBackend;
use crate::net::error::{AuthError, Endpoint};
use crate::net::types::{LoginCredentials, Profile, RegistrationEcho, RegistrationRequest};
use crate::util::runtime::ManualClock;

use super::Session;

pub(crate) fn mari() -> Profile {
    Profile::new(Some(1), "mari", "Mari", "Maasikas", "mari@example.com").unwrap()
}

pub(crate) fn jaan() -> Profile {
    Profile::new(Some(2), "jaan", "Jaan", "Tamm", "jaan@example.com").unwrap()
}

enum Reply<T> {
    Ready(Result<T, AuthError>),
    Gated(oneshot::Receiver<Result<T, AuthError>>),
}

/// Queue of replies for one endpoint; falls back to `fallback` when empty.
pub(crate) struct Script<T> {
    replies: RefCell<VecDeque<Reply<T>>>,
    fallback: RefCell<Result<T, AuthError>>,
}

impl<T: Clone> Script<T> {
    fn new(fallback: Result<T, AuthError>) -> Self {
        Self { replies: RefCell::new(VecDeque::new()), fallback: RefCell::new(fallback) }
    }

    pub(crate) fn push(&self, reply: Result<T, AuthError>) {
        self.replies.borrow_mut().push_back(Reply::Ready(reply));
    }

    /// Queue a reply that stays in flight until the sender fires.
    pub(crate) fn gate(&self) -> oneshot::Sender<Result<T, AuthError>> {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().push_back(Reply::Gated(rx));
        tx
    }

    pub(crate) fn set_fallback(&self, reply: Result<T, AuthError>) {
        *self.fallback.borrow_mut() = reply;
    }

    async fn next(&self) -> Result<T, AuthError> {
        let reply = self.replies.borrow_mut().pop_front();
        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(AuthError::NetworkUnavailable("gate dropped".to_owned()))),
            None => self.fallback.borrow().clone(),
        }
    }
}

/// `AuthBackend` answering from per-endpoint scripts and recording calls.
pub(crate) struct StubBackend {
    pub(crate) check_session: Script<()>,
    pub(crate) profile: Script<Profile>,
    pub(crate) login: Script<()>,
    pub(crate) register: Script<RegistrationEcho>,
    pub(crate) logout: Script<()>,
    pub(crate) refresh: Script<()>,
    calls: RefCell<Vec<Endpoint>>,
    login_usernames: RefCell<Vec<String>>,
}

fn unreachable<T>() -> Result<T, AuthError> {
    Err(AuthError::NetworkUnavailable("unscripted".to_owned()))
}

impl Default for StubBackend {
    fn default() -> Self {
        Self {
            check_session: Script::new(Ok(())),
            profile: Script::new(unreachable()),
            login: Script::new(unreachable()),
            register: Script::new(unreachable()),
            logout: Script::new(Ok(())),
            refresh: Script::new(Ok(())),
            calls: RefCell::new(Vec::new()),
            login_usernames: RefCell::new(Vec::new()),
        }
    }
}

impl StubBackend {
    pub(crate) fn calls(&self) -> Vec<Endpoint> {
        self.calls.borrow().clone()
    }

    pub(crate) fn count(&self, endpoint: Endpoint) -> usize {
        self.calls.borrow().iter().filter(|e| **e == endpoint).count()
    }

    pub(crate) fn login_usernames(&self) -> Vec<String> {
        self.login_usernames.borrow().clone()
    }

    fn record(&self, endpoint: Endpoint) {
        self.calls.borrow_mut().push(endpoint);
    }
}

#[async_trait(?Send)]
impl AuthBackend for StubBackend {
    async fn check_session(&self) -> Result<(), AuthError> {
        self.record(Endpoint::CheckSession);
        self.check_session.next().await
    }

    async fn fetch_profile(&self) -> Result<Profile, AuthError> {
        self.record(Endpoint::CurrentUser);
        self.profile.next().await
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<(), AuthError> {
        self.record(Endpoint::Login);
        self.login_usernames.borrow_mut().push(credentials.username.clone());
        self.login.next().await
    }

    async fn register(&self, _request: &RegistrationRequest) -> Result<RegistrationEcho, AuthError> {
        self.record(Endpoint::Register);
        self.register.next().await
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.record(Endpoint::Logout);
        self.logout.next().await
    }

    async fn refresh_token(&self) -> Result<(), AuthError> {
        self.record(Endpoint::RefreshToken);
        self.refresh.next().await
    }
}

/// A fully wired `Session` over a stub backend, manual clock and local pool.
pub(crate) struct Harness {
    pub(crate) pool: LocalPool,
    pub(crate) clock: ManualClock,
    pub(crate) backend: Rc<StubBackend>,
    pub(crate) session: Session,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_refresh(RefreshSettings::default())
    }

    pub(crate) fn with_refresh(refresh: RefreshSettings) -> Self {
        let pool = LocalPool::new();
        let clock = ManualClock::default();
        let backend = Rc::new(StubBackend::default());
        let config = ClientConfig { refresh, ..ClientConfig::default() };
        let session = Session::new(&config, backend.clone(), Rc::new(clock.clone()), Rc::new(pool.spawner()));
        Self { pool, clock, backend, session }
    }

    pub(crate) fn run<F: std::future::Future>(&mut self, future: F) -> F::Output {
        self.pool.run_until(future)
    }

    pub(crate) fn settle(&mut self) {
        self.pool.run_until_stalled();
    }

    pub(crate) fn advance(&mut self, by: std::time::Duration) {
        self.clock.advance(by);
        self.pool.run_until_stalled();
    }
}
