//! Session lifecycle: bootstrap, credentials, renewal and route protection.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`Session`] wires one [`SessionStore`] to the components that read and
//! write it. It is created once at app mount, provided through Leptos
//! context, and shut down when the root owner is disposed.
//!
//! DESIGN
//! ======
//! The backend, timer and spawner are trait objects so the whole lifecycle
//! can be driven from a single-threaded executor in tests. The refresh
//! scheduler stays attached to the store for the session's lifetime; it
//! starts and stops itself as the state changes.

pub mod bootstrap;
pub mod gateway;
pub mod guard;
pub mod refresh;

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use std::cell::RefCell;
use std::rc::Rc;

use futures::task::LocalSpawn;
use leptos::logging::log;

use crate::config::ClientConfig;
use crate::net::backend::AuthBackend;
use crate::state::session::{SessionStore, Subscription};
use crate::util::runtime::Timer;

use self::bootstrap::SessionBootstrapper;
use self::gateway::CredentialGateway;
use self::guard::RouteTable;
use self::refresh::RefreshScheduler;

#[derive(Clone)]
pub struct Session {
    store: SessionStore,
    bootstrapper: SessionBootstrapper,
    gateway: CredentialGateway,
    scheduler: RefreshScheduler,
    routes: Rc<RouteTable>,
    scheduler_link: Rc<RefCell<Option<Subscription>>>,
}

impl Session {
    pub fn new(
        config: &ClientConfig,
        backend: Rc<dyn AuthBackend>,
        timer: Rc<dyn Timer>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Self {
        let store = SessionStore::new();
        let bootstrapper = SessionBootstrapper::new(store.clone(), backend.clone());
        let gateway = CredentialGateway::new(store.clone(), backend.clone(), &config.home_path, &config.login_path);
        let scheduler = RefreshScheduler::new(store.clone(), backend, timer, spawner, config.refresh);
        let link = scheduler.attach();

        Self {
            store,
            bootstrapper,
            gateway,
            scheduler,
            routes: Rc::new(config.route_table()),
            scheduler_link: Rc::new(RefCell::new(Some(link))),
        }
    }

    /// Session talking to the configured backend from the browser.
    pub fn browser(config: &ClientConfig) -> Self {
        use crate::net::api::HttpAuthBackend;
        use crate::util::runtime::{BrowserSpawner, BrowserTimer};

        Self::new(
            config,
            Rc::new(HttpAuthBackend::new(&config.api_base_url)),
            Rc::new(BrowserTimer),
            Rc::new(BrowserSpawner),
        )
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn bootstrapper(&self) -> &SessionBootstrapper {
        &self.bootstrapper
    }

    pub fn gateway(&self) -> &CredentialGateway {
        &self.gateway
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Detach the scheduler, cancel any renewal and close the store.
    ///
    /// Safe to call more than once.
    pub fn shutdown(&self) {
        let link = self.scheduler_link.borrow_mut().take();
        if link.is_none() {
            return;
        }
        drop(link);
        self.scheduler.stop();
        self.store.teardown();
        log!("session: shut down");
    }
}
