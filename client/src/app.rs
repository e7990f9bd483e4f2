//! Root component: session wiring, context and routes.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds the single [`Session`] for the page, mirrors its store into a
//! reactive signal, starts the bootstrap and mounts every route under
//! [`SessionGate`].

use std::time::Duration;

use leptos::logging::{log, warn};
use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::components::app_header::AppHeader;
use crate::components::session_gate::SessionGate;
use crate::config::ClientConfig;
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::register::RegisterPage;
use crate::session::Session;
use crate::session::guard::RouteTable;
use crate::state::session::SessionState;

/// Session handles shared through Leptos context.
///
/// `Session` holds `Rc`s, so it lives in local arena storage; components
/// read the mirrored `state` signal and fetch the session only to run an
/// action.
#[derive(Clone, Copy)]
pub struct SessionContext {
    session: StoredValue<Session, LocalStorage>,
    state: RwSignal<SessionState>,
    routes: StoredValue<RouteTable>,
    registration_redirect_delay: Duration,
}

impl SessionContext {
    pub fn state(&self) -> ReadSignal<SessionState> {
        self.state.read_only()
    }

    /// `None` once the root owner has been disposed.
    pub fn session(&self) -> Option<Session> {
        self.session.try_get_value()
    }

    /// Store revision, read without tracking.
    pub fn revision(&self) -> u64 {
        self.session.try_with_value(|session| session.store().revision()).unwrap_or_default()
    }

    pub fn routes(&self) -> RouteTable {
        self.routes.get_value()
    }

    pub fn registration_redirect_delay(&self) -> Duration {
        self.registration_redirect_delay
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::from_build_env().unwrap_or_else(|err| {
        warn!("config: {err}; falling back to defaults");
        ClientConfig::default()
    });
    log!("config: api at {}", config.api_base_url);

    let session = Session::browser(&config);
    let state = RwSignal::new(session.store().get());
    let mirror = session.store().subscribe(move |next| {
        let _ = state.try_set(next.clone());
    });

    let ctx = SessionContext {
        session: StoredValue::new_local(session.clone()),
        state,
        routes: StoredValue::new(session.routes().clone()),
        registration_redirect_delay: config.registration_redirect_delay,
    };
    provide_context(ctx);

    let bootstrapper = session.bootstrapper().clone();
    leptos::task::spawn_local(async move {
        bootstrapper.bootstrap().await;
    });

    let mirror = StoredValue::new_local(Some(mirror));
    on_cleanup(move || {
        mirror.update_value(|link| drop(link.take()));
        if ctx.session.try_with_value(Session::shutdown).is_none() {
            warn!("session: already disposed at cleanup");
        }
    });

    view! {
        <Title text="Budget" />
        <Router>
            <SessionGate>
                <AppHeader />
                <main class="app-main">
                    <Routes fallback=|| view! { <p class="not-found">"Page not found."</p> }>
                        <Route path=path!("/login") view=LoginPage />
                        <Route path=path!("/register") view=RegisterPage />
                        <Route path=path!("/") view=HomePage />
                    </Routes>
                </main>
            </SessionGate>
        </Router>
    }
}
