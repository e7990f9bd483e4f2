//! Browser client for the budgeting app: session lifecycle and route
//! protection in front of the feature pages.
//!
//! ARCHITECTURE
//! ============
//! `net` talks to the REST backend, `state` holds the session store,
//! `session` runs bootstrap, credentials, renewal and the route decision,
//! and `components`/`pages` render on top through Leptos context.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod session;
pub mod state;
pub mod util;

#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("logging: console logger not installed ({err})");
    }
    leptos::mount::mount_to_body(app::App);
}
