//! Top bar with the signed-in user's name and a logout action.
//!
//! Logout needs no navigation here: once the store flips to
//! `Unauthenticated`, `SessionGate` redirects any protected path to login.

use leptos::logging::log;
use leptos::prelude::*;

use crate::app::SessionContext;

#[component]
pub fn AppHeader() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let state = ctx.state();
    let busy = RwSignal::new(false);

    let display_name = move || state.with(|s| s.profile().map(|p| p.display_name()).unwrap_or_default());

    let on_logout = move |_| {
        if busy.get() {
            return;
        }
        let Some(session) = ctx.session() else {
            return;
        };
        busy.set(true);
        leptos::task::spawn_local(async move {
            let outcome = session.gateway().logout().await;
            if !outcome.server_acknowledged {
                log!("session: backend did not confirm logout");
            }
            let _ = busy.try_set(false);
        });
    };

    view! {
        <Show when=move || state.with(|s| s.is_authenticated())>
            <header class="app-header">
                <span class="app-header__title">"Budget"</span>
                <span class="app-header__user">{display_name}</span>
                <button class="app-header__logout" on:click=on_logout disabled=move || busy.get()>
                    "Log out"
                </button>
            </header>
        </Show>
    }
}
