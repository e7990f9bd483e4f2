//! Protected landing page shown after login.

use leptos::prelude::*;

use crate::app::SessionContext;

#[component]
pub fn HomePage() -> impl IntoView {
    let state = expect_context::<SessionContext>().state();
    let greeting = move || {
        state.with(|s| s.profile().map(|p| format!("Welcome, {}.", p.first_name())).unwrap_or_default())
    };

    view! {
        <section class="home-page">
            <h2>{greeting}</h2>
            <p>"Your budgets and transactions will appear here."</p>
        </section>
    }
}
