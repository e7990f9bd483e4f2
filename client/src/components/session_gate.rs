//! Layout wrapper that enforces route protection.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps every route. While the session is unresolved it renders a spinner
//! in place of the page; unauthenticated visits to protected paths are sent
//! to the login route. Moving between protected paths re-checks the session
//! in the background.

use leptos::prelude::*;
use leptos::tachys::view::any_view::IntoAny;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::app::SessionContext;
use crate::session::guard::{NavigationWatch, RedirectLatch, RenderDecision, decide};

#[component]
pub fn SessionGate(children: ChildrenFn) -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let location = use_location();
    let navigate = use_navigate();
    let state = ctx.state();

    let routes = ctx.routes();
    let decision = Memo::new(move |_| decide(&state.get(), &location.pathname.get(), &routes));

    let mut latch = RedirectLatch::default();
    Effect::new(move || {
        let current = decision.get();
        if let Some(target) = latch.take(&current, ctx.revision()) {
            navigate(&target, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let routes = ctx.routes();
    let mut watch = NavigationWatch::default();
    Effect::new(move || {
        let path = location.pathname.get();
        let entered = state.with(|s| watch.entered_new_protected_path(s, &path, &routes));
        if !entered {
            return;
        }
        if let Some(session) = ctx.session() {
            leptos::task::spawn_local(async move {
                session.bootstrapper().revalidate().await;
            });
        }
    });

    move || match decision.get() {
        RenderDecision::ShowLoading | RenderDecision::RedirectTo(_) => view! {
            <div class="session-loading" aria-busy="true">
                <div class="session-loading__spinner"></div>
            </div>
        }
        .into_any(),
        RenderDecision::RenderProtected | RenderDecision::RenderPublic => children().into_any(),
    }
}
