//! Route protection decision.
//!
//! SYSTEM CONTEXT
//! ==============
//! `decide` is the only place that turns session state plus the current path
//! into a render outcome. The `SessionGate` component applies the outcome and
//! performs the navigation side effect once per resolved state through
//! [`RedirectLatch`].

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::collections::BTreeSet;

use crate::state::session::SessionState;

/// What the layout should render for the current path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderDecision {
    ShowLoading,
    RedirectTo(String),
    RenderProtected,
    RenderPublic,
}

/// Login target plus the allowlist of paths reachable without a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTable {
    login_path: String,
    public_paths: BTreeSet<String>,
}

impl RouteTable {
    pub fn new<'a>(login_path: &str, public_paths: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            login_path: normalize_path(login_path).to_owned(),
            public_paths: public_paths.into_iter().map(|p| normalize_path(p).to_owned()).collect(),
        }
    }

    /// `/login` and `/register` public, redirecting to `/login`.
    pub fn standard() -> Self {
        Self::new("/login", ["/login", "/register"])
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.contains(normalize_path(path))
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Strip query and fragment, and drop a trailing `/` except on the root.
pub fn normalize_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// Decide how to render `path` given the current session state.
pub fn decide(state: &SessionState, path: &str, routes: &RouteTable) -> RenderDecision {
    match state {
        SessionState::Unknown => RenderDecision::ShowLoading,
        SessionState::Authenticated(_) => RenderDecision::RenderProtected,
        SessionState::Unauthenticated if routes.is_public(path) => RenderDecision::RenderPublic,
        SessionState::Unauthenticated => RenderDecision::RedirectTo(routes.login_path().to_owned()),
    }
}

/// Debounces redirect side effects.
///
/// A redirect target is handed out at most once per store revision; any
/// non-redirect decision re-arms the latch so a later visit to a protected
/// path redirects again.
#[derive(Clone, Debug, Default)]
pub struct RedirectLatch {
    last: Option<(u64, String)>,
}

impl RedirectLatch {
    /// Target to navigate to now, if any.
    pub fn take(&mut self, decision: &RenderDecision, revision: u64) -> Option<String> {
        let RenderDecision::RedirectTo(target) = decision else {
            self.last = None;
            return None;
        };
        let key = (revision, target.clone());
        if self.last.as_ref() == Some(&key) {
            return None;
        }
        self.last = Some(key);
        Some(target.clone())
    }
}

/// Tracks movement between protected paths while authenticated.
///
/// The first protected path after a session starts is not reported; the
/// session was just confirmed by bootstrap or login.
#[derive(Clone, Debug, Default)]
pub struct NavigationWatch {
    last_protected: Option<String>,
}

impl NavigationWatch {
    /// Returns `true` when `path` is a different protected path than the
    /// previous one observed under the same authenticated session.
    pub fn entered_new_protected_path(&mut self, state: &SessionState, path: &str, routes: &RouteTable) -> bool {
        if !state.is_authenticated() {
            self.last_protected = None;
            return false;
        }
        let path = normalize_path(path);
        if routes.is_public(path) {
            return false;
        }
        match self.last_protected.replace(path.to_owned()) {
            Some(previous) => previous != path,
            None => false,
        }
    }
}
