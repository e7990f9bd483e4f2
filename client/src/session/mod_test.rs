use super::*;

use std::time::Duration;

use crate::config::DEFAULT_REFRESH_INTERVAL_SECS;
use crate::net::error::Endpoint;
use crate::session::guard::{RenderDecision, decide};
use crate::session::refresh::SchedulerStatus;
use crate::session::test_support::{Harness, mari};
use crate::state::session::SessionState;

#[test]
fn new_session_starts_unknown_and_idle() {
    let h = Harness::new();
    let state = h.session.store().get();

    assert_eq!(state, SessionState::Unknown);
    assert_eq!(h.session.scheduler().status(), SchedulerStatus::Stopped);
    assert_eq!(decide(&state, "/", h.session.routes()), RenderDecision::ShowLoading);
    assert!(h.backend.calls().is_empty());
}

#[test]
fn routes_follow_config_paths() {
    let h = Harness::new();
    assert_eq!(h.session.routes().login_path(), "/login");
    assert!(h.session.routes().is_public("/register"));
    assert!(!h.session.routes().is_public("/"));
}

#[test]
fn clones_share_one_store() {
    let h = Harness::new();
    let other = h.session.clone();

    other.store().set_authenticated(mari());

    assert_eq!(h.session.store().get(), SessionState::Authenticated(mari()));
    assert_eq!(h.session.scheduler().status(), SchedulerStatus::Running);
}

#[test]
fn shutdown_cancels_renewal_and_freezes_store() {
    let mut h = Harness::new();
    h.session.store().set_authenticated(mari());
    h.settle();
    let renewals = h.backend.count(Endpoint::RefreshToken);

    h.session.shutdown();
    h.advance(Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS * 2));

    assert!(h.session.store().is_closed());
    assert_eq!(h.session.scheduler().status(), SchedulerStatus::Stopped);
    assert_eq!(h.backend.count(Endpoint::RefreshToken), renewals);
    assert_eq!(h.clock.pending_sleepers(), 0);

    h.session.store().set_unauthenticated();
    assert_eq!(h.session.store().get(), SessionState::Authenticated(mari()));
}

#[test]
fn shutdown_twice_is_harmless() {
    let h = Harness::new();
    h.session.shutdown();
    h.session.shutdown();
    assert!(h.session.store().is_closed());
}
