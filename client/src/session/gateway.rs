//! Login, registration and logout.
//!
//! ERROR HANDLING
//! ==============
//! Login and registration failures are returned verbatim to the submitting
//! form and never touch the store: a rejected login is not evidence that an
//! existing session was lost. Logout cannot fail from the caller's point of
//! view; the local session ends before the request is even sent.

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use std::rc::Rc;

use leptos::logging::{log, warn};

use crate::net::backend::AuthBackend;
use crate::net::error::AuthError;
use crate::net::types::{LoginCredentials, RegistrationEcho, RegistrationRequest};
use crate::state::session::SessionStore;

/// Successful login; the caller should navigate to `redirect_to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub redirect_to: String,
}

/// Completed logout. `server_acknowledged` is `false` when the backend call
/// failed; the client is logged out locally either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub server_acknowledged: bool,
    pub redirect_to: String,
}

#[derive(Clone)]
pub struct CredentialGateway {
    store: SessionStore,
    backend: Rc<dyn AuthBackend>,
    home_path: Rc<str>,
    login_path: Rc<str>,
}

impl CredentialGateway {
    pub fn new(store: SessionStore, backend: Rc<dyn AuthBackend>, home_path: &str, login_path: &str) -> Self {
        Self { store, backend, home_path: home_path.into(), login_path: login_path.into() }
    }

    /// Authenticate, then fetch the profile to populate the store.
    ///
    /// The password is dropped as soon as the login call ends; the username
    /// completes the fetched profile, which does not carry one.
    ///
    /// # Errors
    ///
    /// Returns the login call's [`AuthError`], or the profile fetch's error if
    /// the login succeeded but no complete profile could be loaded. The store
    /// is untouched on any error.
    pub async fn login(&self, credentials: LoginCredentials) -> Result<LoginOutcome, AuthError> {
        let result = self.backend.login(&credentials).await;
        let LoginCredentials { username, password } = credentials;
        drop(password);
        if let Err(err) = result {
            log!("session: login rejected ({err})");
            return Err(err);
        }

        let profile = self.backend.fetch_profile().await.inspect_err(|err| {
            warn!("session: login accepted but profile fetch failed ({err})");
        })?;
        // `/users/me` does not echo the username.
        let profile = profile.with_username(username);

        log!("session: logged in as {}", profile.username().unwrap_or_else(|| profile.email()));
        self.store.set_authenticated(profile);
        Ok(LoginOutcome { redirect_to: self.home_path.to_string() })
    }

    /// Create an account. Does not authenticate the client.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`AuthError`], typically `ValidationFailed`.
    pub async fn register(&self, request: RegistrationRequest) -> Result<RegistrationEcho, AuthError> {
        let result = self.backend.register(&request).await;
        drop(request);
        result.inspect_err(|err| log!("session: registration rejected ({err})"))
    }

    /// End the session locally, then tell the backend.
    pub async fn logout(&self) -> LogoutOutcome {
        self.store.set_unauthenticated();

        let server_acknowledged = match self.backend.logout().await {
            Ok(()) => true,
            Err(err) => {
                warn!("session: logout request failed ({err}); logged out locally");
                false
            }
        };
        LogoutOutcome { server_acknowledged, redirect_to: self.login_path.to_string() }
    }
}
