//! Async seam between the session subsystem and the auth HTTP endpoints.
//!
//! SYSTEM CONTEXT
//! ==============
//! `HttpAuthBackend` implements this over `gloo-net` in the browser; tests
//! use a scripted stub. The trait is `?Send` because the browser runtime is
//! single-threaded and responses are consumed on the same task.

use async_trait::async_trait;

use super::error::AuthError;
use super::types::{LoginCredentials, Profile, RegistrationEcho, RegistrationRequest};

#[async_trait(?Send)]
pub trait AuthBackend {
    /// `GET /auth/check-session`.
    async fn check_session(&self) -> Result<(), AuthError>;

    /// `GET /users/me`.
    async fn fetch_profile(&self) -> Result<Profile, AuthError>;

    /// `POST /auth/login`.
    async fn login(&self, credentials: &LoginCredentials) -> Result<(), AuthError>;

    /// `POST /auth/register`.
    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationEcho, AuthError>;

    /// `POST /auth/logout`.
    async fn logout(&self) -> Result<(), AuthError>;

    /// `POST /auth/refresh-token` with no body.
    async fn refresh_token(&self) -> Result<(), AuthError>;
}
