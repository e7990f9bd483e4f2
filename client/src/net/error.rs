//! Auth error taxonomy and per-endpoint status classification.
//!
//! ERROR HANDLING
//! ==============
//! Every non-2xx response is mapped to exactly one [`AuthError`] here so the
//! HTTP backend and test stubs share a single interpretation of status codes.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::collections::BTreeMap;

use super::types::is_json;

/// Failure of an auth endpoint call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Login rejected the username/password pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The backend has no valid session for this client (401/403).
    #[error("unauthorized: status {status}")]
    Unauthorized { status: u16 },

    /// A submitted payload was rejected with field-level detail.
    #[error("validation failed: {message}")]
    ValidationFailed { message: String, fields: BTreeMap<String, String> },

    /// The request never produced a response.
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The backend answered with 5xx or an unexpected status.
    #[error("server error: status {status}")]
    ServerError { status: u16 },

    /// A 2xx response whose body could not be interpreted.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl AuthError {
    /// Display copy for the submitting form.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials => "Invalid username or password. Please try again.".to_owned(),
            Self::Unauthorized { .. } => "Your session has expired. Please log in again.".to_owned(),
            Self::ValidationFailed { message, .. } if !message.is_empty() => message.clone(),
            Self::ValidationFailed { .. } => "Please check the form fields and try again.".to_owned(),
            Self::NetworkUnavailable(_) => {
                "Could not reach the server. Check your connection and try again.".to_owned()
            }
            Self::ServerError { .. } => "Something went wrong on our side. Please try again.".to_owned(),
            Self::MalformedResponse(_) => "The server sent an unexpected response. Please try again.".to_owned(),
        }
    }

    /// `true` when the backend definitively reported the session as gone.
    pub fn is_definitive_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Backend endpoints consumed by the session subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    CheckSession,
    CurrentUser,
    Login,
    Register,
    Logout,
    RefreshToken,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::CheckSession => "/auth/check-session",
            Self::CurrentUser => "/users/me",
            Self::Login => "/auth/login",
            Self::Register => "/auth/register",
            Self::Logout => "/auth/logout",
            Self::RefreshToken => "/auth/refresh-token",
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            Self::CheckSession | Self::CurrentUser => "GET",
            Self::Login | Self::Register | Self::Logout | Self::RefreshToken => "POST",
        }
    }
}

pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Map a non-2xx response to an [`AuthError`].
///
/// `body` is only consulted for validation details on 4xx responses.
pub fn classify_failure(endpoint: Endpoint, status: u16, content_type: Option<&str>, body: &str) -> AuthError {
    match (endpoint, status) {
        (Endpoint::Login, 400 | 401) => AuthError::InvalidCredentials,
        (_, 401 | 403) => AuthError::Unauthorized { status },
        (Endpoint::Register, 400..=499) | (_, 400) => parse_validation_body(content_type, body),
        _ => AuthError::ServerError { status },
    }
}

/// Extract a message and field errors from a 4xx body.
///
/// Accepts `{"message": .., "errors": {field: msg}}` JSON or plain text.
pub fn parse_validation_body(content_type: Option<&str>, body: &str) -> AuthError {
    let trimmed = body.trim();
    if is_json(content_type) || trimmed.starts_with('{') {
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed) {
            let message = ["message", "error"]
                .iter()
                .find_map(|key| map.get(*key).and_then(serde_json::Value::as_str))
                .unwrap_or_default()
                .to_owned();
            let fields = ["errors", "fieldErrors"]
                .iter()
                .find_map(|key| map.get(*key).and_then(serde_json::Value::as_object))
                .map(|obj| {
                    obj.iter()
                        .filter_map(|(k, v)| v.as_str().map(|msg| (k.clone(), msg.to_owned())))
                        .collect()
                })
                .unwrap_or_default();
            return AuthError::ValidationFailed { message, fields };
        }
    }
    AuthError::ValidationFailed { message: trimmed.to_owned(), fields: BTreeMap::new() }
}
