//! Wire DTOs for the auth endpoints.
//!
//! DESIGN
//! ======
//! `Profile` deserializes through `ProfileWire` so a body with a blank or
//! missing name or email is rejected at the serde boundary and can never
//! reach the session store. Credential types keep passwords in `SecretString` and only
//! expose them while the request body is being serialized.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// A profile field that was missing or blank in a `/users/me` response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("profile field `{field}` is missing or empty")]
pub struct ProfileError {
    pub field: &'static str,
}

/// Authenticated user's profile, cached from the last successful fetch.
///
/// Names and email are guaranteed non-empty. `GET /users/me` answers with
/// only `firstName`, `lastName` and `email`, so `user_id` and `username` are
/// optional; login fills the username in from the submitted credentials.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ProfileWire")]
pub struct Profile {
    user_id: Option<i64>,
    username: Option<String>,
    first_name: String,
    last_name: String,
    email: String,
}

impl Profile {
    /// Build a profile, rejecting blank fields.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] naming the first blank field.
    pub fn new(
        user_id: Option<i64>,
        username: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, ProfileError> {
        let username = required("username", username.into())?;
        Self::without_username(user_id, first_name, last_name, email).map(|p| p.with_username(username))
    }

    /// Build a profile as `/users/me` reports it, with no username.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] naming the first blank field.
    pub fn without_username(
        user_id: Option<i64>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, ProfileError> {
        let first_name = required("first_name", first_name.into())?;
        let last_name = required("last_name", last_name.into())?;
        let email = required("email", email.into())?;
        Ok(Self { user_id, username: None, first_name, last_name, email })
    }

    /// Fill in the username if the profile has none. A blank name is ignored.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        if self.username.is_none() {
            self.username = required("username", username.into()).ok();
        }
        self
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// `"First Last"` for header chrome.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn required(field: &'static str, value: String) -> Result<String, ProfileError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProfileError { field });
    }
    Ok(trimmed.to_owned())
}

/// Raw `/users/me` body: `{firstName, lastName, email}`. The Estonian
/// spellings used by the `/users` listing and an optional id/username are
/// accepted too.
#[derive(Debug, Deserialize)]
struct ProfileWire {
    #[serde(default, alias = "userId", alias = "id")]
    user_id: Option<i64>,
    #[serde(default, alias = "kasutajanimi")]
    username: Option<String>,
    #[serde(default, alias = "firstName", alias = "eesnimi")]
    first_name: Option<String>,
    #[serde(default, alias = "lastName", alias = "perekonnanimi")]
    last_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl TryFrom<ProfileWire> for Profile {
    type Error = ProfileError;

    fn try_from(wire: ProfileWire) -> Result<Self, Self::Error> {
        let profile = Profile::without_username(
            wire.user_id,
            wire.first_name.unwrap_or_default(),
            wire.last_name.unwrap_or_default(),
            wire.email.unwrap_or_default(),
        )?;
        Ok(match wire.username {
            Some(username) => profile.with_username(username),
            None => profile,
        })
    }
}

/// Username/password pair held only for the duration of a login call.
#[derive(Debug)]
pub struct LoginCredentials {
    pub username: String,
    pub password: SecretString,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: SecretString::new(password.into()) }
    }

    /// JSON body for `POST /auth/login`.
    pub(crate) fn to_wire(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.username,
            "password": self.password.expose_secret(),
        })
    }
}

/// Registration form fields, held only for the duration of a register call.
#[derive(Debug)]
pub struct RegistrationRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
}

impl RegistrationRequest {
    /// JSON body for `POST /auth/register`.
    pub(crate) fn to_wire(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.username,
            "firstname": self.first_name,
            "lastname": self.last_name,
            "email": self.email,
            "password": self.password.expose_secret(),
        })
    }
}

/// Confirmation returned by a successful registration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RegistrationEcho {
    #[serde(default)]
    pub message: String,
}

impl RegistrationEcho {
    /// Interpret a 2xx register body, which may be JSON or plain text.
    pub fn from_body(content_type: Option<&str>, body: &str) -> Self {
        if is_json(content_type) {
            if let Ok(echo) = serde_json::from_str::<RegistrationEcho>(body) {
                return echo;
            }
        }
        Self { message: body.trim().to_owned() }
    }
}

pub(crate) fn is_json(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.contains("application/json"))
}
