//! REST client for the auth endpoints.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`, credentials included on
//! every request so the backend session cookie travels with it.
//! Native builds (tests, tooling): every call reports `NetworkUnavailable`
//! since these endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures become `NetworkUnavailable`; status interpretation is
//! delegated to `error::classify_failure` so the response handling below stays
//! a thin pipeline of pure helpers.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;

use super::backend::AuthBackend;
use super::error::{AuthError, Endpoint, classify_failure, is_success};
use super::types::{LoginCredentials, Profile, RegistrationEcho, RegistrationRequest};

/// Status, content type and text of a finished response.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawResponse {
    status: u16,
    content_type: Option<String>,
    body: String,
}

/// `AuthBackend` over the browser fetch API.
#[derive(Clone, Debug)]
pub struct HttpAuthBackend {
    base_url: String,
}

impl HttpAuthBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into().trim_end_matches('/').to_owned() }
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    async fn call(&self, endpoint: Endpoint, body: Option<serde_json::Value>) -> Result<RawResponse, AuthError> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::RequestBuilder;
            use web_sys::RequestCredentials;

            let url = self.endpoint_url(endpoint);
            let builder = RequestBuilder::new(&url)
                .method(method_of(endpoint))
                .credentials(RequestCredentials::Include);
            let resp = match body {
                Some(payload) => builder
                    .json(&payload)
                    .map_err(|e| AuthError::NetworkUnavailable(e.to_string()))?
                    .send()
                    .await,
                None => builder.send().await,
            }
            .map_err(|e| AuthError::NetworkUnavailable(e.to_string()))?;

            let status = resp.status();
            let content_type = resp.headers().get("content-type");
            let body = resp.text().await.unwrap_or_default();
            Ok(RawResponse { status, content_type, body })
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (self.endpoint_url(endpoint), body);
            Err(AuthError::NetworkUnavailable("not available outside the browser".to_owned()))
        }
    }
}

#[cfg(feature = "csr")]
fn method_of(endpoint: Endpoint) -> gloo_net::http::Method {
    match endpoint.method() {
        "GET" => gloo_net::http::Method::GET,
        _ => gloo_net::http::Method::POST,
    }
}

fn expect_success(endpoint: Endpoint, raw: RawResponse) -> Result<RawResponse, AuthError> {
    if is_success(raw.status) {
        Ok(raw)
    } else {
        Err(classify_failure(endpoint, raw.status, raw.content_type.as_deref(), &raw.body))
    }
}

fn parse_profile(raw: &RawResponse) -> Result<Profile, AuthError> {
    serde_json::from_str::<Profile>(&raw.body).map_err(|e| AuthError::MalformedResponse(e.to_string()))
}

#[async_trait(?Send)]
impl AuthBackend for HttpAuthBackend {
    async fn check_session(&self) -> Result<(), AuthError> {
        let raw = self.call(Endpoint::CheckSession, None).await?;
        expect_success(Endpoint::CheckSession, raw).map(|_| ())
    }

    async fn fetch_profile(&self) -> Result<Profile, AuthError> {
        let raw = self.call(Endpoint::CurrentUser, None).await?;
        let raw = expect_success(Endpoint::CurrentUser, raw)?;
        parse_profile(&raw)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<(), AuthError> {
        let raw = self.call(Endpoint::Login, Some(credentials.to_wire())).await?;
        expect_success(Endpoint::Login, raw).map(|_| ())
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationEcho, AuthError> {
        let raw = self.call(Endpoint::Register, Some(request.to_wire())).await?;
        let raw = expect_success(Endpoint::Register, raw)?;
        Ok(RegistrationEcho::from_body(raw.content_type.as_deref(), &raw.body))
    }

    async fn logout(&self) -> Result<(), AuthError> {
        let raw = self.call(Endpoint::Logout, None).await?;
        expect_success(Endpoint::Logout, raw).map(|_| ())
    }

    async fn refresh_token(&self) -> Result<(), AuthError> {
        let raw = self.call(Endpoint::RefreshToken, None).await?;
        expect_success(Endpoint::RefreshToken, raw).map(|_| ())
    }
}
