use super::*;

fn raw(status: u16, content_type: Option<&str>, body: &str) -> RawResponse {
    RawResponse { status, content_type: content_type.map(str::to_owned), body: body.to_owned() }
}

#[test]
fn endpoint_url_joins_base_without_double_slash() {
    let api = HttpAuthBackend::new("https://budget.example.com/api/");
    assert_eq!(api.endpoint_url(Endpoint::CurrentUser), "https://budget.example.com/api/users/me");
    assert_eq!(api.endpoint_url(Endpoint::Login), "https://budget.example.com/api/auth/login");
}

#[test]
fn expect_success_passes_2xx_through() {
    let ok = raw(204, None, "");
    assert_eq!(expect_success(Endpoint::Logout, ok.clone()), Ok(ok));
}

#[test]
fn expect_success_classifies_failures_per_endpoint() {
    assert_eq!(
        expect_success(Endpoint::Login, raw(401, None, "Bad credentials")),
        Err(AuthError::InvalidCredentials)
    );
    assert_eq!(
        expect_success(Endpoint::CurrentUser, raw(401, None, "")),
        Err(AuthError::Unauthorized { status: 401 })
    );
}

#[test]
fn parse_profile_accepts_complete_body() {
    let body = r#"{"firstName":"Mari","lastName":"Maasikas","email":"m@e.ee"}"#;
    let profile = parse_profile(&raw(200, Some("application/json"), body)).unwrap();
    assert_eq!(profile.display_name(), "Mari Maasikas");
}

#[test]
fn parse_profile_rejects_unparseable_body() {
    let err = parse_profile(&raw(200, Some("text/html"), "<html>login</html>")).unwrap_err();
    assert!(matches!(err, AuthError::MalformedResponse(_)));
}

#[test]
fn parse_profile_rejects_partial_body() {
    let err = parse_profile(&raw(200, Some("application/json"), r#"{"kasutajanimi":"mari"}"#)).unwrap_err();
    assert!(matches!(err, AuthError::MalformedResponse(_)));
}

#[cfg(not(feature = "csr"))]
#[test]
fn native_backend_reports_network_unavailable() {
    let api = HttpAuthBackend::new("http://localhost:8080");
    let result = futures::executor::block_on(api.fetch_profile());
    assert!(matches!(result, Err(AuthError::NetworkUnavailable(_))));
}
