use super::*;

#[test]
fn login_400_and_401_are_invalid_credentials() {
    assert_eq!(classify_failure(Endpoint::Login, 401, None, ""), AuthError::InvalidCredentials);
    assert_eq!(classify_failure(Endpoint::Login, 400, None, ""), AuthError::InvalidCredentials);
}

#[test]
fn login_403_is_unauthorized() {
    assert_eq!(classify_failure(Endpoint::Login, 403, None, ""), AuthError::Unauthorized { status: 403 });
}

#[test]
fn refresh_401_is_definitive_unauthorized() {
    let err = classify_failure(Endpoint::RefreshToken, 401, None, "");
    assert!(err.is_definitive_unauthorized());
}

#[test]
fn server_errors_map_to_server_error() {
    assert_eq!(classify_failure(Endpoint::CurrentUser, 503, None, ""), AuthError::ServerError { status: 503 });
    assert_eq!(classify_failure(Endpoint::Logout, 404, None, ""), AuthError::ServerError { status: 404 });
    assert!(!AuthError::ServerError { status: 500 }.is_definitive_unauthorized());
}

#[test]
fn register_400_parses_json_message_and_fields() {
    let body = r#"{"message":"Username taken","errors":{"username":"already exists","email":"invalid"}}"#;
    let err = classify_failure(Endpoint::Register, 400, Some("application/json"), body);
    let AuthError::ValidationFailed { message, fields } = err else {
        panic!("expected validation failure");
    };
    assert_eq!(message, "Username taken");
    assert_eq!(fields.get("username").map(String::as_str), Some("already exists"));
    assert_eq!(fields.len(), 2);
}

#[test]
fn register_409_plain_text_is_validation_failure() {
    let err = classify_failure(Endpoint::Register, 409, Some("text/plain"), "Email already registered");
    assert_eq!(
        err,
        AuthError::ValidationFailed { message: "Email already registered".to_owned(), fields: BTreeMap::new() }
    );
    assert_eq!(err.user_message(), "Email already registered");
}

#[test]
fn validation_failure_without_message_has_generic_copy() {
    let err = parse_validation_body(None, "");
    assert_eq!(err.user_message(), "Please check the form fields and try again.");
}

#[test]
fn endpoint_paths_match_backend_routes() {
    assert_eq!(Endpoint::CheckSession.path(), "/auth/check-session");
    assert_eq!(Endpoint::CurrentUser.path(), "/users/me");
    assert_eq!(Endpoint::RefreshToken.path(), "/auth/refresh-token");
    assert_eq!(Endpoint::CurrentUser.method(), "GET");
    assert_eq!(Endpoint::Logout.method(), "POST");
}

#[test]
fn is_success_covers_2xx_only() {
    assert!(is_success(200));
    assert!(is_success(204));
    assert!(!is_success(199));
    assert!(!is_success(301));
}
