//! Tests for the auth module

use super::*;
use base64::Engine;

#[test]
fn test_build_auth_header_known_value() {
    let headers = build_auth_header("abc", "xyz");
    assert_eq!(headers.len(), 1);
    assert_eq!(
        headers.get(AUTHORIZATION).map(String::as_str),
        Some("Basic YWJjOnh5eg==")
    );
}

#[test]
fn test_build_auth_header_round_trips_credentials() {
    let headers = build_auth_header("app-123", "s3cr3t:with:colons");
    let value = headers.get(AUTHORIZATION).unwrap();
    let encoded = value.strip_prefix("Basic ").unwrap();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .unwrap();
    assert_eq!(
        String::from_utf8(decoded).unwrap(),
        "app-123:s3cr3t:with:colons"
    );
}

#[test]
fn test_build_auth_header_empty_credentials_not_rejected() {
    // base64(":") == "Og=="
    let headers = build_auth_header("", "");
    assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Basic Og==");
}

#[test]
fn test_build_auth_header_is_deterministic() {
    assert_eq!(build_auth_header("a", "b"), build_auth_header("a", "b"));
}

#[test]
fn test_authenticator_apply() {
    let auth = BasicAuthenticator::new("user", "pass");

    let client = reqwest::Client::new();
    let req = auth.apply(client.get("https://example.com/api"));

    let built = req.build().unwrap();
    let auth_header = built
        .headers()
        .get("Authorization")
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(auth_header, "Basic dXNlcjpwYXNz");
}

#[test]
fn test_authenticator_debug_redacts_secret() {
    let auth = BasicAuthenticator::new("my-app", "do-not-print");
    let debug = format!("{auth:?}");
    assert!(debug.contains("my-app"));
    assert!(!debug.contains("do-not-print"));
    assert_eq!(auth.app_id(), "my-app");
}
