//! Tests for the auth module

use super::*;
use crate::types::UserId;
use pretty_assertions::assert_eq;
use url::Url;

#[test]
fn test_authorization_header_is_bearer_and_sensitive() {
    let auth = AuthContext::new("secret-token");
    let header = auth.authorization_header().unwrap();
    assert_eq!(header.to_str().unwrap(), "Bearer secret-token");
    assert!(header.is_sensitive());
}

#[test]
fn test_invalid_token_is_rejected() {
    let auth = AuthContext::new("bad\ntoken");
    assert!(auth.authorization_header().is_err());
}

#[test]
fn test_debug_redacts_token() {
    let auth = AuthContext::new("secret-token");
    let debug = format!("{auth:?}");
    assert!(!debug.contains("secret-token"));
    assert!(debug.contains("[REDACTED]"));
}

#[test]
fn test_begin_and_end_impersonation() {
    let mut auth = AuthContext::new("t");
    assert!(!auth.is_impersonating());

    assert_eq!(auth.begin_impersonation(42u64), None);
    assert_eq!(auth.acting_as(), Some(&UserId::from(42u64)));

    assert_eq!(auth.end_impersonation(), Some(UserId::from(42u64)));
    assert!(auth.acting_as().is_none());
}

#[test]
fn test_end_impersonation_is_idempotent() {
    let mut auth = AuthContext::new("t");
    assert_eq!(auth.end_impersonation(), None);
    assert_eq!(auth.end_impersonation(), None);
    assert!(!auth.is_impersonating());
}

#[test]
fn test_second_begin_overwrites_without_stack() {
    let mut auth = AuthContext::new("t");
    auth.begin_impersonation(1u64);
    let replaced = auth.begin_impersonation(2u64);
    assert_eq!(replaced, Some(UserId::from(1u64)));
    assert_eq!(auth.acting_as(), Some(&UserId::from(2u64)));

    auth.end_impersonation();
    assert!(auth.acting_as().is_none());
}

#[test]
fn test_detached_drops_impersonation() {
    let mut auth = AuthContext::new("t");
    auth.begin_impersonation(7u64);
    let fresh = auth.detached();
    assert!(!fresh.is_impersonating());
    assert_eq!(
        fresh.authorization_header().unwrap(),
        auth.authorization_header().unwrap()
    );
}

#[test]
fn test_apply_impersonation_appends_param() {
    let mut auth = AuthContext::new("t");
    auth.begin_impersonation(UserId::sis("A1"));

    let mut url = Url::parse("https://canvas.test/api/v1/courses?per_page=10").unwrap();
    auth.apply_impersonation(&mut url);
    assert_eq!(
        url.as_str(),
        "https://canvas.test/api/v1/courses?per_page=10&as_user_id=sis_user_id%3AA1"
    );
}

#[test]
fn test_apply_impersonation_replaces_echoed_param() {
    let mut auth = AuthContext::new("t");
    auth.begin_impersonation(9u64);

    let mut url = Url::parse("https://canvas.test/api/v1/users?as_user_id=3&page=2").unwrap();
    auth.apply_impersonation(&mut url);
    assert_eq!(url.as_str(), "https://canvas.test/api/v1/users?page=2&as_user_id=9");
}

#[test]
fn test_stripping_echoed_param_keeps_server_encoding() {
    let mut auth = AuthContext::new("t");

    let mut url = Url::parse(
        "https://canvas.test/api/v1/courses?search_term=intro%20bio&as_user_id=3&page=bookmark:WzEsMl0",
    )
    .unwrap();
    auth.apply_impersonation(&mut url);
    assert_eq!(
        url.as_str(),
        "https://canvas.test/api/v1/courses?search_term=intro%20bio&page=bookmark:WzEsMl0"
    );

    auth.begin_impersonation(5u64);
    let mut url =
        Url::parse("https://canvas.test/api/v1/courses?as_user_id=3&search_term=a%2Bb").unwrap();
    auth.apply_impersonation(&mut url);
    assert_eq!(
        url.as_str(),
        "https://canvas.test/api/v1/courses?search_term=a%2Bb&as_user_id=5"
    );
}

#[test]
fn test_apply_without_impersonation_strips_param() {
    let auth = AuthContext::new("t");

    let mut url = Url::parse("https://canvas.test/api/v1/users?as_user_id=3").unwrap();
    auth.apply_impersonation(&mut url);
    assert_eq!(url.as_str(), "https://canvas.test/api/v1/users");

    let mut untouched = Url::parse("https://canvas.test/api/v1/users?page=bookmark:abc").unwrap();
    auth.apply_impersonation(&mut untouched);
    assert_eq!(untouched.as_str(), "https://canvas.test/api/v1/users?page=bookmark:abc");
}
