//! Tests for pagination module

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

// ============================================================================
// next_page_token Tests
// ============================================================================

#[test]
fn test_next_page_token_reads_offset() {
    let body = json!({
        "data": [],
        "meta": {"next": {"offset": 42}, "total_count": 300}
    });
    assert_eq!(next_page_token(&body), Some(PageCursor::new(42)));
}

#[test]
fn test_next_page_token_accepts_digit_string() {
    let body = json!({"meta": {"next": {"offset": "200"}}});
    assert_eq!(next_page_token(&body), Some(PageCursor::new(200)));
}

#[test_case(json!({}) ; "no meta")]
#[test_case(json!({"meta": {}}) ; "no next")]
#[test_case(json!({"meta": {"next": {}}}) ; "no offset")]
#[test_case(json!({"meta": null}) ; "null meta")]
#[test_case(json!({"meta": "oops"}) ; "meta not an object")]
#[test_case(json!({"meta": {"next": "100"}}) ; "next not an object")]
#[test_case(json!({"meta": {"next": {"offset": null}}}) ; "null offset")]
#[test_case(json!({"meta": {"next": {"offset": -5}}}) ; "negative offset")]
#[test_case(json!({"meta": {"next": {"offset": 1.5}}}) ; "float offset")]
#[test_case(json!({"meta": {"next": {"offset": "abc"}}}) ; "non numeric string")]
#[test_case(json!({"meta": {"next": {"offset": {"n": 1}}}}) ; "object offset")]
#[test_case(json!([1, 2, 3]) ; "array body")]
#[test_case(json!(null) ; "null body")]
fn test_next_page_token_none(body: serde_json::Value) {
    assert_eq!(next_page_token(&body), None);
}

// ============================================================================
// build_params Tests
// ============================================================================

#[test]
fn test_build_params_first_page() {
    let params = build_params(None);
    assert_eq!(params.len(), 1);
    assert_eq!(params.get("per_page").map(String::as_str), Some("100"));
    assert!(!params.contains_key("offset"));
}

#[test]
fn test_build_params_with_cursor() {
    let params = build_params(Some(&PageCursor::new(42)));
    assert_eq!(params.len(), 2);
    assert_eq!(params.get("per_page").map(String::as_str), Some("100"));
    assert_eq!(params.get("offset").map(String::as_str), Some("42"));
}

#[test]
fn test_build_params_echoes_server_offset() {
    let body = json!({"meta": {"next": {"offset": 25}}});
    let cursor = next_page_token(&body);
    let params = build_params(cursor.as_ref());
    assert_eq!(params.get("offset").map(String::as_str), Some("25"));
}

// ============================================================================
// NextPage Tests
// ============================================================================

#[test]
fn test_next_page_from_cursor() {
    let next = NextPage::from_cursor(Some(PageCursor::new(100)));
    assert!(!next.is_done());
    assert_eq!(next.cursor(), Some(PageCursor::new(100)));

    let done = NextPage::from_cursor(None);
    assert!(done.is_done());
    assert_eq!(done.cursor(), None);
}
