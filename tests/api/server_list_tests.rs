//! Server Listing API Tests
//!
//! Exercises the listing endpoint's authentication and validation
//! behavior over HTTP. These paths all answer before storage is
//! consulted; the full filter semantics are covered by the pipeline's
//! unit tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{body_json, token_for, TestApp};

#[tokio::test]
async fn by_user_without_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app.get("/api/v1/servers?by_user=true").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn by_serverid_without_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app.get("/api/v1/servers?by_serverid=42").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn authentication_failure_wins_over_malformed_serverid() {
    let app = TestApp::new();

    // 401, not 400: the capability check runs before value parsing
    let response = app.get("/api/v1/servers?by_serverid=abc").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_serverid_with_token_is_a_value_error() {
    let app = TestApp::new();

    let response = app
        .get_auth("/api/v1/servers?by_serverid=abc", &token_for(7))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Value error");
}

#[tokio::test]
async fn malformed_qty_is_a_value_error() {
    let app = TestApp::new();

    let response = app.get("/api/v1/servers?qty=lots").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Value error");
}

#[tokio::test]
async fn by_user_with_garbage_token_is_unauthorized() {
    let app = TestApp::new();

    // A garbage token must not satisfy the capability check
    let response = app
        .get_auth("/api/v1/servers?by_user=true", "not-a-real-token")
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
