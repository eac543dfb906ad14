//! CRUD Authentication & Validation Tests
//!
//! Mutating endpoints require a valid bearer token, and request-body
//! validation answers before storage is consulted.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{body_json, token_for, TestApp};

#[tokio::test]
async fn create_server_without_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/v1/servers", r#"{"name": "my server"}"#)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_category_with_invalid_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app
        .post_json_auth("/api/v1/categories", r#"{"name": "gaming"}"#, "bogus")
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_server_with_empty_name_is_rejected() {
    let app = TestApp::new();

    let response = app
        .post_json_auth("/api/v1/servers", r#"{"name": ""}"#, &token_for(7))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_category_with_bad_icon_extension_is_rejected() {
    let app = TestApp::new();

    let response = app
        .post_json_auth(
            "/api/v1/categories",
            r#"{"name": "gaming", "icon": "icon.svg"}"#,
            &token_for(7),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid image file extension");
}

#[tokio::test]
async fn create_channel_without_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/api/v1/servers/1/channels",
            r#"{"name": "General", "topic": "anything"}"#,
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
