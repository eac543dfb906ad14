//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use super::handlers;
use crate::presentation::middleware::{auth_middleware, optional_auth_middleware};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        .with_state(state)
}

/// API v1 routes
///
/// Read endpoints are public; the server listing additionally sees the
/// caller's identity when a valid token is present, because its
/// identity-scoped filters gate themselves. Mutations require
/// authentication.
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(public_routes(state.clone()))
        .merge(protected_routes(state))
}

/// Public read routes (identity attached opportunistically)
fn public_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/servers", get(handlers::server::list_servers))
        .route("/servers/{server_id}", get(handlers::server::get_server))
        .route(
            "/servers/{server_id}/channels",
            get(handlers::channel::list_server_channels),
        )
        .route("/categories", get(handlers::category::list_categories))
        .route(
            "/categories/{category_id}",
            get(handlers::category::get_category),
        )
        .route("/channels/{channel_id}", get(handlers::channel::get_channel))
        .route_layer(middleware::from_fn_with_state(
            state,
            optional_auth_middleware,
        ))
}

/// Protected mutation routes (require authentication)
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/servers", post(handlers::server::create_server))
        .route("/servers/{server_id}", patch(handlers::server::update_server))
        .route(
            "/servers/{server_id}",
            delete(handlers::server::delete_server),
        )
        .route(
            "/servers/{server_id}/channels",
            post(handlers::channel::create_channel),
        )
        .route("/categories", post(handlers::category::create_category))
        .route(
            "/categories/{category_id}",
            patch(handlers::category::update_category),
        )
        .route(
            "/categories/{category_id}",
            delete(handlers::category::delete_category),
        )
        .route(
            "/channels/{channel_id}",
            patch(handlers::channel::update_channel),
        )
        .route(
            "/channels/{channel_id}",
            delete(handlers::channel::delete_channel),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
