//! Server Handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{CreateServerRequest, UpdateServerRequest};
use crate::application::dto::response::{ServerListingResponse, ServerResponse};
use crate::application::server_filter::ServerListParams;
use crate::application::services::{
    CreateServerDto, ServerError, ServerService, ServerServiceImpl, UpdateServerDto,
};
use crate::infrastructure::repositories::PgServerRepository;
use crate::presentation::middleware::{AuthAccount, MaybeAuthAccount};
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn server_service(state: &AppState) -> ServerServiceImpl<PgServerRepository> {
    ServerServiceImpl::new(Arc::new(PgServerRepository::new(state.db.clone())))
}

fn map_server_error(e: ServerError) -> AppError {
    match e {
        ServerError::NotFound => AppError::NotFound("Server not found".into()),
        ServerError::Forbidden => AppError::Forbidden("Permission denied".into()),
        ServerError::Filter(f) => f.into(),
        e => AppError::Internal(e.to_string()),
    }
}

/// List servers with optional filters.
///
/// Query parameters: `category`, `qty`, `by_user`, `by_serverid`,
/// `with_num_members`. Raw parameters go through `ServerListParams` so
/// that malformed values surface as this API's validation failures
/// rather than the framework's extractor rejections.
pub async fn list_servers(
    State(state): State<AppState>,
    Extension(MaybeAuthAccount(auth)): Extension<MaybeAuthAccount>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<ServerListingResponse>>, AppError> {
    let params = ServerListParams::from_query(&params);
    let caller = auth.map(|a| a.account_id);

    let listings = server_service(&state)
        .list_servers(&params, caller)
        .await
        .map_err(map_server_error)?;

    let responses: Vec<ServerListingResponse> = listings
        .into_iter()
        .map(ServerListingResponse::from)
        .collect();

    Ok(Json(responses))
}

/// Create a new server
pub async fn create_server(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Json(body): Json<CreateServerRequest>,
) -> Result<(StatusCode, Json<ServerResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let request = CreateServerDto {
        name: body.name,
        category_id: body.category_id,
        description: body.description,
    };

    let server = server_service(&state)
        .create_server(auth.account_id, request)
        .await
        .map_err(map_server_error)?;

    Ok((StatusCode::CREATED, Json(ServerResponse::from(server))))
}

/// Get server by ID
pub async fn get_server(
    State(state): State<AppState>,
    Path(server_id): Path<i64>,
) -> Result<Json<ServerResponse>, AppError> {
    let server = server_service(&state)
        .get_server(server_id)
        .await
        .map_err(map_server_error)?;

    Ok(Json(ServerResponse::from(server)))
}

/// Update server (owner only)
pub async fn update_server(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Path(server_id): Path<i64>,
    Json(body): Json<UpdateServerRequest>,
) -> Result<Json<ServerResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let update = UpdateServerDto {
        name: body.name,
        category_id: body.category_id.map(Some),
        description: body.description,
    };

    let server = server_service(&state)
        .update_server(server_id, auth.account_id, update)
        .await
        .map_err(map_server_error)?;

    Ok(Json(ServerResponse::from(server)))
}

/// Delete server (owner only)
pub async fn delete_server(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Path(server_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    server_service(&state)
        .delete_server(server_id, auth.account_id)
        .await
        .map_err(map_server_error)?;

    Ok(StatusCode::NO_CONTENT)
}
