//! Channel Handlers

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{CreateChannelRequest, UpdateChannelRequest};
use crate::application::dto::response::ChannelResponse;
use crate::application::services::{
    ChannelError, ChannelService, ChannelServiceImpl, CreateChannelDto, UpdateChannelDto,
};
use crate::infrastructure::repositories::{PgChannelRepository, PgServerRepository};
use crate::presentation::middleware::AuthAccount;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn channel_service(
    state: &AppState,
) -> ChannelServiceImpl<PgChannelRepository, PgServerRepository> {
    ChannelServiceImpl::new(
        Arc::new(PgChannelRepository::new(state.db.clone())),
        Arc::new(PgServerRepository::new(state.db.clone())),
    )
}

fn map_channel_error(e: ChannelError) -> AppError {
    match e {
        ChannelError::NotFound => AppError::NotFound("Channel not found".into()),
        ChannelError::ServerNotFound => AppError::NotFound("Server not found".into()),
        ChannelError::Forbidden => AppError::Forbidden("Permission denied".into()),
        e => AppError::Internal(e.to_string()),
    }
}

/// List channels in a server
pub async fn list_server_channels(
    State(state): State<AppState>,
    Path(server_id): Path<i64>,
) -> Result<Json<Vec<ChannelResponse>>, AppError> {
    let channels = channel_service(&state)
        .list_server_channels(server_id)
        .await
        .map_err(map_channel_error)?;

    let responses: Vec<ChannelResponse> =
        channels.into_iter().map(ChannelResponse::from).collect();

    Ok(Json(responses))
}

/// Create a channel in a server
pub async fn create_channel(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Path(server_id): Path<i64>,
    Json(body): Json<CreateChannelRequest>,
) -> Result<(StatusCode, Json<ChannelResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let request = CreateChannelDto {
        name: body.name,
        topic: body.topic,
    };

    let channel = channel_service(&state)
        .create_channel(server_id, auth.account_id, request)
        .await
        .map_err(map_channel_error)?;

    Ok((StatusCode::CREATED, Json(ChannelResponse::from(channel))))
}

/// Get channel by ID
pub async fn get_channel(
    State(state): State<AppState>,
    Path(channel_id): Path<i64>,
) -> Result<Json<ChannelResponse>, AppError> {
    let channel = channel_service(&state)
        .get_channel(channel_id)
        .await
        .map_err(map_channel_error)?;

    Ok(Json(ChannelResponse::from(channel)))
}

/// Update channel (owner only)
pub async fn update_channel(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Path(channel_id): Path<i64>,
    Json(body): Json<UpdateChannelRequest>,
) -> Result<Json<ChannelResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let update = UpdateChannelDto {
        name: body.name,
        topic: body.topic,
    };

    let channel = channel_service(&state)
        .update_channel(channel_id, auth.account_id, update)
        .await
        .map_err(map_channel_error)?;

    Ok(Json(ChannelResponse::from(channel)))
}

/// Delete channel (owner only)
pub async fn delete_channel(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Path(channel_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    channel_service(&state)
        .delete_channel(channel_id, auth.account_id)
        .await
        .map_err(map_channel_error)?;

    Ok(StatusCode::NO_CONTENT)
}
