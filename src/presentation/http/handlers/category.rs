//! Category Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::application::dto::response::CategoryResponse;
use crate::application::services::{
    CategoryError, CategoryService, CategoryServiceImpl, CreateCategoryDto, UpdateCategoryDto,
};
use crate::infrastructure::repositories::PgCategoryRepository;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn category_service(state: &AppState) -> CategoryServiceImpl<PgCategoryRepository> {
    CategoryServiceImpl::new(Arc::new(PgCategoryRepository::new(state.db.clone())))
}

fn map_category_error(e: CategoryError) -> AppError {
    match e {
        CategoryError::NotFound => AppError::NotFound("Category not found".into()),
        CategoryError::InvalidIcon => AppError::Validation("Invalid image file extension".into()),
        e => AppError::Internal(e.to_string()),
    }
}

/// List all categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = category_service(&state)
        .list_categories()
        .await
        .map_err(map_category_error)?;

    let responses: Vec<CategoryResponse> =
        categories.into_iter().map(CategoryResponse::from).collect();

    Ok(Json(responses))
}

/// Get category by ID
pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<Json<CategoryResponse>, AppError> {
    let category = category_service(&state)
        .get_category(category_id)
        .await
        .map_err(map_category_error)?;

    Ok(Json(CategoryResponse::from(category)))
}

/// Create a new category
pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let request = CreateCategoryDto {
        name: body.name,
        description: body.description,
        icon: body.icon,
    };

    let category = category_service(&state)
        .create_category(request)
        .await
        .map_err(map_category_error)?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

/// Update category
pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
    Json(body): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let update = UpdateCategoryDto {
        name: body.name,
        description: body.description,
        icon: body.icon,
    };

    let category = category_service(&state)
        .update_category(category_id, update)
        .await
        .map_err(map_category_error)?;

    Ok(Json(CategoryResponse::from(category)))
}

/// Delete category; servers referencing it fall back to a null category
pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    category_service(&state)
        .delete_category(category_id)
        .await
        .map_err(map_category_error)?;

    Ok(StatusCode::NO_CONTENT)
}
