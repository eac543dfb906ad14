//! Category Service
//!
//! Category management operations.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Category, CategoryPatch, CategoryRepository, NewCategory};
use crate::shared::validation::has_allowed_icon_extension;

/// Category service trait
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// List all categories
    async fn list_categories(&self) -> Result<Vec<Category>, CategoryError>;

    /// Get a category by id
    async fn get_category(&self, category_id: i64) -> Result<Category, CategoryError>;

    /// Create a category
    async fn create_category(&self, request: CreateCategoryDto) -> Result<Category, CategoryError>;

    /// Update a category
    async fn update_category(
        &self,
        category_id: i64,
        update: UpdateCategoryDto,
    ) -> Result<Category, CategoryError>;

    /// Delete a category; referencing servers fall back to a null category
    async fn delete_category(&self, category_id: i64) -> Result<(), CategoryError>;
}

/// Create category request
#[derive(Debug, Clone)]
pub struct CreateCategoryDto {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// Update category request
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// Category service errors
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("Category not found")]
    NotFound,

    #[error("Invalid image file extension")]
    InvalidIcon,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// CategoryService implementation
pub struct CategoryServiceImpl<R>
where
    R: CategoryRepository,
{
    category_repo: Arc<R>,
}

impl<R> CategoryServiceImpl<R>
where
    R: CategoryRepository,
{
    pub fn new(category_repo: Arc<R>) -> Self {
        Self { category_repo }
    }

    fn check_icon(icon: Option<&str>) -> Result<(), CategoryError> {
        match icon {
            Some(path) if !has_allowed_icon_extension(path) => Err(CategoryError::InvalidIcon),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<R> CategoryService for CategoryServiceImpl<R>
where
    R: CategoryRepository + 'static,
{
    async fn list_categories(&self) -> Result<Vec<Category>, CategoryError> {
        self.category_repo
            .find_all()
            .await
            .map_err(|e| CategoryError::Internal(e.to_string()))
    }

    async fn get_category(&self, category_id: i64) -> Result<Category, CategoryError> {
        self.category_repo
            .find_by_id(category_id)
            .await
            .map_err(|e| CategoryError::Internal(e.to_string()))?
            .ok_or(CategoryError::NotFound)
    }

    async fn create_category(&self, request: CreateCategoryDto) -> Result<Category, CategoryError> {
        Self::check_icon(request.icon.as_deref())?;

        let category = NewCategory {
            name: request.name,
            description: request.description,
            icon: request.icon,
        };

        self.category_repo
            .create(&category)
            .await
            .map_err(|e| CategoryError::Internal(e.to_string()))
    }

    async fn update_category(
        &self,
        category_id: i64,
        update: UpdateCategoryDto,
    ) -> Result<Category, CategoryError> {
        Self::check_icon(update.icon.as_deref())?;

        self.category_repo
            .find_by_id(category_id)
            .await
            .map_err(|e| CategoryError::Internal(e.to_string()))?
            .ok_or(CategoryError::NotFound)?;

        let patch = CategoryPatch {
            name: update.name,
            description: update.description,
            icon: update.icon,
        };

        self.category_repo
            .update(category_id, &patch)
            .await
            .map_err(|e| CategoryError::Internal(e.to_string()))
    }

    async fn delete_category(&self, category_id: i64) -> Result<(), CategoryError> {
        self.category_repo
            .find_by_id(category_id)
            .await
            .map_err(|e| CategoryError::Internal(e.to_string()))?
            .ok_or(CategoryError::NotFound)?;

        self.category_repo
            .delete(category_id)
            .await
            .map_err(|e| CategoryError::Internal(e.to_string()))
    }
}
