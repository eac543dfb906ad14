//! Category entity and repository trait.
//!
//! Maps to the `categories` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a topical grouping that servers may belong to.
///
/// Maps to the `categories` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - name: VARCHAR(100) NOT NULL
/// - description: TEXT NULL
/// - icon: TEXT NULL -- path/URL to an icon resource
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Auto-assigned identifier (primary key)
    pub id: i64,

    /// Category name (1-100 characters)
    pub name: String,

    /// Optional long-form description
    pub description: Option<String>,

    /// Optional icon resource reference
    pub icon: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a new category. The id is database-assigned.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// Partial update for a category. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// Repository trait for Category data access operations.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Find a category by its id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, AppError>;

    /// List all categories in storage order.
    async fn find_all(&self) -> Result<Vec<Category>, AppError>;

    /// Create a new category.
    async fn create(&self, category: &NewCategory) -> Result<Category, AppError>;

    /// Apply a partial update to an existing category.
    async fn update(&self, id: i64, patch: &CategoryPatch) -> Result<Category, AppError>;

    /// Delete a category. Servers referencing it keep running with a
    /// null category (SET NULL foreign key).
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
