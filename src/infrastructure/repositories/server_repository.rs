//! Server Repository Implementation
//!
//! PostgreSQL implementation of the ServerRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{
    CategoryRef, NewServer, Server, ServerPatch, ServerRecord, ServerRepository,
};
use crate::shared::error::AppError;

/// Database row representation matching the servers table schema.
#[derive(Debug, sqlx::FromRow)]
struct ServerRow {
    id: i64,
    name: String,
    owner_id: i64,
    category_id: Option<i64>,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ServerRow {
    fn into_server(self) -> Server {
        Server {
            id: self.id,
            name: self.name,
            owner_id: self.owner_id,
            category_id: self.category_id,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Listing row: server joined with its category name and aggregated
/// member ids.
#[derive(Debug, sqlx::FromRow)]
struct ServerRecordRow {
    id: i64,
    name: String,
    owner_id: i64,
    category_id: Option<i64>,
    category_name: Option<String>,
    description: Option<String>,
    member_ids: Vec<i64>,
}

impl ServerRecordRow {
    fn into_record(self) -> ServerRecord {
        let category = match (self.category_id, self.category_name) {
            (Some(id), Some(name)) => Some(CategoryRef { id, name }),
            _ => None,
        };
        ServerRecord {
            id: self.id,
            name: self.name,
            owner_id: self.owner_id,
            category,
            description: self.description,
            member_ids: self.member_ids,
        }
    }
}

/// PostgreSQL server repository implementation.
#[derive(Clone)]
pub struct PgServerRepository {
    pool: PgPool,
}

impl PgServerRepository {
    /// Create a new PgServerRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServerRepository for PgServerRepository {
    /// Find a server by its ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Server>, AppError> {
        let row = sqlx::query_as::<_, ServerRow>(
            r#"
            SELECT id, name, owner_id, category_id, description, created_at, updated_at
            FROM servers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_server()))
    }

    /// Fetch all servers with category references and member id sets,
    /// in storage order (ascending id). One query feeds the whole
    /// listing pipeline.
    async fn list_with_members(&self) -> Result<Vec<ServerRecord>, AppError> {
        let rows = sqlx::query_as::<_, ServerRecordRow>(
            r#"
            SELECT s.id,
                   s.name,
                   s.owner_id,
                   s.category_id,
                   c.name AS category_name,
                   s.description,
                   COALESCE(
                       ARRAY_AGG(sm.account_id) FILTER (WHERE sm.account_id IS NOT NULL),
                       '{}'
                   ) AS member_ids
            FROM servers s
            LEFT JOIN categories c ON c.id = s.category_id
            LEFT JOIN server_members sm ON sm.server_id = s.id
            GROUP BY s.id, s.name, s.owner_id, s.category_id, c.name, s.description
            ORDER BY s.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_record()).collect())
    }

    /// Create a new server and enroll the owner as its first member.
    async fn create(&self, server: &NewServer) -> Result<Server, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ServerRow>(
            r#"
            INSERT INTO servers (name, owner_id, category_id, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, owner_id, category_id, description, created_at, updated_at
            "#,
        )
        .bind(&server.name)
        .bind(server.owner_id)
        .bind(server.category_id)
        .bind(&server.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::Validation("Unknown owner or category reference".to_string())
            }
            _ => AppError::Database(e),
        })?;

        // Owner joins as the first member
        sqlx::query(
            r#"
            INSERT INTO server_members (server_id, account_id)
            VALUES ($1, $2)
            ON CONFLICT (server_id, account_id) DO NOTHING
            "#,
        )
        .bind(row.id)
        .bind(server.owner_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into_server())
    }

    /// Apply a partial update to an existing server.
    async fn update(&self, id: i64, patch: &ServerPatch) -> Result<Server, AppError> {
        let row = sqlx::query_as::<_, ServerRow>(
            r#"
            UPDATE servers
            SET name = COALESCE($2, name),
                category_id = CASE WHEN $3 THEN $4 ELSE category_id END,
                description = COALESCE($5, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, owner_id, category_id, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(patch.category_id.is_some())
        .bind(patch.category_id.flatten())
        .bind(&patch.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Server with id {} not found", id)))?;

        Ok(row.into_server())
    }

    /// Delete a server (memberships and channels cascade).
    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM servers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Server with id {} not found", id)));
        }

        Ok(())
    }
}
