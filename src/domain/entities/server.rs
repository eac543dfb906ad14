//! Server entity and repository trait.
//!
//! Maps to the `servers` table in the database schema. Membership lives in
//! the `server_members` join table; the listing operation consumes servers
//! together with their member id sets (`ServerRecord`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a server (community space) in the chat system.
///
/// Maps to the `servers` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - name: VARCHAR(100) NOT NULL
/// - owner_id: BIGINT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE
/// - category_id: BIGINT NULL REFERENCES categories(id) ON DELETE SET NULL
/// - description: VARCHAR(250) NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    /// Auto-assigned identifier (primary key)
    pub id: i64,

    /// Server name (1-100 characters)
    pub name: String,

    /// Account id of the server owner
    pub owner_id: i64,

    /// Optional category this server belongs to
    pub category_id: Option<i64>,

    /// Short description (at most 250 characters)
    pub description: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Server {
    /// Check if an account is the owner of this server.
    pub fn is_owner(&self, account_id: i64) -> bool {
        self.owner_id == account_id
    }
}

/// Fields for creating a new server. The creator becomes the owner and the
/// first member; the id is database-assigned.
#[derive(Debug, Clone)]
pub struct NewServer {
    pub name: String,
    pub owner_id: i64,
    pub category_id: Option<i64>,
    pub description: Option<String>,
}

/// Partial update for a server. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ServerPatch {
    pub name: Option<String>,
    pub category_id: Option<Option<i64>>,
    pub description: Option<String>,
}

/// Lightweight reference to the category a server belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
}

/// A server joined with its category reference and member id set, as
/// consumed by the listing pipeline. Read-only: the pipeline never writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRecord {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub category: Option<CategoryRef>,
    pub description: Option<String>,
    /// Account ids of all members, in no particular order.
    pub member_ids: Vec<i64>,
}

impl ServerRecord {
    /// Check whether an account belongs to this server's member set.
    pub fn has_member(&self, account_id: i64) -> bool {
        self.member_ids.contains(&account_id)
    }
}

/// Repository trait for Server data access operations.
#[async_trait]
pub trait ServerRepository: Send + Sync {
    /// Find a server by its id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Server>, AppError>;

    /// Fetch all servers with category references and member id sets,
    /// in storage order (ascending id).
    async fn list_with_members(&self) -> Result<Vec<ServerRecord>, AppError>;

    /// Create a new server and enroll the owner as its first member.
    async fn create(&self, server: &NewServer) -> Result<Server, AppError>;

    /// Apply a partial update to an existing server.
    async fn update(&self, id: i64, patch: &ServerPatch) -> Result<Server, AppError>;

    /// Delete a server (cascading delete of channels and memberships).
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
