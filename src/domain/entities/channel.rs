//! Channel entity and repository trait.
//!
//! Maps to the `channels` table in the database schema. A channel always
//! belongs to exactly one server and one owner account; names are stored
//! lowercase.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a channel within a server.
///
/// Maps to the `channels` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - name: VARCHAR(100) NOT NULL -- stored lowercase
/// - owner_id: BIGINT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE
/// - topic: VARCHAR(100) NOT NULL
/// - server_id: BIGINT NOT NULL REFERENCES servers(id) ON DELETE CASCADE
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    /// Auto-assigned identifier (primary key)
    pub id: i64,

    /// Channel name (1-100 characters, lowercase)
    pub name: String,

    /// Account id of the channel owner
    pub owner_id: i64,

    /// Channel topic (at most 100 characters)
    pub topic: String,

    /// Server this channel belongs to
    pub server_id: i64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Channel {
    /// Check if an account is the owner of this channel.
    pub fn is_owner(&self, account_id: i64) -> bool {
        self.owner_id == account_id
    }
}

/// Fields for creating a new channel. The id is database-assigned.
#[derive(Debug, Clone)]
pub struct NewChannel {
    pub name: String,
    pub owner_id: i64,
    pub topic: String,
    pub server_id: i64,
}

/// Partial update for a channel. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ChannelPatch {
    pub name: Option<String>,
    pub topic: Option<String>,
}

/// Repository trait for Channel data access operations.
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Find a channel by its id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Channel>, AppError>;

    /// Find all channels in a server, in storage order.
    async fn find_by_server_id(&self, server_id: i64) -> Result<Vec<Channel>, AppError>;

    /// Create a new channel.
    async fn create(&self, channel: &NewChannel) -> Result<Channel, AppError>;

    /// Apply a partial update to an existing channel.
    async fn update(&self, id: i64, patch: &ChannelPatch) -> Result<Channel, AppError>;

    /// Delete a channel.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
