//! Response DTOs
//!
//! Data structures for API response bodies.

use serde::Serialize;

use crate::application::server_filter::ServerListing;
use crate::domain::{Category, CategoryRef, Channel, Server};

/// Category response
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub created_at: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            icon: category.icon,
            created_at: category.created_at.to_rfc3339(),
        }
    }
}

/// Server response (CRUD surface)
#[derive(Debug, Serialize)]
pub struct ServerResponse {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Server> for ServerResponse {
    fn from(server: Server) -> Self {
        Self {
            id: server.id,
            name: server.name,
            owner_id: server.owner_id,
            category_id: server.category_id,
            description: server.description,
            created_at: server.created_at.to_rfc3339(),
            updated_at: server.updated_at.to_rfc3339(),
        }
    }
}

/// Category reference embedded in listing entries
#[derive(Debug, Serialize)]
pub struct CategoryRefResponse {
    pub id: i64,
    pub name: String,
}

impl From<CategoryRef> for CategoryRefResponse {
    fn from(category: CategoryRef) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

/// One entry of the server listing endpoint.
///
/// `num_members` appears only when `with_num_members=true` was requested;
/// otherwise the field is omitted entirely.
#[derive(Debug, Serialize)]
pub struct ServerListingResponse {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub category: Option<CategoryRefResponse>,
    pub description: Option<String>,
    pub members: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_members: Option<i64>,
}

impl From<ServerListing> for ServerListingResponse {
    fn from(listing: ServerListing) -> Self {
        Self {
            id: listing.server.id,
            name: listing.server.name,
            owner_id: listing.server.owner_id,
            category: listing.server.category.map(CategoryRefResponse::from),
            description: listing.server.description,
            members: listing.server.member_ids,
            num_members: listing.num_members,
        }
    }
}

/// Channel response
#[derive(Debug, Serialize)]
pub struct ChannelResponse {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub topic: String,
    pub server_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Channel> for ChannelResponse {
    fn from(channel: Channel) -> Self {
        Self {
            id: channel.id,
            name: channel.name,
            owner_id: channel.owner_id,
            topic: channel.topic,
            server_id: channel.server_id,
            created_at: channel.created_at.to_rfc3339(),
            updated_at: channel.updated_at.to_rfc3339(),
        }
    }
}
