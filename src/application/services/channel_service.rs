//! Channel Service
//!
//! Channel management operations within servers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    Channel, ChannelPatch, ChannelRepository, NewChannel, ServerRepository,
};

/// Channel service trait
#[async_trait]
pub trait ChannelService: Send + Sync {
    /// List channels in a server
    async fn list_server_channels(&self, server_id: i64) -> Result<Vec<Channel>, ChannelError>;

    /// Get a channel by id
    async fn get_channel(&self, channel_id: i64) -> Result<Channel, ChannelError>;

    /// Create a channel in a server; the creator becomes the owner
    async fn create_channel(
        &self,
        server_id: i64,
        owner_id: i64,
        request: CreateChannelDto,
    ) -> Result<Channel, ChannelError>;

    /// Update a channel (owner only)
    async fn update_channel(
        &self,
        channel_id: i64,
        actor_id: i64,
        update: UpdateChannelDto,
    ) -> Result<Channel, ChannelError>;

    /// Delete a channel (owner only)
    async fn delete_channel(&self, channel_id: i64, actor_id: i64) -> Result<(), ChannelError>;
}

/// Create channel request
#[derive(Debug, Clone)]
pub struct CreateChannelDto {
    pub name: String,
    pub topic: String,
}

/// Update channel request
#[derive(Debug, Clone, Default)]
pub struct UpdateChannelDto {
    pub name: Option<String>,
    pub topic: Option<String>,
}

/// Channel service errors
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel not found")]
    NotFound,

    #[error("Server not found")]
    ServerNotFound,

    #[error("Permission denied")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// ChannelService implementation
pub struct ChannelServiceImpl<C, S>
where
    C: ChannelRepository,
    S: ServerRepository,
{
    channel_repo: Arc<C>,
    server_repo: Arc<S>,
}

impl<C, S> ChannelServiceImpl<C, S>
where
    C: ChannelRepository,
    S: ServerRepository,
{
    pub fn new(channel_repo: Arc<C>, server_repo: Arc<S>) -> Self {
        Self {
            channel_repo,
            server_repo,
        }
    }

    async fn owned_channel(&self, channel_id: i64, actor_id: i64) -> Result<Channel, ChannelError> {
        let channel = self
            .channel_repo
            .find_by_id(channel_id)
            .await
            .map_err(|e| ChannelError::Internal(e.to_string()))?
            .ok_or(ChannelError::NotFound)?;

        if !channel.is_owner(actor_id) {
            return Err(ChannelError::Forbidden);
        }
        Ok(channel)
    }
}

#[async_trait]
impl<C, S> ChannelService for ChannelServiceImpl<C, S>
where
    C: ChannelRepository + 'static,
    S: ServerRepository + 'static,
{
    async fn list_server_channels(&self, server_id: i64) -> Result<Vec<Channel>, ChannelError> {
        self.server_repo
            .find_by_id(server_id)
            .await
            .map_err(|e| ChannelError::Internal(e.to_string()))?
            .ok_or(ChannelError::ServerNotFound)?;

        self.channel_repo
            .find_by_server_id(server_id)
            .await
            .map_err(|e| ChannelError::Internal(e.to_string()))
    }

    async fn get_channel(&self, channel_id: i64) -> Result<Channel, ChannelError> {
        self.channel_repo
            .find_by_id(channel_id)
            .await
            .map_err(|e| ChannelError::Internal(e.to_string()))?
            .ok_or(ChannelError::NotFound)
    }

    async fn create_channel(
        &self,
        server_id: i64,
        owner_id: i64,
        request: CreateChannelDto,
    ) -> Result<Channel, ChannelError> {
        self.server_repo
            .find_by_id(server_id)
            .await
            .map_err(|e| ChannelError::Internal(e.to_string()))?
            .ok_or(ChannelError::ServerNotFound)?;

        // Channel names are stored lowercase.
        let channel = NewChannel {
            name: request.name.to_lowercase(),
            owner_id,
            topic: request.topic,
            server_id,
        };

        self.channel_repo
            .create(&channel)
            .await
            .map_err(|e| ChannelError::Internal(e.to_string()))
    }

    async fn update_channel(
        &self,
        channel_id: i64,
        actor_id: i64,
        update: UpdateChannelDto,
    ) -> Result<Channel, ChannelError> {
        self.owned_channel(channel_id, actor_id).await?;

        let patch = ChannelPatch {
            name: update.name.map(|n| n.to_lowercase()),
            topic: update.topic,
        };

        self.channel_repo
            .update(channel_id, &patch)
            .await
            .map_err(|e| ChannelError::Internal(e.to_string()))
    }

    async fn delete_channel(&self, channel_id: i64, actor_id: i64) -> Result<(), ChannelError> {
        self.owned_channel(channel_id, actor_id).await?;

        self.channel_repo
            .delete(channel_id)
            .await
            .map_err(|e| ChannelError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::{NewServer, Server, ServerPatch, ServerRecord};
    use crate::shared::error::AppError;

    #[derive(Default)]
    struct FakeChannelRepo {
        channels: Mutex<Vec<Channel>>,
    }

    #[async_trait]
    impl ChannelRepository for FakeChannelRepo {
        async fn find_by_id(&self, id: i64) -> Result<Option<Channel>, AppError> {
            Ok(self
                .channels
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == id)
                .cloned())
        }

        async fn find_by_server_id(&self, server_id: i64) -> Result<Vec<Channel>, AppError> {
            Ok(self
                .channels
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.server_id == server_id)
                .cloned()
                .collect())
        }

        async fn create(&self, new: &NewChannel) -> Result<Channel, AppError> {
            let mut channels = self.channels.lock().unwrap();
            let created = Channel {
                id: channels.len() as i64 + 1,
                name: new.name.clone(),
                owner_id: new.owner_id,
                topic: new.topic.clone(),
                server_id: new.server_id,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            };
            channels.push(created.clone());
            Ok(created)
        }

        async fn update(&self, id: i64, patch: &ChannelPatch) -> Result<Channel, AppError> {
            let mut channels = self.channels.lock().unwrap();
            let channel = channels
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| AppError::NotFound(format!("Channel with id {id} not found")))?;
            if let Some(name) = &patch.name {
                channel.name = name.clone();
            }
            if let Some(topic) = &patch.topic {
                channel.topic = topic.clone();
            }
            Ok(channel.clone())
        }

        async fn delete(&self, id: i64) -> Result<(), AppError> {
            self.channels.lock().unwrap().retain(|c| c.id != id);
            Ok(())
        }
    }

    struct FakeServerRepo {
        servers: Vec<Server>,
    }

    #[async_trait]
    impl ServerRepository for FakeServerRepo {
        async fn find_by_id(&self, id: i64) -> Result<Option<Server>, AppError> {
            Ok(self.servers.iter().find(|s| s.id == id).cloned())
        }

        async fn list_with_members(&self) -> Result<Vec<ServerRecord>, AppError> {
            Ok(Vec::new())
        }

        async fn create(&self, _server: &NewServer) -> Result<Server, AppError> {
            unimplemented!("not used by channel tests")
        }

        async fn update(&self, _id: i64, _patch: &ServerPatch) -> Result<Server, AppError> {
            unimplemented!("not used by channel tests")
        }

        async fn delete(&self, _id: i64) -> Result<(), AppError> {
            unimplemented!("not used by channel tests")
        }
    }

    fn service_with_server(
        server_id: i64,
    ) -> ChannelServiceImpl<FakeChannelRepo, FakeServerRepo> {
        let now = chrono::Utc::now();
        let server_repo = FakeServerRepo {
            servers: vec![Server {
                id: server_id,
                name: "general".into(),
                owner_id: 1,
                category_id: None,
                description: None,
                created_at: now,
                updated_at: now,
            }],
        };
        ChannelServiceImpl::new(Arc::new(FakeChannelRepo::default()), Arc::new(server_repo))
    }

    #[tokio::test]
    async fn create_lowercases_the_channel_name() {
        let service = service_with_server(1);

        let channel = service
            .create_channel(
                1,
                7,
                CreateChannelDto {
                    name: "General-Chat".into(),
                    topic: "anything".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(channel.name, "general-chat");
        assert_eq!(channel.owner_id, 7);
        assert_eq!(channel.server_id, 1);
    }

    #[tokio::test]
    async fn create_in_missing_server_fails() {
        let service = service_with_server(1);

        let err = service
            .create_channel(
                99,
                7,
                CreateChannelDto {
                    name: "general".into(),
                    topic: "anything".into(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ChannelError::ServerNotFound));
    }

    #[tokio::test]
    async fn update_is_owner_only() {
        let service = service_with_server(1);
        let channel = service
            .create_channel(
                1,
                7,
                CreateChannelDto {
                    name: "general".into(),
                    topic: "anything".into(),
                },
            )
            .await
            .unwrap();

        let err = service
            .update_channel(channel.id, 8, UpdateChannelDto::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ChannelError::Forbidden));

        let updated = service
            .update_channel(
                channel.id,
                7,
                UpdateChannelDto {
                    name: Some("Renamed".into()),
                    topic: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "renamed");
    }
}
