//! Server Service
//!
//! Server listing and management operations.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::server_filter::{
    FilterError, ServerListParams, ServerListing,
};
use crate::domain::{NewServer, Server, ServerPatch, ServerRepository};

/// Server service trait
#[async_trait]
pub trait ServerService: Send + Sync {
    /// List servers, applying the optional query-parameter filters.
    async fn list_servers(
        &self,
        params: &ServerListParams,
        caller: Option<i64>,
    ) -> Result<Vec<ServerListing>, ServerError>;

    /// Get a server by id
    async fn get_server(&self, server_id: i64) -> Result<Server, ServerError>;

    /// Create a server; the creator becomes owner and first member
    async fn create_server(
        &self,
        owner_id: i64,
        request: CreateServerDto,
    ) -> Result<Server, ServerError>;

    /// Update a server (owner only)
    async fn update_server(
        &self,
        server_id: i64,
        actor_id: i64,
        update: UpdateServerDto,
    ) -> Result<Server, ServerError>;

    /// Delete a server (owner only)
    async fn delete_server(&self, server_id: i64, actor_id: i64) -> Result<(), ServerError>;
}

/// Create server request
#[derive(Debug, Clone)]
pub struct CreateServerDto {
    pub name: String,
    pub category_id: Option<i64>,
    pub description: Option<String>,
}

/// Update server request
#[derive(Debug, Clone, Default)]
pub struct UpdateServerDto {
    pub name: Option<String>,
    pub category_id: Option<Option<i64>>,
    pub description: Option<String>,
}

/// Server service errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Server not found")]
    NotFound,

    #[error("Permission denied")]
    Forbidden,

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// ServerService implementation
pub struct ServerServiceImpl<R>
where
    R: ServerRepository,
{
    server_repo: Arc<R>,
}

impl<R> ServerServiceImpl<R>
where
    R: ServerRepository,
{
    pub fn new(server_repo: Arc<R>) -> Self {
        Self { server_repo }
    }

    async fn owned_server(&self, server_id: i64, actor_id: i64) -> Result<Server, ServerError> {
        let server = self
            .server_repo
            .find_by_id(server_id)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?
            .ok_or(ServerError::NotFound)?;

        if !server.is_owner(actor_id) {
            return Err(ServerError::Forbidden);
        }
        Ok(server)
    }
}

#[async_trait]
impl<R> ServerService for ServerServiceImpl<R>
where
    R: ServerRepository + 'static,
{
    async fn list_servers(
        &self,
        params: &ServerListParams,
        caller: Option<i64>,
    ) -> Result<Vec<ServerListing>, ServerError> {
        // Capability gate and value parsing both run before storage is
        // touched: a 401 or a "Value error" never costs a fetch.
        params.authorize(caller)?;
        let query = params.parse()?;

        let records = self
            .server_repo
            .list_with_members()
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        Ok(query.apply(records, caller)?)
    }

    async fn get_server(&self, server_id: i64) -> Result<Server, ServerError> {
        self.server_repo
            .find_by_id(server_id)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?
            .ok_or(ServerError::NotFound)
    }

    async fn create_server(
        &self,
        owner_id: i64,
        request: CreateServerDto,
    ) -> Result<Server, ServerError> {
        let server = NewServer {
            name: request.name,
            owner_id,
            category_id: request.category_id,
            description: request.description,
        };

        self.server_repo
            .create(&server)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }

    async fn update_server(
        &self,
        server_id: i64,
        actor_id: i64,
        update: UpdateServerDto,
    ) -> Result<Server, ServerError> {
        self.owned_server(server_id, actor_id).await?;

        let patch = ServerPatch {
            name: update.name,
            category_id: update.category_id,
            description: update.description,
        };

        self.server_repo
            .update(server_id, &patch)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }

    async fn delete_server(&self, server_id: i64, actor_id: i64) -> Result<(), ServerError> {
        self.owned_server(server_id, actor_id).await?;

        self.server_repo
            .delete(server_id)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::{CategoryRef, ServerRecord};
    use crate::shared::error::AppError;

    /// In-memory stand-in for the storage collaborator.
    struct FakeServerRepo {
        servers: Mutex<Vec<Server>>,
        records: Vec<ServerRecord>,
    }

    impl FakeServerRepo {
        fn with_records(records: Vec<ServerRecord>) -> Self {
            Self {
                servers: Mutex::new(Vec::new()),
                records,
            }
        }

        fn with_servers(servers: Vec<Server>) -> Self {
            Self {
                servers: Mutex::new(servers),
                records: Vec::new(),
            }
        }
    }

    fn server(id: i64, owner_id: i64) -> Server {
        let now = chrono::Utc::now();
        Server {
            id,
            name: format!("server-{id}"),
            owner_id,
            category_id: None,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[async_trait]
    impl ServerRepository for FakeServerRepo {
        async fn find_by_id(&self, id: i64) -> Result<Option<Server>, AppError> {
            Ok(self
                .servers
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.id == id)
                .cloned())
        }

        async fn list_with_members(&self) -> Result<Vec<ServerRecord>, AppError> {
            Ok(self.records.clone())
        }

        async fn create(&self, new: &NewServer) -> Result<Server, AppError> {
            let mut servers = self.servers.lock().unwrap();
            let id = servers.len() as i64 + 1;
            let created = Server {
                id,
                name: new.name.clone(),
                owner_id: new.owner_id,
                category_id: new.category_id,
                description: new.description.clone(),
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            };
            servers.push(created.clone());
            Ok(created)
        }

        async fn update(&self, id: i64, patch: &ServerPatch) -> Result<Server, AppError> {
            let mut servers = self.servers.lock().unwrap();
            let server = servers
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| AppError::NotFound(format!("Server with id {id} not found")))?;
            if let Some(name) = &patch.name {
                server.name = name.clone();
            }
            if let Some(category_id) = patch.category_id {
                server.category_id = category_id;
            }
            if let Some(description) = &patch.description {
                server.description = Some(description.clone());
            }
            Ok(server.clone())
        }

        async fn delete(&self, id: i64) -> Result<(), AppError> {
            self.servers.lock().unwrap().retain(|s| s.id != id);
            Ok(())
        }
    }

    fn record(id: i64, category: Option<&str>, member_ids: Vec<i64>) -> ServerRecord {
        ServerRecord {
            id,
            name: format!("server-{id}"),
            owner_id: 1,
            category: category.map(|name| CategoryRef {
                id: 10,
                name: name.to_string(),
            }),
            description: None,
            member_ids,
        }
    }

    fn list_params(pairs: &[(&str, &str)]) -> ServerListParams {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerListParams::from_query(&map)
    }

    #[tokio::test]
    async fn list_applies_the_filter_pipeline() {
        let repo = Arc::new(FakeServerRepo::with_records(vec![
            record(1, Some("gaming"), vec![7]),
            record(2, Some("music"), vec![7]),
        ]));
        let service = ServerServiceImpl::new(repo);

        let listings = service
            .list_servers(&list_params(&[("category", "gaming")]), None)
            .await
            .unwrap();

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].server.id, 1);
    }

    #[tokio::test]
    async fn list_rejects_identity_filters_without_a_caller() {
        let repo = Arc::new(FakeServerRepo::with_records(vec![record(1, None, vec![7])]));
        let service = ServerServiceImpl::new(repo);

        let err = service
            .list_servers(&list_params(&[("by_user", "true")]), None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServerError::Filter(FilterError::AuthenticationRequired)
        ));
    }

    #[tokio::test]
    async fn update_is_owner_only() {
        let repo = Arc::new(FakeServerRepo::with_servers(vec![server(1, 7)]));
        let service = ServerServiceImpl::new(repo);

        let err = service
            .update_server(1, 8, UpdateServerDto::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::Forbidden));

        let updated = service
            .update_server(
                1,
                7,
                UpdateServerDto {
                    name: Some("renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "renamed");
    }

    #[tokio::test]
    async fn delete_missing_server_is_not_found() {
        let repo = Arc::new(FakeServerRepo::with_servers(vec![]));
        let service = ServerServiceImpl::new(repo);

        let err = service.delete_server(42, 7).await.unwrap_err();
        assert!(matches!(err, ServerError::NotFound));
    }
}
