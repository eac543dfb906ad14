//! Repository Implementations
//!
//! PostgreSQL implementations of the domain repository traits.
//!
//! ## Available Repositories
//!
//! - **PgCategoryRepository** - Category management
//! - **PgServerRepository** - Server CRUD and the member-aggregated
//!   listing fetch
//! - **PgChannelRepository** - Channel management within servers

pub mod category_repository;
pub mod channel_repository;
pub mod server_repository;

pub use category_repository::PgCategoryRepository;
pub use channel_repository::PgChannelRepository;
pub use server_repository::PgServerRepository;
