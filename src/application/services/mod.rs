//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **ServerService**: Server listing (filter pipeline) and management
//! - **CategoryService**: Category management with icon validation
//! - **ChannelService**: Channel operations within servers

pub mod category_service;
pub mod channel_service;
pub mod server_service;

// Re-export server service types
pub use server_service::{
    CreateServerDto, ServerError, ServerService, ServerServiceImpl, UpdateServerDto,
};

// Re-export category service types
pub use category_service::{
    CategoryError, CategoryService, CategoryServiceImpl, CreateCategoryDto, UpdateCategoryDto,
};

// Re-export channel service types
pub use channel_service::{
    ChannelError, ChannelService, ChannelServiceImpl, CreateChannelDto, UpdateChannelDto,
};
