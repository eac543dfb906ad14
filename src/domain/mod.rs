//! # Domain Layer
//!
//! The domain layer contains the core business entities of the backend.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! - **entities**: Core domain entities (Category, Server, Channel) and
//!   their repository traits

pub mod entities;

// Re-export commonly used types
pub use entities::*;
