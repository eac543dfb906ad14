//! # Domain Entities
//!
//! Core domain entities representing the main business objects of the
//! backend. All entities map directly to their corresponding database
//! tables.
//!
//! ## Core Entities
//!
//! - **Category**: A topical grouping that servers may belong to
//! - **Server**: A community space owned by an account, with members
//! - **Channel**: A named space within a server
//!
//! Accounts are owned by the external account service; this crate only
//! references account ids (see the `accounts` table in the migrations).
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access
//! operations, implemented in the infrastructure layer.

mod category;
mod channel;
mod server;

pub use category::{Category, CategoryPatch, CategoryRepository, NewCategory};
pub use channel::{Channel, ChannelPatch, ChannelRepository, NewChannel};
pub use server::{
    CategoryRef, NewServer, Server, ServerPatch, ServerRecord, ServerRepository,
};
