//! Infrastructure Layer
//!
//! Contains implementations for external services:
//! - Database connection pool and migrations (PostgreSQL)
//! - Repository implementations

pub mod database;
pub mod repositories;
