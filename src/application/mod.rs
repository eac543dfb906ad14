//! Application Layer
//!
//! Contains business logic services, the server listing filter pipeline,
//! and data transfer objects (DTOs). This layer orchestrates the flow of
//! data between the presentation and domain layers.

pub mod dto;
pub mod server_filter;
pub mod services;
