//! REST API endpoint tests

mod crud_auth_tests;
mod health_tests;
mod server_list_tests;
