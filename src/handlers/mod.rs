//! Request handlers for the HTTP endpoints

pub mod auth;
pub mod hello;

pub use auth::{auth_routes, with_auth_service, with_principal, LoginRequest, LoginResponse, ValidateResponse};
pub use hello::hello_routes;
