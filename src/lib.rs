//! Hello Gate - JWT login service with a bearer-protected hello endpoint
//!
//! This library provides the authentication core (credential store,
//! password hashing, token issuance and verification) and the warp routes
//! that expose it over HTTP.

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod security;
pub mod security_logger;

// Re-export main components
pub use auth::{AuthService, Principal, TokenManager};
pub use config::ServerConfig;
pub use error::{HelloGateError, Result};
pub use routes::routes;
