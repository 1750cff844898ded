//! Authentication module

pub mod password;
pub mod service;
pub mod store;
pub mod token;
pub mod user;

// Re-export main components
pub use password::PasswordHasher;
pub use service::{AuthService, LoginOutcome, TokenValidation};
pub use store::CredentialStore;
pub use token::{extract_bearer_token, Claims, TokenManager, VerifiedToken};
pub use user::{Principal, User};
