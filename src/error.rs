use std::error::Error;
use std::fmt;

use warp::http::StatusCode;

#[derive(Debug)]
pub enum HelloGateError {
    // Credential errors
    InvalidCredentials,
    UserNotFound(String),

    // Token errors
    TokenExpired,
    TokenMalformed(String),
    TokenSignatureInvalid,

    // Request errors
    MissingAuthHeader,
    InvalidAuthHeader,
    Unauthorized,
    ValidationError(String),

    // Password hashing errors
    PasswordHashError(String),

    // Configuration errors
    ConfigError(String),

    // System errors
    SystemError(String),
}

impl fmt::Display for HelloGateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "Invalid username or password"),
            Self::UserNotFound(username) => write!(f, "User not found: {}", username),
            Self::TokenExpired => write!(f, "Token expired"),
            Self::TokenMalformed(msg) => write!(f, "Malformed token: {}", msg),
            Self::TokenSignatureInvalid => write!(f, "Token signature is invalid"),
            Self::MissingAuthHeader => write!(f, "Missing Authorization header"),
            Self::InvalidAuthHeader => write!(f, "Invalid Authorization header"),
            Self::Unauthorized => write!(f, "Unauthorized access"),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::PasswordHashError(msg) => write!(f, "Password hashing error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::SystemError(msg) => write!(f, "System error: {}", msg),
        }
    }
}

impl Error for HelloGateError {}

impl warp::reject::Reject for HelloGateError {}

impl HelloGateError {
    /// HTTP status used when this error reaches a client
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials
            | Self::UserNotFound(_)
            | Self::TokenExpired
            | Self::TokenMalformed(_)
            | Self::TokenSignatureInvalid
            | Self::MissingAuthHeader
            | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidAuthHeader | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::PasswordHashError(_) | Self::ConfigError(_) | Self::SystemError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to clients.
    ///
    /// Unknown users and wrong passwords share one message so responses never
    /// reveal which usernames exist. Internal failures are not echoed.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidCredentials | Self::UserNotFound(_) => {
                "Invalid username or password".to_string()
            }
            Self::TokenExpired | Self::TokenMalformed(_) | Self::TokenSignatureInvalid => {
                "Invalid or expired token".to_string()
            }
            Self::MissingAuthHeader | Self::Unauthorized => "Authentication required".to_string(),
            Self::InvalidAuthHeader => "Invalid Authorization header".to_string(),
            Self::ValidationError(msg) => msg.clone(),
            Self::PasswordHashError(_) | Self::ConfigError(_) | Self::SystemError(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

// Generic result type for hello-gate
pub type Result<T> = std::result::Result<T, HelloGateError>;
