//! Authentication endpoints: login, token validation and login help

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

use crate::auth::service::{AuthService, LoginOutcome};
use crate::auth::token::extract_bearer_token;
use crate::auth::user::Principal;
use crate::constants::SEED_USERS;
use crate::error::{HelloGateError, Result};
use crate::security_logger::{log_security_event, SecurityEvent};

const LOGIN_SUCCESS_MESSAGE: &str = "Login successful";

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    /// Both fields must be present and non-blank
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(HelloGateError::ValidationError(
                "Username must not be blank".to_string(),
            ));
        }
        if self.password.trim().is_empty() {
            return Err(HelloGateError::ValidationError(
                "Password must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// Login response body
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub message: String,
    pub expires_in: u64,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            token: outcome.token,
            username: outcome.username,
            message: LOGIN_SUCCESS_MESSAGE.to_string(),
            expires_in: outcome.expires_in_ms,
        }
    }
}

/// Token validation response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub username: String,
    /// Expiry as milliseconds since the Unix epoch
    pub expiration: i64,
}

/// Include the shared auth service in a request
pub fn with_auth_service(
    service: Arc<AuthService>,
) -> impl Filter<Extract = (Arc<AuthService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

/// Require a valid bearer token and extract the caller's identity
pub fn with_principal(
    service: Arc<AuthService>,
) -> impl Filter<Extract = (Principal,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and(warp::path::full())
        .and(with_auth_service(service))
        .and_then(authenticate_request)
}

async fn authenticate_request(
    auth_header: Option<String>,
    path: warp::path::FullPath,
    service: Arc<AuthService>,
) -> std::result::Result<Principal, Rejection> {
    let token = match extract_token_from_header(auth_header.as_deref()) {
        Some(token) => token,
        None => {
            log_security_event(&SecurityEvent::UnauthorizedAccess {
                resource: path.as_str().to_string(),
                reason: "missing bearer token".to_string(),
            });
            return Err(warp::reject::custom(HelloGateError::MissingAuthHeader));
        }
    };

    service.authenticate(&token).map_err(|e| {
        log_security_event(&SecurityEvent::UnauthorizedAccess {
            resource: path.as_str().to_string(),
            reason: e.to_string(),
        });
        warp::reject::custom(e)
    })
}

/// Extract token from Authorization header
pub fn extract_token_from_header(auth_header: Option<&str>) -> Option<String> {
    auth_header.and_then(extract_bearer_token)
}

/// POST /api/auth/login
pub async fn login_handler(
    request: LoginRequest,
    service: Arc<AuthService>,
) -> std::result::Result<impl Reply, Rejection> {
    request.validate().map_err(warp::reject::custom)?;

    // Password hashing is CPU bound; keep it off the async workers
    let outcome = tokio::task::spawn_blocking(move || {
        service.login(&request.username, &request.password)
    })
    .await
    .map_err(|e| {
        log::error!("Login worker failed: {}", e);
        warp::reject::custom(HelloGateError::SystemError(format!("login worker failed: {}", e)))
    })?
    .map_err(warp::reject::custom)?;

    Ok(warp::reply::json(&LoginResponse::from(outcome)))
}

/// GET /api/auth/validate
pub async fn validate_handler(
    auth_header: Option<String>,
    service: Arc<AuthService>,
) -> std::result::Result<impl Reply, Rejection> {
    let token = extract_token_from_header(auth_header.as_deref())
        .ok_or_else(|| warp::reject::custom(HelloGateError::InvalidAuthHeader))?;

    let validation = service.validate_token(&token);
    match (validation.valid, validation.subject, validation.expires_at) {
        (true, Some(username), Some(expires_at)) => Ok(warp::reply::json(&ValidateResponse {
            valid: true,
            username,
            expiration: expires_at.timestamp_millis(),
        })),
        _ => {
            let failure = validation
                .failure
                .unwrap_or(HelloGateError::Unauthorized);
            log::debug!("Token validation failed: {}", failure);
            // Whatever the internal reason, clients only learn the token was rejected
            let rejection = match failure {
                HelloGateError::UserNotFound(_) => HelloGateError::Unauthorized,
                other => other,
            };
            Err(warp::reject::custom(rejection))
        }
    }
}

/// GET /api/auth/help
pub fn help_body(development_mode: bool) -> serde_json::Value {
    let mut help = serde_json::json!({
        "message": "Hello Gate API login help",
        "loginUrl": "/api/auth/login",
        "method": "POST",
        "example": {
            "request": {
                "username": "<username>",
                "password": "<password>"
            },
            "response": {
                "token": "eyJhbGciOiJIUzUxMiJ9...",
                "username": "<username>",
                "message": LOGIN_SUCCESS_MESSAGE,
                "expiresIn": 86400000
            }
        }
    });

    // Demo credentials are only advertised in development mode
    if development_mode {
        let users: Vec<serde_json::Value> = SEED_USERS
            .iter()
            .map(|(username, password, roles)| {
                serde_json::json!({
                    "username": username,
                    "password": password,
                    "roles": roles,
                })
            })
            .collect();
        help["demoUsers"] = serde_json::Value::Array(users);
    }

    help
}

/// Create the /api/auth routes
pub fn auth_routes(
    service: Arc<AuthService>,
    development_mode: bool,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let login = warp::path!("api" / "auth" / "login")
        .and(warp::post())
        .and(warp::body::content_length_limit(crate::constants::MAX_LOGIN_BODY_BYTES))
        .and(warp::body::json())
        .and(with_auth_service(service.clone()))
        .and_then(login_handler);

    let validate = warp::path!("api" / "auth" / "validate")
        .and(warp::get())
        .and(warp::header::optional::<String>("authorization"))
        .and(with_auth_service(service))
        .and_then(validate_handler);

    let help = warp::path!("api" / "auth" / "help")
        .and(warp::get())
        .map(move || warp::reply::json(&help_body(development_mode)));

    login.or(validate).or(help)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let ok = LoginRequest {
            username: "test".to_string(),
            password: "123456".to_string(),
        };
        assert!(ok.validate().is_ok());

        let blank_user = LoginRequest {
            username: "  ".to_string(),
            password: "123456".to_string(),
        };
        assert!(matches!(blank_user.validate(), Err(HelloGateError::ValidationError(_))));

        let blank_password = LoginRequest {
            username: "test".to_string(),
            password: String::new(),
        };
        assert!(matches!(blank_password.validate(), Err(HelloGateError::ValidationError(_))));

        let whitespace_password = LoginRequest {
            username: "test".to_string(),
            password: " \t ".to_string(),
        };
        assert!(matches!(
            whitespace_password.validate(),
            Err(HelloGateError::ValidationError(msg)) if msg == "Password must not be blank"
        ));
    }

    #[test]
    fn test_login_response_uses_camel_case() {
        let response = LoginResponse::from(LoginOutcome {
            token: "abc".to_string(),
            username: "test".to_string(),
            expires_in_ms: 86_400_000,
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["expiresIn"], 86_400_000);
        assert_eq!(json["message"], LOGIN_SUCCESS_MESSAGE);
    }

    #[test]
    fn test_help_hides_credentials_outside_development() {
        let production = help_body(false);
        assert!(production.get("demoUsers").is_none());
        assert!(!production.to_string().contains("123456"));

        let development = help_body(true);
        assert_eq!(development["demoUsers"][0]["username"], "test");
        assert_eq!(development["demoUsers"][1]["roles"][0], "ADMIN");
    }
}
