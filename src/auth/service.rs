//! Authentication service
//!
//! Ties the credential store, password hasher and token manager together:
//! login, token validation for status reporting, and the hard gate used by
//! protected routes.

use chrono::{DateTime, Utc};

use crate::auth::password::PasswordHasher;
use crate::auth::store::CredentialStore;
use crate::auth::token::{TokenManager, VerifiedToken};
use crate::auth::user::{Principal, User};
use crate::config::ServerConfig;
use crate::error::{HelloGateError, Result};
use crate::security_logger::{log_security_event, SecurityEvent};

// Verified against when the username is unknown, so both failure paths do
// the same amount of hashing work.
const DUMMY_PASSWORD: &str = "hello-gate-timing-equalizer";

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub username: String,
    pub expires_in_ms: u64,
}

/// Status report for a presented token
#[derive(Debug)]
pub struct TokenValidation {
    pub valid: bool,
    pub subject: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Why the token was rejected. For diagnostics only, not for clients.
    pub failure: Option<HelloGateError>,
}

impl TokenValidation {
    fn accepted(token: VerifiedToken) -> Self {
        Self {
            valid: true,
            subject: Some(token.subject),
            expires_at: Some(token.expires_at),
            failure: None,
        }
    }

    fn rejected(failure: HelloGateError) -> Self {
        Self {
            valid: false,
            subject: None,
            expires_at: None,
            failure: Some(failure),
        }
    }
}

pub struct AuthService {
    store: CredentialStore,
    hasher: PasswordHasher,
    tokens: TokenManager,
    dummy_hash: String,
}

impl AuthService {
    pub fn new(store: CredentialStore, hasher: PasswordHasher, tokens: TokenManager) -> Result<Self> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;
        Ok(Self {
            store,
            hasher,
            tokens,
            dummy_hash,
        })
    }

    /// Builds the service with the seed users and the configured key, TTL and
    /// hashing cost
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let hasher = PasswordHasher::from_config(config)?;
        let store = CredentialStore::with_seed_users(&hasher)?;
        let tokens = TokenManager::from_config(config);
        Self::new(store, hasher, tokens)
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Checks credentials and issues a token.
    ///
    /// Unknown usernames and wrong passwords both fail with
    /// `InvalidCredentials`.
    pub fn login(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        let user = match self.store.find_by_username(username) {
            Ok(user) => user,
            Err(_) => {
                let _ = self.hasher.verify(password, &self.dummy_hash);
                log_security_event(&SecurityEvent::LoginFailed {
                    username: username.to_string(),
                    reason: "unknown user",
                });
                return Err(HelloGateError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, user.password_hash()) {
            log_security_event(&SecurityEvent::LoginFailed {
                username: username.to_string(),
                reason: "wrong password",
            });
            return Err(HelloGateError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.username)?;
        log_security_event(&SecurityEvent::LoginSucceeded {
            username: user.username.clone(),
        });

        Ok(LoginOutcome {
            token,
            username: user.username.clone(),
            expires_in_ms: self.tokens.expires_in_ms(),
        })
    }

    /// Reports whether a token is currently valid. Never fails; the reason
    /// for a rejection is carried in `failure`.
    pub fn validate_token(&self, token: &str) -> TokenValidation {
        match self.verify_for_known_user(token) {
            Ok((verified, _)) => TokenValidation::accepted(verified),
            Err(failure) => {
                log_security_event(&SecurityEvent::TokenRejected {
                    reason: failure.to_string(),
                });
                TokenValidation::rejected(failure)
            }
        }
    }

    /// Resolves the identity behind a token, failing if the token is not valid
    pub fn authenticate(&self, token: &str) -> Result<Principal> {
        let (_, user) = self.verify_for_known_user(token).map_err(|e| {
            log_security_event(&SecurityEvent::TokenRejected {
                reason: e.to_string(),
            });
            match e {
                HelloGateError::UserNotFound(_) => HelloGateError::Unauthorized,
                other => other,
            }
        })?;

        Ok(Principal::from(user))
    }

    // Signature and expiry first, then the subject must still be a known user
    fn verify_for_known_user(&self, token: &str) -> Result<(VerifiedToken, &User)> {
        let verified = self.tokens.verify(token)?;
        let user = self.store.find_by_username(&verified.subject)?;
        Ok((verified, user))
    }
}
