use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ServerConfig;
use crate::constants::MAX_TOKEN_LEN;
use crate::error::{HelloGateError, Result};

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS512;

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issued at (as UTC timestamp)
    pub iat: i64,
    /// Expiration time (as UTC timestamp)
    pub exp: i64,
    /// Unique token identifier
    pub jti: String,
}

impl Claims {
    /// Creates claims for a subject issued at `now` and living for `ttl`
    pub fn new(subject: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        let expires_at_ms = now
            .timestamp_millis()
            .saturating_add(i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX));

        Self {
            sub: subject.into(),
            iat: now.timestamp(),
            exp: expires_at_ms.div_euclid(1000),
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Check if the token is expired at `now`. Expiry is exclusive: a token is
    /// only valid strictly before `exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() >= self.exp.saturating_mul(1000)
    }

    pub fn issued_at(&self) -> Result<DateTime<Utc>> {
        timestamp_to_datetime(self.iat, "iat")
    }

    pub fn expires_at(&self) -> Result<DateTime<Utc>> {
        timestamp_to_datetime(self.exp, "exp")
    }
}

fn timestamp_to_datetime(secs: i64, claim: &str) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .ok_or_else(|| HelloGateError::TokenMalformed(format!("{} claim is out of range", claim)))
}

/// Claims of a token whose signature and expiry have been checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub token_id: String,
}

/// Manages JWT token operations
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenManager {
    /// Creates a new token manager with a secret and token lifetime
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // Expiry is checked by `verify_at` against an explicit clock
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl)
    }

    /// Token lifetime in milliseconds
    pub fn expires_in_ms(&self) -> u64 {
        u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX)
    }

    /// Issues a signed token for the subject
    pub fn issue(&self, subject: &str) -> Result<String> {
        self.issue_at(subject, Utc::now())
    }

    /// Issues a signed token as if the current time were `now`
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims::new(subject, now, self.ttl);
        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| HelloGateError::SystemError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature and expiry, returning the token's claims
    pub fn verify(&self, token: &str) -> Result<VerifiedToken> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies a token as if the current time were `now`.
    ///
    /// The signature is checked before any claim is deserialized, so claims of
    /// a forged token are never looked at.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken> {
        check_token_shape(token)?;

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(map_jwt_error)?
            .claims;

        if claims.is_expired_at(now) {
            return Err(HelloGateError::TokenExpired);
        }

        Ok(VerifiedToken {
            issued_at: claims.issued_at()?,
            expires_at: claims.expires_at()?,
            subject: claims.sub,
            token_id: claims.jti,
        })
    }

    /// Reads the subject WITHOUT checking signature or expiry.
    ///
    /// The result proves nothing about who sent the token; use `verify` before
    /// making any access decision.
    pub fn extract_subject(&self, token: &str) -> Result<String> {
        Ok(self.decode_unverified(token)?.sub)
    }

    /// Reads the expiry WITHOUT checking signature or expiry. Same caveat as
    /// `extract_subject`.
    pub fn extract_expiry(&self, token: &str) -> Result<DateTime<Utc>> {
        self.decode_unverified(token)?.expires_at()
    }

    fn decode_unverified(&self, token: &str) -> Result<Claims> {
        check_token_shape(token)?;

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(map_jwt_error)
    }
}

fn check_token_shape(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(HelloGateError::TokenMalformed("empty token".to_string()));
    }
    if token.len() > MAX_TOKEN_LEN {
        return Err(HelloGateError::TokenMalformed("token too long".to_string()));
    }
    if token.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(HelloGateError::TokenMalformed(
            "token contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> HelloGateError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            HelloGateError::TokenSignatureInvalid
        }
        ErrorKind::ExpiredSignature => HelloGateError::TokenExpired,
        _ => HelloGateError::TokenMalformed(err.to_string()),
    }
}

/// Extracts bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
