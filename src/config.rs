//! Server configuration module
//! Loads the signing key, token lifetime and hashing cost from the environment

use crate::constants::{
    DEFAULT_ARGON2_ITERATIONS, DEFAULT_ARGON2_MEMORY_KIB, DEFAULT_ARGON2_PARALLELISM,
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TOKEN_TTL_MS, MAX_TOKEN_TTL_MS, MIN_JWT_SECRET_LEN,
    MIN_TOKEN_TTL_MS,
};
use crate::error::{HelloGateError, Result};
use std::env;
use std::fmt;
use std::time::Duration;

/// Server configuration parameters
#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JWT secret for token signing/validation
    pub jwt_secret: String,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
    /// Argon2 memory cost in KiB
    pub argon2_memory_kib: u32,
    /// Argon2 iteration count
    pub argon2_iterations: u32,
    /// Argon2 degree of parallelism
    pub argon2_parallelism: u32,
    /// Development mode (exposes demo credentials on the help endpoint)
    pub development_mode: bool,
    /// TLS configuration
    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,
    /// Enable TLS
    pub enable_tls: bool,
}

// The signing key must never end up in logs
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("argon2_memory_kib", &self.argon2_memory_kib)
            .field("argon2_iterations", &self.argon2_iterations)
            .field("argon2_parallelism", &self.argon2_parallelism)
            .field("development_mode", &self.development_mode)
            .field("tls_cert_path", &self.tls_cert_path)
            .field("tls_key_path", &self.tls_key_path)
            .field("enable_tls", &self.enable_tls)
            .finish()
    }
}

impl ServerConfig {
    /// Build a configuration around an explicit signing key, with defaults for
    /// everything else. The key is validated the same way as in `from_env`.
    pub fn new(jwt_secret: impl Into<String>) -> Result<Self> {
        let jwt_secret = jwt_secret.into();
        Self::validate_jwt_secret(&jwt_secret)?;

        Ok(Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            jwt_secret,
            token_ttl: Duration::from_millis(DEFAULT_TOKEN_TTL_MS),
            argon2_memory_kib: DEFAULT_ARGON2_MEMORY_KIB,
            argon2_iterations: DEFAULT_ARGON2_ITERATIONS,
            argon2_parallelism: DEFAULT_ARGON2_PARALLELISM,
            development_mode: false,
            tls_cert_path: None,
            tls_key_path: None,
            enable_tls: false,
        })
    }

    /// Create a test configuration - DANGEROUS: Only for testing!
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: "unit-test-signing-key-0f9a8b7c6d5e4f3a2b1c0d9e8f7a6b5c".to_string(),
            token_ttl: Duration::from_millis(DEFAULT_TOKEN_TTL_MS),
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            argon2_parallelism: 1,
            development_mode: true,
            tls_cert_path: None,
            tls_key_path: None,
            enable_tls: false,
        }
    }

    /// Lighter hashing cost, for test suites only
    pub fn with_fast_hashing(mut self) -> Self {
        self.argon2_memory_kib = 1024;
        self.argon2_iterations = 1;
        self.argon2_parallelism = 1;
        self
    }

    /// Validate that the JWT secret meets security requirements
    fn validate_jwt_secret(secret: &str) -> Result<()> {
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(HelloGateError::ConfigError(format!(
                "JWT secret must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            )));
        }

        // Check for insecure default or example values
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "mySecretKey",
            "default",
            "secret",
            "password",
            "12345",
        ];

        for pattern in &insecure_patterns {
            if secret.contains(pattern) {
                return Err(HelloGateError::ConfigError(format!(
                    "JWT secret contains insecure pattern '{}'. Please use a secure random secret generated with: openssl rand -base64 48",
                    pattern
                )));
            }
        }

        // Ensure some complexity
        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(HelloGateError::ConfigError(
                "JWT secret should contain mixed characters (letters, numbers, symbols) for security"
                    .to_string(),
            ));
        }

        Ok(())
    }

    fn validate_token_ttl(ttl: Duration) -> Result<()> {
        if ttl < Duration::from_millis(MIN_TOKEN_TTL_MS) {
            return Err(HelloGateError::ConfigError(format!(
                "Token TTL must be at least {} ms",
                MIN_TOKEN_TTL_MS
            )));
        }
        // Expiry timestamps must stay representable for every issued token
        if ttl > Duration::from_millis(MAX_TOKEN_TTL_MS) {
            return Err(HelloGateError::ConfigError(format!(
                "Token TTL must be at most {} ms",
                MAX_TOKEN_TTL_MS
            )));
        }
        Ok(())
    }

    /// Check the whole configuration, including hashing parameters
    pub fn validate(&self) -> Result<()> {
        Self::validate_jwt_secret(&self.jwt_secret)?;
        Self::validate_token_ttl(self.token_ttl)?;

        argon2::Params::new(
            self.argon2_memory_kib,
            self.argon2_iterations,
            self.argon2_parallelism,
            None,
        )
        .map_err(|e| HelloGateError::ConfigError(format!("Invalid Argon2 parameters: {}", e)))?;

        if self.enable_tls {
            let (cert_path, key_path) = match (&self.tls_cert_path, &self.tls_key_path) {
                (Some(cert), Some(key)) => (cert, key),
                _ => {
                    return Err(HelloGateError::ConfigError(
                        "TLS is enabled but HELLO_GATE_TLS_CERT_PATH or HELLO_GATE_TLS_KEY_PATH is not set".to_string(),
                    ))
                }
            };

            if !std::path::Path::new(cert_path).exists() {
                return Err(HelloGateError::ConfigError(format!(
                    "TLS certificate file does not exist: {}",
                    cert_path
                )));
            }
            if !std::path::Path::new(key_path).exists() {
                return Err(HelloGateError::ConfigError(format!(
                    "TLS private key file does not exist: {}",
                    key_path
                )));
            }
        }

        Ok(())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = env::var("HELLO_GATE_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var("HELLO_GATE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let jwt_secret = env::var("HELLO_GATE_JWT_SECRET")
            .or_else(|_| env::var("JWT_SECRET"))
            .map_err(|_| {
                HelloGateError::ConfigError(
                    "JWT_SECRET environment variable is required for security. \
                     Generate one with: openssl rand -base64 48"
                        .to_string(),
                )
            })?;

        // A present but unparseable TTL is an error rather than a silent default
        let token_ttl_ms = match env::var("HELLO_GATE_TOKEN_TTL_MS").or_else(|_| env::var("JWT_EXPIRATION")) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                HelloGateError::ConfigError(format!("Invalid token TTL in milliseconds: {}", raw))
            })?,
            Err(_) => DEFAULT_TOKEN_TTL_MS,
        };

        let argon2_memory_kib = env::var("HELLO_GATE_ARGON2_MEMORY_KIB")
            .ok()
            .and_then(|m| m.parse().ok())
            .unwrap_or(DEFAULT_ARGON2_MEMORY_KIB);

        let argon2_iterations = env::var("HELLO_GATE_ARGON2_ITERATIONS")
            .ok()
            .and_then(|i| i.parse().ok())
            .unwrap_or(DEFAULT_ARGON2_ITERATIONS);

        let argon2_parallelism = env::var("HELLO_GATE_ARGON2_PARALLELISM")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_ARGON2_PARALLELISM);

        let development_mode = env::var("HELLO_GATE_DEVELOPMENT_MODE")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false); // SECURITY: Default to false (production mode)

        let enable_tls = env::var("HELLO_GATE_ENABLE_TLS")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        let tls_cert_path = env::var("HELLO_GATE_TLS_CERT_PATH").ok();
        let tls_key_path = env::var("HELLO_GATE_TLS_KEY_PATH").ok();

        let config = Self {
            host,
            port,
            jwt_secret,
            token_ttl: Duration::from_millis(token_ttl_ms),
            argon2_memory_kib,
            argon2_iterations,
            argon2_parallelism,
            development_mode,
            tls_cert_path,
            tls_key_path,
            enable_tls,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_testing_is_valid() {
        let config = ServerConfig::for_testing();
        assert!(config.validate().is_ok());
        assert!(config.development_mode);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ServerConfig::for_testing();
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(&config.jwt_secret));
    }

    #[test]
    fn test_new_rejects_weak_secrets() {
        assert!(ServerConfig::new("short").is_err());
        assert!(ServerConfig::new("mySecretKey123456789012345678901234567890").is_err());
        assert!(ServerConfig::new("abcdefghijklmnopqrstuvwxyzabcdefghijkl").is_err());
        assert!(ServerConfig::new("k7#Qv9!zR2$wX5@pL8&nM3*bT6^yH1%d").is_ok());
    }

    #[test]
    fn test_short_ttl_rejected() {
        let mut config = ServerConfig::for_testing();
        config.token_ttl = Duration::from_millis(10);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("TTL"));
    }

    #[test]
    fn test_huge_ttl_rejected() {
        let mut config = ServerConfig::for_testing();
        config.token_ttl = Duration::from_millis(10_000_000_000_000_000);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, HelloGateError::ConfigError(_)));
        assert!(err.to_string().contains("at most"));

        // The largest accepted TTL still yields tokens that verify
        config.token_ttl = Duration::from_millis(MAX_TOKEN_TTL_MS);
        assert!(config.validate().is_ok());
        let tokens = crate::auth::TokenManager::from_config(&config);
        let token = tokens.issue("test").unwrap();
        assert_eq!(tokens.verify(&token).unwrap().subject, "test");
    }

    #[test]
    fn test_invalid_argon2_params_rejected() {
        let mut config = ServerConfig::for_testing();
        config.argon2_iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tls_requires_paths() {
        let mut config = ServerConfig::for_testing();
        config.enable_tls = true;
        assert!(config.validate().is_err());

        config.tls_cert_path = Some("/nonexistent/cert.pem".to_string());
        config.tls_key_path = Some("/nonexistent/key.pem".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
