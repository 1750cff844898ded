// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const LOG_TARGET: &str = "hello_gate";

// Token configuration constants
pub const DEFAULT_TOKEN_TTL_MS: u64 = 86_400_000;
pub const MIN_TOKEN_TTL_MS: u64 = 1_000;
pub const MAX_TOKEN_TTL_MS: u64 = 365 * 86_400_000;
pub const MIN_JWT_SECRET_LEN: usize = 32;
pub const MAX_TOKEN_LEN: usize = 4096;

// Argon2id cost parameters (OWASP baseline)
pub const DEFAULT_ARGON2_MEMORY_KIB: u32 = 19_456;
pub const DEFAULT_ARGON2_ITERATIONS: u32 = 2;
pub const DEFAULT_ARGON2_PARALLELISM: u32 = 1;

// HTTP limits
pub const MAX_LOGIN_BODY_BYTES: u64 = 4 * 1024;

// Seed users available at startup: (username, password, roles)
pub const SEED_USERS: &[(&str, &str, &[&str])] = &[
    ("test", "123456", &["USER"]),
    ("admin", "admin123", &["ADMIN", "USER"]),
];
