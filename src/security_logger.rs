//! Security-focused logging of authentication events
//!
//! Events go to the `security` log target so they can be filtered or routed
//! separately with `RUST_LOG=security=info`. Passwords and signing keys never
//! appear in any event.

pub const SECURITY_TARGET: &str = "security";

const MAX_USERNAME_CHARS: usize = 64;
const MAX_DETAIL_CHARS: usize = 160;

/// Types of security events to track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityEvent {
    LoginSucceeded { username: String },
    LoginFailed { username: String, reason: &'static str },
    TokenRejected { reason: String },
    UnauthorizedAccess { resource: String, reason: String },
}

impl SecurityEvent {
    pub fn event_key(&self) -> &'static str {
        match self {
            Self::LoginSucceeded { .. } => "login_succeeded",
            Self::LoginFailed { .. } => "login_failed",
            Self::TokenRejected { .. } => "token_rejected",
            Self::UnauthorizedAccess { .. } => "unauthorized_access",
        }
    }

    fn level(&self) -> log::Level {
        match self {
            Self::LoginSucceeded { .. } => log::Level::Info,
            Self::LoginFailed { .. }
            | Self::TokenRejected { .. }
            | Self::UnauthorizedAccess { .. } => log::Level::Warn,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::LoginSucceeded { username } => {
                format!("user={}", sanitize(username, MAX_USERNAME_CHARS))
            }
            Self::LoginFailed { username, reason } => {
                format!("user={} reason={}", sanitize(username, MAX_USERNAME_CHARS), reason)
            }
            // Token errors can echo attacker-controlled header and claim text
            Self::TokenRejected { reason } => {
                format!("reason={}", sanitize(reason, MAX_DETAIL_CHARS))
            }
            Self::UnauthorizedAccess { resource, reason } => format!(
                "resource={} reason={}",
                sanitize(resource, MAX_DETAIL_CHARS),
                sanitize(reason, MAX_DETAIL_CHARS)
            ),
        }
    }
}

/// Log a security event
pub fn log_security_event(event: &SecurityEvent) {
    log::log!(
        target: SECURITY_TARGET,
        event.level(),
        "[{}] {}",
        event.event_key(),
        event.describe()
    );
}

// Client supplied values are truncated and stripped of control characters
// before they reach a log line.
fn sanitize(value: &str, max_chars: usize) -> String {
    value
        .chars()
        .filter(|c| !c.is_control())
        .take(max_chars)
        .collect()
}
