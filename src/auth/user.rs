use serde::Serialize;
use std::fmt;

/// A user record held by the credential store
#[derive(Clone)]
pub struct User {
    /// Unique username, used as the store key and as the token subject
    pub username: String,
    /// Argon2 PHC string
    password_hash: String,
    /// Granted roles, in insertion order and without duplicates
    pub roles: Vec<String>,
}

impl User {
    /// Creates a user from an already hashed password
    pub fn new<I, S>(username: impl Into<String>, password_hash: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique_roles: Vec<String> = Vec::new();
        for role in roles {
            let role = role.into();
            if !unique_roles.contains(&role) {
                unique_roles.push(role);
            }
        }

        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            roles: unique_roles,
        }
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

/// The authenticated identity resolved from a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub username: String,
    pub roles: Vec<String>,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            roles: user.roles.clone(),
        }
    }
}

impl Principal {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
