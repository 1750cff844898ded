//! In-memory credential store
//!
//! Populated once at startup and only read afterwards, so it can be shared
//! across request handlers without locking.

use std::collections::HashMap;

use crate::auth::password::PasswordHasher;
use crate::auth::user::User;
use crate::constants::SEED_USERS;
use crate::error::{HelloGateError, Result};

#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, User>,
}

impl CredentialStore {
    /// Builds a store from user records. A later record with the same
    /// username replaces an earlier one.
    pub fn from_users<I>(users: I) -> Self
    where
        I: IntoIterator<Item = User>,
    {
        Self {
            users: users
                .into_iter()
                .map(|user| (user.username.clone(), user))
                .collect(),
        }
    }

    /// Builds the store with the fixed seed users, hashing their passwords
    pub fn with_seed_users(hasher: &PasswordHasher) -> Result<Self> {
        let mut users = Vec::with_capacity(SEED_USERS.len());
        for (username, password, roles) in SEED_USERS {
            let hash = hasher.hash(password)?;
            users.push(User::new(*username, hash, roles.iter().copied()));
        }

        log::info!("Credential store seeded with {} users", users.len());
        Ok(Self::from_users(users))
    }

    pub fn find_by_username(&self, username: &str) -> Result<&User> {
        self.users
            .get(username)
            .ok_or_else(|| HelloGateError::UserNotFound(username.to_string()))
    }
}
