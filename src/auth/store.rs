//! Credential store: compiled-in seed accounts plus registered users.
//!
//! Registered users live under [`keys::USERS`] as one JSON array. The array
//! is re-read on every query and rewritten whole on every registration.
//! Storage and decode failures never reach the caller: reads degrade to an
//! empty list and failed writes are dropped, both with an error logged.

use crate::storage::{keys, KeyValueStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A user account. The password is kept in plaintext.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl UserRecord {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
        }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("email", &self.email)
            .finish()
    }
}

/// Which identifiers of a prospective user are already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Collision {
    pub username: bool,
    pub email: bool,
}

/// The two built-in accounts, always present ahead of registered users.
pub fn seed_users() -> Vec<UserRecord> {
    vec![
        UserRecord::new("admin", "admin123", "admin@example.com"),
        UserRecord::new("user", "user123", "user@example.com"),
    ]
}

/// Read/append access to the credential set.
#[derive(Clone)]
pub struct CredentialStore {
    kv: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Registered users only (no seeds). Empty on any storage failure.
    pub fn registered_users(&self) -> Vec<UserRecord> {
        let raw = match self.kv.get(keys::USERS) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::error!("Failed to read users from storage: {e:#}");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(users) => users,
            Err(e) => {
                tracing::error!("Failed to decode stored users: {e}");
                Vec::new()
            }
        }
    }

    /// Replace the registered list wholesale. Failures are logged and dropped.
    pub fn save_all(&self, users: &[UserRecord]) {
        let json = match serde_json::to_string(users) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to encode users: {e}");
                return;
            }
        };
        if let Err(e) = self.kv.set(keys::USERS, &json) {
            tracing::error!("Failed to save users to storage: {e:#}");
        }
    }

    /// Seed accounts followed by registered users.
    pub fn all_users(&self) -> Vec<UserRecord> {
        let mut users = seed_users();
        users.extend(self.registered_users());
        users
    }

    /// First record matching both fields exactly (case-sensitive).
    pub fn find_by_credentials(&self, username: &str, password: &str) -> Option<UserRecord> {
        self.all_users()
            .into_iter()
            .find(|u| u.username == username && u.password == password)
    }

    /// Case-insensitive duplicate check across the whole credential set.
    pub fn collisions(&self, username: &str, email: &str) -> Collision {
        let username = username.to_lowercase();
        let email = email.to_lowercase();
        self.all_users()
            .iter()
            .fold(Collision::default(), |acc, u| Collision {
                username: acc.username || u.username.to_lowercase() == username,
                email: acc.email || u.email.to_lowercase() == email,
            })
    }

    /// Append one user: read the list, push, rewrite.
    pub fn append(&self, user: UserRecord) {
        let mut users = self.registered_users();
        users.push(user);
        self.save_all(&users);
    }

    /// Drop every registered user. Seeds are unaffected.
    pub fn clear(&self) {
        if let Err(e) = self.kv.remove(keys::USERS) {
            tracing::error!("Failed to clear users from storage: {e:#}");
        }
    }
}
