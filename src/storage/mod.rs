//! Key-value storage backends.
//!
//! Everything the auth flow persists lives under two string keys (see
//! [`keys`]). Backends only need `get`/`set`/`remove` over strings; the
//! credential and session layers own serialization.
//!
//! - [`MemoryStore`]: process-local map, used as the test fake
//! - [`SqliteStore`]: single `kv` table in a SQLite file

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use anyhow::Result;

/// Well-known storage keys.
pub mod keys {
    /// JSON array of registered users (seed accounts are never stored).
    pub const USERS: &str = "auth_users";
    /// Session token; presence means authenticated.
    pub const TOKEN: &str = "auth_token";
}

/// Flat string key-value store.
///
/// Each call is atomic on its own, but nothing spans calls: a
/// read-modify-write sequence can lose a concurrent writer's update.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
