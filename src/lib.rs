//! Demonstration signup/login flow with a presence-based session gate.
//!
//! The [`auth`] module holds the domain logic; [`storage`] supplies the
//! key-value backends it is injected with; [`config`] wires the two together
//! from a TOML file.

pub mod auth;
pub mod config;
pub mod storage;

pub use auth::{AuthError, AuthResponse, AuthService, SessionState, SignupForm, UserRecord};
pub use config::Config;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
