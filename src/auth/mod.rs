//! Demonstration signup/login flow with a presence-based session gate.
//!
//! Provides:
//! - Credential validation (email shape, password strength, confirmation)
//! - Registration into an append-only user list persisted as one JSON blob
//! - Authentication against two seed accounts plus registered users
//! - A session token slot whose mere presence means "logged in"
//!
//! ## Not a security pattern
//! Passwords are stored and compared in plaintext, and the session token is
//! the user's email. This mirrors a front-end demo backed by browser storage
//! and must not be reused where credentials matter: a real deployment needs
//! salted password hashes, random tokens and server-side expiry.

pub mod error;
pub mod service;
pub mod session;
pub mod store;
pub mod validate;

pub use error::{AuthError, AuthResponse};
pub use service::AuthService;
pub use session::{SessionManager, SessionState};
pub use store::{CredentialStore, UserRecord};
pub use validate::{is_strong_password, is_valid_email, SignupForm};
