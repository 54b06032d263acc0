//! Session slot: a single token under [`keys::TOKEN`].
//!
//! There is no verification beyond presence. No expiry, no rotation.

use super::error::AuthError;
use crate::storage::{keys, KeyValueStore};
use std::sync::Arc;

/// Observable session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(String),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

#[derive(Clone)]
pub struct SessionManager {
    kv: Arc<dyn KeyValueStore>,
}

impl SessionManager {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Current token, `None` when absent, empty, or unreadable.
    pub fn token(&self) -> Option<String> {
        match self.kv.get(keys::TOKEN) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read session token: {e:#}");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    pub fn state(&self) -> SessionState {
        match self.token() {
            Some(token) => SessionState::Authenticated(token),
            None => SessionState::Anonymous,
        }
    }

    /// Store `token`, replacing any previous one.
    pub fn login(&self, token: &str) {
        if let Err(e) = self.kv.set(keys::TOKEN, token) {
            tracing::error!("Failed to store session token: {e:#}");
        }
    }

    /// Remove the token unconditionally.
    pub fn logout(&self) {
        if let Err(e) = self.kv.remove(keys::TOKEN) {
            tracing::error!("Failed to remove session token: {e:#}");
        }
    }

    /// Gate for protected views: the token, or `NotAuthenticated` meaning
    /// "redirect to login".
    pub fn require(&self) -> Result<String, AuthError> {
        self.token().ok_or(AuthError::NotAuthenticated)
    }
}
