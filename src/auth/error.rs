//! Failure taxonomy and the data-only response returned to form handlers.

use super::store::UserRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation, conflict and session failures.
///
/// `Display` is the message shown to the user. Storage failures are not
/// represented here: they are logged and degrade to "no data".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must contain an uppercase letter, a number and a special character")]
    WeakPassword,

    #[error("Username and email are already in use")]
    UsernameAndEmailTaken,

    #[error("Username already in use")]
    UsernameTaken,

    #[error("Email already in use")]
    EmailTaken,

    /// Deliberately the same for unknown users and wrong passwords.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No session token; protected views redirect to login.
    #[error("Not authenticated")]
    NotAuthenticated,
}

/// Outcome of a registration or login attempt, as plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRecord>,
}

impl AuthResponse {
    pub fn ok(message: impl Into<String>, user: UserRecord) -> Self {
        Self {
            success: true,
            message: message.into(),
            user: Some(user),
        }
    }

    pub fn fail(err: &AuthError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            user: None,
        }
    }

    /// Map a typed result, using `success_message` on `Ok`.
    pub fn from_result(result: Result<UserRecord, AuthError>, success_message: &str) -> Self {
        match result {
            Ok(user) => Self::ok(success_message, user),
            Err(e) => Self::fail(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_response_carries_display_message() {
        let resp = AuthResponse::fail(&AuthError::UsernameTaken);
        assert!(!resp.success);
        assert_eq!(resp.message, "Username already in use");
        assert!(resp.user.is_none());
    }

    #[test]
    fn failure_serializes_without_user_field() {
        let resp = AuthResponse::fail(&AuthError::InvalidCredentials);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Invalid credentials");
        assert!(json.get("user").is_none());
    }
}
