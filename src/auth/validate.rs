//! Pure credential validators and the signup form.
//!
//! The predicates return plain `bool`; callers pick the message. The
//! form and registration checks below turn them into [`AuthError`]s in a
//! fixed order so the first failing rule is the one reported.

use super::error::AuthError;
use regex::Regex;
use std::sync::LazyLock;

/// Minimum password length, in Unicode scalar values (not UTF-16 units).
pub const MIN_PASSWORD_LEN: usize = 6;

/// Punctuation accepted as the "special character" of a strong password.
pub const SPECIAL_CHARS: &str = r"!@#$%^&*()_+{}[]:;<>,.?~\/-";

/// Canonical email shape: `local@domain.tld`, one `@`, no whitespace.
/// U+FEFF counts as whitespace here even though Unicode `\s` excludes it.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s\x{FEFF}@]+@[^\s\x{FEFF}@]+\.[^\s\x{FEFF}@]+$").unwrap()
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn meets_min_length(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Length, no line breaks, and at least one uppercase ASCII letter, one
/// ASCII digit and one character from [`SPECIAL_CHARS`].
pub fn is_strong_password(password: &str) -> bool {
    if !meets_min_length(password) || password.chars().any(is_line_terminator) {
        return false;
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| SPECIAL_CHARS.contains(c));
    has_upper && has_digit && has_special
}

pub fn passwords_match(password: &str, confirm: &str) -> bool {
    password == confirm
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Field checks run before a registration touches storage.
pub fn validate_registration(username: &str, password: &str, email: &str) -> Result<(), AuthError> {
    if username.is_empty() || password.is_empty() || email.is_empty() {
        return Err(AuthError::MissingFields);
    }
    if !is_valid_email(email) {
        return Err(AuthError::InvalidEmail);
    }
    if !meets_min_length(password) {
        return Err(AuthError::PasswordTooShort);
    }
    if !is_strong_password(password) {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

/// Fields collected by the signup page.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// Check the form in page order: presence, email, length,
    /// confirmation, strength.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.username.is_empty()
            || self.email.is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(AuthError::MissingFields);
        }
        if !is_valid_email(&self.email) {
            return Err(AuthError::InvalidEmail);
        }
        if !meets_min_length(&self.password) {
            return Err(AuthError::PasswordTooShort);
        }
        if !passwords_match(&self.password, &self.confirm_password) {
            return Err(AuthError::PasswordMismatch);
        }
        if !is_strong_password(&self.password) {
            return Err(AuthError::WeakPassword);
        }
        Ok(())
    }
}
