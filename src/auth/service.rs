//! Registration, login and session gate over one injected store.

use super::error::{AuthError, AuthResponse};
use super::session::{SessionManager, SessionState};
use super::store::{Collision, CredentialStore, UserRecord};
use super::validate::{validate_registration, SignupForm};
use crate::storage::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;

/// Default artificial latency before register/login return.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1000);

const REGISTERED_MESSAGE: &str = "User registered successfully";
const LOGGED_IN_MESSAGE: &str = "Login successful";

/// Entry point for the signup, login and dashboard flows.
///
/// The async operations sleep for `latency` first to mimic a network round
/// trip. The delay is not cancellable and can be set to zero.
#[derive(Clone)]
pub struct AuthService {
    credentials: CredentialStore,
    session: SessionManager,
    latency: Duration,
}

impl AuthService {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            credentials: CredentialStore::new(kv.clone()),
            session: SessionManager::new(kv),
            latency: DEFAULT_LATENCY,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    async fn simulate_delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    // ── Registration ────────────────────────────────────────────────

    /// Validate, check for duplicates, then append. Nothing is written
    /// unless every check passes.
    pub fn try_register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<UserRecord, AuthError> {
        validate_registration(username, password, email)?;

        match self.credentials.collisions(username, email) {
            Collision {
                username: true,
                email: true,
            } => return Err(AuthError::UsernameAndEmailTaken),
            Collision { username: true, .. } => return Err(AuthError::UsernameTaken),
            Collision { email: true, .. } => return Err(AuthError::EmailTaken),
            _ => {}
        }

        let user = UserRecord::new(username, password, email);
        self.credentials.append(user.clone());
        tracing::info!(username = %user.username, "User registered");
        Ok(user)
    }

    /// Register a new user. Never fails; the outcome is in the response.
    pub async fn register(&self, username: &str, password: &str, email: &str) -> AuthResponse {
        self.simulate_delay().await;
        let result = self.try_register(username, password, email);
        if let Err(ref e) = result {
            tracing::debug!(username, "Registration rejected: {e}");
        }
        AuthResponse::from_result(result, REGISTERED_MESSAGE)
    }

    /// Validate the whole signup form (including confirmation) before
    /// registering.
    pub async fn signup(&self, form: &SignupForm) -> AuthResponse {
        if let Err(e) = form.validate() {
            return AuthResponse::fail(&e);
        }
        self.register(&form.username, &form.password, &form.email).await
    }

    // ── Authentication ──────────────────────────────────────────────

    /// Exact match on both fields; on success the user's email becomes
    /// the session token.
    pub fn try_authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserRecord, AuthError> {
        let user = self
            .credentials
            .find_by_credentials(username, password)
            .ok_or(AuthError::InvalidCredentials)?;
        self.session.login(&user.email);
        tracing::info!(username = %user.username, "User logged in");
        Ok(user)
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> AuthResponse {
        self.simulate_delay().await;
        AuthResponse::from_result(self.try_authenticate(username, password), LOGGED_IN_MESSAGE)
    }

    // ── Session gate ────────────────────────────────────────────────

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn login(&self, token: &str) {
        self.session.login(token);
    }

    pub fn logout(&self) {
        self.session.logout();
        tracing::info!("Session cleared");
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn require_session(&self) -> Result<String, AuthError> {
        self.session.require()
    }

    // ── Development helpers ─────────────────────────────────────────

    pub fn all_registered_users(&self) -> Vec<UserRecord> {
        self.credentials.all_users()
    }

    /// Remove registered users and the session token.
    pub fn clear_auth_data(&self) {
        self.credentials.clear();
        self.session.logout();
        tracing::info!("Auth data cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{keys, MemoryStore};

    fn test_service() -> (Arc<MemoryStore>, AuthService) {
        let kv = Arc::new(MemoryStore::new());
        let service = AuthService::new(kv.clone()).with_latency(Duration::ZERO);
        (kv, service)
    }

    fn stored_len(kv: &MemoryStore) -> usize {
        kv.get(keys::USERS)
            .unwrap()
            .map(|raw| serde_json::from_str::<Vec<serde_json::Value>>(&raw).unwrap().len())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn register_and_authenticate() {
        let (kv, service) = test_service();

        let resp = service.register("bob", "Abc123!", "bob@x.com").await;
        assert!(resp.success);
        assert_eq!(resp.message, "User registered successfully");
        assert_eq!(resp.user.unwrap().email, "bob@x.com");

        let resp = service.authenticate("bob", "Abc123!").await;
        assert!(resp.success);
        assert_eq!(resp.message, "Login successful");
        assert_eq!(kv.get(keys::TOKEN).unwrap().as_deref(), Some("bob@x.com"));
        assert!(service.is_authenticated());
    }

    #[tokio::test]
    async fn register_empty_fields_fails() {
        let (kv, service) = test_service();

        for (u, p, e) in [
            ("", "Abc123!", "bob@x.com"),
            ("bob", "", "bob@x.com"),
            ("bob", "Abc123!", ""),
        ] {
            let resp = service.register(u, p, e).await;
            assert!(!resp.success);
            assert_eq!(resp.message, "All fields are required");
        }
        assert_eq!(stored_len(&kv), 0);
    }

    #[tokio::test]
    async fn register_invalid_email_fails() {
        let (_kv, service) = test_service();

        let resp = service.register("bob", "Abc123!", "bob@x").await;
        assert!(!resp.success);
        assert_eq!(resp.message, "Invalid email");
    }

    #[test]
    fn register_weak_password_leaves_storage_untouched() {
        let (kv, service) = test_service();
        service.try_register("alice", "Abc123!", "alice@x.com").unwrap();
        let before = kv.get(keys::USERS).unwrap();

        for weak in ["short", "abcdef", "ABCDEF1", "Abcdef!"] {
            let err = service.try_register("bob", weak, "bob@x.com").unwrap_err();
            assert!(matches!(err, AuthError::PasswordTooShort | AuthError::WeakPassword));
        }
        assert_eq!(kv.get(keys::USERS).unwrap(), before);
    }

    #[tokio::test]
    async fn register_duplicate_username_fails() {
        let (kv, service) = test_service();

        assert!(service.register("bob", "Abc123!", "bob@x.com").await.success);
        let resp = service.register("bob", "Abc123!", "other@x.com").await;
        assert!(!resp.success);
        assert!(resp.message.to_lowercase().contains("username already in use"));
        assert_eq!(stored_len(&kv), 1);
    }

    #[test]
    fn register_distinguishes_collisions() {
        let (_kv, service) = test_service();
        service.try_register("bob", "Abc123!", "bob@x.com").unwrap();

        assert_eq!(
            service.try_register("BOB", "Abc123!", "new@x.com"),
            Err(AuthError::UsernameTaken)
        );
        assert_eq!(
            service.try_register("robert", "Abc123!", "BOB@x.com"),
            Err(AuthError::EmailTaken)
        );
        assert_eq!(
            service.try_register("Bob", "Abc123!", "bob@X.COM"),
            Err(AuthError::UsernameAndEmailTaken)
        );
    }

    #[test]
    fn register_collides_with_seed_accounts() {
        let (_kv, service) = test_service();
        assert_eq!(
            service.try_register("admin", "Abc123!", "fresh@x.com"),
            Err(AuthError::UsernameTaken)
        );
        assert_eq!(
            service.try_register("fresh", "Abc123!", "user@example.com"),
            Err(AuthError::EmailTaken)
        );
    }

    #[tokio::test]
    async fn seed_admin_logs_in() {
        let (_kv, service) = test_service();

        let resp = service.authenticate("admin", "admin123").await;
        assert!(resp.success);
        assert_eq!(resp.user.unwrap().username, "admin");
        assert_eq!(
            service.session_state(),
            SessionState::Authenticated("admin@example.com".into())
        );
    }

    #[tokio::test]
    async fn authenticate_failures_are_indistinguishable() {
        let (_kv, service) = test_service();

        let wrong_password = service.authenticate("admin", "nope").await;
        let unknown_user = service.authenticate("ghost", "admin123").await;
        assert!(!wrong_password.success);
        assert_eq!(wrong_password, unknown_user);
        assert_eq!(wrong_password.message, "Invalid credentials");
        assert!(!service.is_authenticated());
    }

    #[test]
    fn failed_login_keeps_existing_session() {
        let (_kv, service) = test_service();
        service.try_authenticate("user", "user123").unwrap();

        assert!(service.try_authenticate("admin", "wrong").is_err());
        assert_eq!(service.require_session().unwrap(), "user@example.com");
    }

    #[test]
    fn logout_clears_session() {
        let (_kv, service) = test_service();
        service.try_authenticate("admin", "admin123").unwrap();

        service.logout();
        assert!(!service.is_authenticated());
        assert_eq!(service.require_session(), Err(AuthError::NotAuthenticated));
    }

    #[test]
    fn login_stores_token_directly() {
        let (kv, service) = test_service();

        service.login("someone@x.com");
        assert_eq!(kv.get(keys::TOKEN).unwrap().as_deref(), Some("someone@x.com"));
        assert_eq!(service.require_session().unwrap(), "someone@x.com");
    }

    #[tokio::test]
    async fn signup_checks_confirmation() {
        let (kv, service) = test_service();

        let form = SignupForm {
            username: "bob".into(),
            email: "bob@x.com".into(),
            password: "Abc123!".into(),
            confirm_password: "Abc123?".into(),
        };
        let resp = service.signup(&form).await;
        assert_eq!(resp.message, "Passwords do not match");
        assert_eq!(stored_len(&kv), 0);

        let form = SignupForm {
            confirm_password: "Abc123!".into(),
            ..form
        };
        assert!(service.signup(&form).await.success);
        assert_eq!(stored_len(&kv), 1);
    }

    #[test]
    fn clear_auth_data_resets_everything() {
        let (kv, service) = test_service();
        service.try_register("bob", "Abc123!", "bob@x.com").unwrap();
        service.try_authenticate("bob", "Abc123!").unwrap();

        service.clear_auth_data();
        assert!(kv.is_empty());
        assert!(!service.is_authenticated());
        assert_eq!(service.all_registered_users().len(), 2);
        assert!(service.try_authenticate("bob", "Abc123!").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_applied_before_returning() {
        let kv = Arc::new(MemoryStore::new());
        let service = AuthService::new(kv).with_latency(Duration::from_millis(1000));

        let start = tokio::time::Instant::now();
        let resp = service.authenticate("admin", "admin123").await;
        assert!(resp.success);
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }
}
