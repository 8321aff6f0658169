//! Authentication backend trait

use async_trait::async_trait;

use super::User;
use crate::domain::AuthError;

/// External service that verifies credentials and owns accounts
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Check an email/password pair and return the matching identity
    async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Create a new account and return its identity
    async fn create_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError>;

    /// Look for an identity persisted by a previous session
    async fn restore_session(&self) -> Result<Option<User>, AuthError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::sync::RwLock;

    use crate::domain::user::{UserId, UserRole};

    /// Mock auth backend with per-email latency, for ordering tests
    #[derive(Debug, Default)]
    pub struct MockAuthBackend {
        accounts: RwLock<HashMap<String, (String, User)>>,
        delays: HashMap<String, Duration>,
        restore: Option<User>,
        restore_delay: Duration,
        failure: Option<AuthError>,
    }

    impl MockAuthBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_account(mut self, name: &str, email: &str, password: &str) -> Self {
            let user = Self::user_for(name, email);
            self.accounts
                .get_mut()
                .insert(email.to_string(), (password.to_string(), user));
            self
        }

        /// Delay every call made for `email`
        pub fn with_delay(mut self, email: &str, delay: Duration) -> Self {
            self.delays.insert(email.to_string(), delay);
            self
        }

        pub fn with_restored_session(mut self, user: User) -> Self {
            self.restore = Some(user);
            self
        }

        pub fn with_restore_delay(mut self, delay: Duration) -> Self {
            self.restore_delay = delay;
            self
        }

        /// Make every call fail with `error`
        pub fn with_failure(mut self, error: AuthError) -> Self {
            self.failure = Some(error);
            self
        }

        pub fn user_for(name: &str, email: &str) -> User {
            let slug: String = email.chars().filter(char::is_ascii_alphanumeric).collect();
            let id = UserId::new(format!("user-{}", slug)).unwrap();
            User::new(id, name, email, UserRole::Researcher)
        }

        async fn pause(&self, email: &str) {
            if let Some(delay) = self.delays.get(email) {
                tokio::time::sleep(*delay).await;
            }
        }

        fn check_failure(&self) -> Result<(), AuthError> {
            match &self.failure {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl AuthBackend for MockAuthBackend {
        async fn verify_credentials(
            &self,
            email: &str,
            password: &str,
        ) -> Result<User, AuthError> {
            self.pause(email).await;
            self.check_failure()?;

            match self.accounts.read().await.get(email) {
                Some((expected, user)) if expected == password => Ok(user.clone()),
                _ => Err(AuthError::invalid_credentials(email)),
            }
        }

        async fn create_account(
            &self,
            name: &str,
            email: &str,
            password: &str,
        ) -> Result<User, AuthError> {
            self.pause(email).await;
            self.check_failure()?;

            let mut accounts = self.accounts.write().await;
            if accounts.contains_key(email) {
                return Err(AuthError::account_exists(email));
            }

            let user = Self::user_for(name, email);
            accounts.insert(email.to_string(), (password.to_string(), user.clone()));
            Ok(user)
        }

        async fn restore_session(&self) -> Result<Option<User>, AuthError> {
            if !self.restore_delay.is_zero() {
                tokio::time::sleep(self.restore_delay).await;
            }
            self.check_failure()?;
            Ok(self.restore.clone())
        }
    }
}
