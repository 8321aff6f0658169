//! Simulated authentication backend
//!
//! Accounts live in memory with Argon2 password hashes. Every call waits for
//! a configurable latency (plus optional random jitter) to stand in for the
//! network round trip of a real auth service.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::RwLock;
use tracing::debug;

use super::password::PasswordHasher;
use crate::domain::user::{validate_display_name, validate_email, validate_password};
use crate::domain::{AuthBackend, AuthError, User, UserId, UserRole};

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password_hash: String,
}

/// In-memory auth backend with simulated latency
pub struct SimulatedAuthBackend<H: PasswordHasher> {
    hasher: Arc<H>,
    accounts: RwLock<HashMap<String, Account>>,
    remembered: RwLock<Option<User>>,
    latency: Duration,
    jitter: Duration,
    default_role: UserRole,
    remember_sessions: bool,
}

impl<H: PasswordHasher> SimulatedAuthBackend<H> {
    pub fn new(hasher: Arc<H>, latency: Duration) -> Self {
        Self {
            hasher,
            accounts: RwLock::new(HashMap::new()),
            remembered: RwLock::new(None),
            latency,
            jitter: Duration::ZERO,
            default_role: UserRole::default(),
            remember_sessions: false,
        }
    }

    /// Add up to `jitter` of random extra latency per call
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Role given to accounts created through `create_account`
    pub fn with_default_role(mut self, role: UserRole) -> Self {
        self.default_role = role;
        self
    }

    /// Remember the last signed-in identity for `restore_session`
    pub fn with_remembered_sessions(mut self, remember: bool) -> Self {
        self.remember_sessions = remember;
        self
    }

    /// Seed an account
    pub fn with_account(
        mut self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<Self, AuthError> {
        let account = Account {
            user: User::new(UserId::generate(), name.trim(), email.trim(), role),
            password_hash: self.hasher.hash(password)?,
        };

        self.accounts
            .get_mut()
            .insert(account_key(email), account);
        Ok(self)
    }

    /// Seed a persisted session, as if a previous run had signed in
    pub fn with_persisted_session(mut self, user: User) -> Self {
        *self.remembered.get_mut() = Some(user);
        self
    }

    /// Seed a persisted session for an already seeded account
    pub fn with_persisted_account(mut self, email: &str) -> Result<Self, AuthError> {
        let user = self
            .accounts
            .get_mut()
            .get(&account_key(email))
            .map(|account| account.user.clone())
            .ok_or_else(|| {
                AuthError::validation(format!("no seeded account for persisted session '{}'", email))
            })?;

        *self.remembered.get_mut() = Some(user);
        Ok(self)
    }

    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }

    async fn simulate_latency(&self) {
        let extra = if self.jitter.is_zero() {
            Duration::ZERO
        } else {
            let max = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
            Duration::from_millis(rand::thread_rng().gen_range(0..=max))
        };

        let delay = self.latency + extra;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    async fn remember(&self, user: &User) {
        if self.remember_sessions {
            *self.remembered.write().await = Some(user.clone());
        }
    }
}

fn account_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl<H: PasswordHasher> AuthBackend for SimulatedAuthBackend<H> {
    async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, AuthError> {
        self.simulate_latency().await;

        let user = {
            let accounts = self.accounts.read().await;

            match accounts.get(&account_key(email)) {
                Some(account) if self.hasher.verify(password, &account.password_hash) => {
                    account.user.clone()
                }
                _ => {
                    debug!("Rejected credentials for {}", email);
                    return Err(AuthError::invalid_credentials(email));
                }
            }
        };

        self.remember(&user).await;
        Ok(user)
    }

    async fn create_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        self.simulate_latency().await;

        validate_display_name(name).map_err(|e| AuthError::validation(e.to_string()))?;
        validate_email(email).map_err(|e| AuthError::validation(e.to_string()))?;
        validate_password(password).map_err(|e| AuthError::validation(e.to_string()))?;

        let key = account_key(email);
        let user = {
            let mut accounts = self.accounts.write().await;

            if accounts.contains_key(&key) {
                return Err(AuthError::account_exists(email));
            }

            let account = Account {
                user: User::new(UserId::generate(), name.trim(), email.trim(), self.default_role),
                password_hash: self.hasher.hash(password)?,
            };
            let user = account.user.clone();
            accounts.insert(key, account);
            user
        };

        debug!("Created account {} for {}", user.id(), email);
        self.remember(&user).await;
        Ok(user)
    }

    async fn restore_session(&self) -> Result<Option<User>, AuthError> {
        self.simulate_latency().await;
        Ok(self.remembered.read().await.clone())
    }
}

impl<H: PasswordHasher> std::fmt::Debug for SimulatedAuthBackend<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedAuthBackend")
            .field("latency", &self.latency)
            .field("jitter", &self.jitter)
            .field("default_role", &self.default_role)
            .field("remember_sessions", &self.remember_sessions)
            .finish_non_exhaustive()
    }
}
