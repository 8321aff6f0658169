//! Session store - current identity and the sign-in state machine
//!
//! Every auth operation (including the restore probe started at
//! construction) takes a new operation generation. A result is committed only
//! if no later operation has started since, so overlapping calls always settle
//! on the outcome of the most recently issued one.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::observable::{Observable, SubscriptionId};
use crate::domain::{AuthBackend, AuthError, User};

/// Snapshot of the session as seen by views
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Position in the sign-in state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unauthenticated,
    Authenticating,
    Authenticated,
    /// Unauthenticated with an error from the last attempt
    AuthFailed,
}

/// What a protected view should do with the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Session not settled yet; show a spinner
    Pending,
    Granted,
    RedirectToLogin,
}

/// How an auth operation ended, from the caller's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated,
    /// Rejected; the message is in `SessionState::error`
    Failed,
    /// A later operation started before this one resolved; result dropped
    Superseded,
    /// The store was disposed; result dropped
    Disposed,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_loading {
            SessionPhase::Authenticating
        } else if self.identity.is_some() {
            SessionPhase::Authenticated
        } else if self.error.is_some() {
            SessionPhase::AuthFailed
        } else {
            SessionPhase::Unauthenticated
        }
    }

    pub fn access(&self) -> RouteAccess {
        if self.is_loading {
            RouteAccess::Pending
        } else if self.is_authenticated() {
            RouteAccess::Granted
        } else {
            RouteAccess::RedirectToLogin
        }
    }
}

/// Cloneable handle to the session store
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    backend: Arc<dyn AuthBackend>,
    state: Observable<SessionState>,
    generation: AtomicU64,
    disposed: AtomicBool,
}

impl SessionStore {
    /// Create the store and start the session restore probe.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        let store = Self {
            inner: Arc::new(SessionInner {
                backend,
                state: Observable::new(SessionState {
                    identity: None,
                    is_loading: true,
                    error: None,
                }),
                generation: AtomicU64::new(1),
                disposed: AtomicBool::new(false),
            }),
        };

        let probe = store.clone();
        tokio::spawn(async move {
            probe.restore(1).await;
        });

        store
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.state.snapshot()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        self.inner.state.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.state.unsubscribe(id)
    }

    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.inner.state.watch()
    }

    /// Wait until no auth operation is pending
    pub async fn settled(&self) -> SessionState {
        self.inner.state.wait_for(|state| !state.is_loading).await
    }

    /// Sign in with email and password
    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        let email = email.trim();
        let Some(generation) = self.begin("login") else {
            return AuthOutcome::Disposed;
        };

        let result = self
            .inner
            .backend
            .verify_credentials(email, password)
            .await;

        self.complete("login", generation, result)
    }

    /// Create an account and sign in with it.
    ///
    /// Password confirmation is the caller's job; see `RegistrationForm`.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AuthOutcome {
        let name = name.trim();
        let email = email.trim();
        let Some(generation) = self.begin("register") else {
            return AuthOutcome::Disposed;
        };

        let result = self
            .inner
            .backend
            .create_account(name, email, password)
            .await;

        self.complete("register", generation, result)
    }

    /// Drop the current identity. Leaves `is_loading` alone.
    pub fn logout(&self) {
        if self.is_disposed() {
            return;
        }

        let committed = self.inner.state.commit_if(|state| {
            let changed = state.identity.is_some() || state.error.is_some();
            state.identity = None;
            state.error = None;
            changed
        });

        if committed.is_some() {
            info!("Session ended");
        }
    }

    /// Mark the store as discarded; late results are ignored from now on
    pub fn dispose(&self) {
        if !self.inner.disposed.swap(true, Ordering::SeqCst) {
            debug!("Session store disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    fn begin(&self, operation: &str) -> Option<u64> {
        if self.is_disposed() {
            debug!("Ignoring {} on disposed session store", operation);
            return None;
        }

        let mut generation = 0;
        self.inner.state.commit(|state| {
            generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.is_loading = true;
            state.error = None;
        });

        debug!("Started {} (generation {})", operation, generation);
        Some(generation)
    }

    /// Commit `apply` if `generation` is still the latest operation
    fn finish<F>(&self, generation: u64, apply: F) -> bool
    where
        F: FnOnce(&mut SessionState),
    {
        let inner = &self.inner;

        inner
            .state
            .commit_if(|state| {
                if inner.disposed.load(Ordering::SeqCst)
                    || inner.generation.load(Ordering::SeqCst) != generation
                {
                    return false;
                }

                apply(state);
                state.is_loading = false;
                true
            })
            .is_some()
    }

    fn complete(
        &self,
        operation: &str,
        generation: u64,
        result: Result<User, AuthError>,
    ) -> AuthOutcome {
        if self.is_disposed() {
            debug!("Dropping {} result: store disposed", operation);
            return AuthOutcome::Disposed;
        }

        match result {
            Ok(user) => {
                let user_id = user.id().clone();

                if self.finish(generation, |state| {
                    state.identity = Some(user);
                    state.error = None;
                }) {
                    info!("Session authenticated via {} for user {}", operation, user_id);
                    AuthOutcome::Authenticated
                } else {
                    debug!(
                        "Dropping {} result for user {}: superseded (generation {})",
                        operation, user_id, generation
                    );
                    AuthOutcome::Superseded
                }
            }
            Err(error) => {
                let message = error.user_message();

                if self.finish(generation, |state| {
                    state.identity = None;
                    state.error = Some(message);
                }) {
                    warn!("{} failed: {}", operation, error);
                    AuthOutcome::Failed
                } else {
                    debug!(
                        "Dropping {} failure: superseded (generation {})",
                        operation, generation
                    );
                    AuthOutcome::Superseded
                }
            }
        }
    }

    async fn restore(&self, generation: u64) {
        let restored = match self.inner.backend.restore_session().await {
            Ok(restored) => restored,
            Err(error) => {
                warn!("Session restore failed: {}", error);
                None
            }
        };

        let user_id = restored.as_ref().map(|user| user.id().clone());
        let committed = self.finish(generation, |state| {
            if let Some(user) = restored {
                state.identity = Some(user);
            }
        });

        match (committed, user_id) {
            (true, Some(user_id)) => info!("Restored session for user {}", user_id),
            (true, None) => debug!("No session to restore"),
            (false, _) => debug!("Session restore result dropped"),
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.inner.state)
            .field("generation", &self.inner.generation.load(Ordering::SeqCst))
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
