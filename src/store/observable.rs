//! Observable state container shared by the playground stores
//!
//! State lives in a `tokio::sync::watch` channel so async consumers can wait
//! on it, while synchronous listeners registered with [`Observable::subscribe`]
//! are called with the committed snapshot after every mutation.
//!
//! Commits are serialized: the state write and the listener fan-out for one
//! commit finish before the next commit starts, so listeners see snapshots in
//! commit order. Listeners must not commit to the observable they watch.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

/// Handle returned by [`Observable::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

pub struct Observable<S> {
    state: watch::Sender<S>,
    listeners: Mutex<Vec<(SubscriptionId, Listener<S>)>>,
    next_subscription: AtomicU64,
    /// Held across a write and its notifications
    commit_lock: Mutex<()>,
}

impl<S> Observable<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(initial: S) -> Self {
        let (state, _) = watch::channel(initial);

        Self {
            state,
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
            commit_lock: Mutex::new(()),
        }
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> S {
        self.state.borrow().clone()
    }

    /// Register a listener called after each committed mutation
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Receiver for async consumers
    pub fn watch(&self) -> watch::Receiver<S> {
        self.state.subscribe()
    }

    /// Wait until the state satisfies `predicate`, returning that state
    pub async fn wait_for<F>(&self, predicate: F) -> S
    where
        F: FnMut(&S) -> bool,
    {
        let mut receiver = self.state.subscribe();

        match receiver.wait_for(predicate).await {
            Ok(state) => S::clone(&state),
            // The sender lives as long as `self`
            Err(_) => self.snapshot(),
        }
    }

    /// Apply `mutate` and notify listeners
    pub fn commit<F>(&self, mutate: F) -> S
    where
        F: FnOnce(&mut S),
    {
        let _commit = self.commit_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut committed = None;

        self.state.send_modify(|state| {
            mutate(state);
            committed = Some(state.clone());
        });

        let snapshot = committed.unwrap_or_else(|| self.snapshot());
        self.notify(&snapshot);
        snapshot
    }

    /// Apply `mutate`; commit and notify only when it returns true
    pub fn commit_if<F>(&self, mutate: F) -> Option<S>
    where
        F: FnOnce(&mut S) -> bool,
    {
        let _commit = self.commit_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut committed = None;

        self.state.send_if_modified(|state| {
            if mutate(state) {
                committed = Some(state.clone());
                true
            } else {
                false
            }
        });

        if let Some(snapshot) = &committed {
            self.notify(snapshot);
        }

        committed
    }

    fn notify(&self, snapshot: &S) {
        // Listeners may subscribe or read back, so the list lock is released first
        let listeners: Vec<Listener<S>> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(snapshot);
        }
    }
}

impl<S> fmt::Debug for Observable<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self
            .listeners
            .lock()
            .map(|l| l.len())
            .unwrap_or_default();

        f.debug_struct("Observable")
            .field("state", &*self.state.borrow())
            .field("listeners", &listeners)
            .finish()
    }
}
