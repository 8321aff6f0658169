//! Shared playground state handed to every view

use crate::store::{ModelCatalogStore, SessionStore};

/// The two long-lived stores. Clones share the same underlying state.
#[derive(Clone, Debug)]
pub struct PlaygroundState {
    pub session: SessionStore,
    pub catalog: ModelCatalogStore,
}

impl PlaygroundState {
    pub fn new(session: SessionStore, catalog: ModelCatalogStore) -> Self {
        Self { session, catalog }
    }

    /// Wait until neither store has a request in flight
    pub async fn settled(&self) {
        tokio::join!(self.session.settled(), self.catalog.settled());
    }

    /// Tear both stores down; late results are dropped afterwards
    pub fn dispose(&self) {
        self.session.dispose();
        self.catalog.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockAuthBackend, TimestampIdGenerator};
    use crate::infrastructure::model::FixtureModelProvider;
    use std::sync::Arc;
    use std::time::Duration;

    fn state() -> PlaygroundState {
        PlaygroundState::new(
            SessionStore::new(Arc::new(MockAuthBackend::new())),
            ModelCatalogStore::new(
                Arc::new(FixtureModelProvider::new(Duration::from_millis(5))),
                Arc::new(TimestampIdGenerator::new()),
            ),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_waits_for_both_stores() {
        let state = state();

        state.settled().await;

        assert!(!state.session.snapshot().is_loading);
        let catalog = state.catalog.snapshot();
        assert!(!catalog.is_loading);
        assert_eq!(catalog.models.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_stores() {
        let state = state();
        let clone = state.clone();
        state.settled().await;

        assert!(clone.catalog.select("2"));
        assert_eq!(state.catalog.snapshot().selected.as_ref().map(|id| id.as_str()), Some("2"));

        clone.dispose();
        assert!(state.session.is_disposed());
        assert!(state.catalog.is_disposed());
    }
}
