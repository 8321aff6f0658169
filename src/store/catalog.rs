//! Model catalog store - available models and the current selection

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::observable::{Observable, SubscriptionId};
use crate::domain::{Model, ModelId, ModelIdGenerator, ModelProvider, NewModel, Provider};

/// Snapshot of the catalog as seen by views
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    /// Models in display order
    pub models: Vec<Model>,
    /// Always an id present in `models` when set
    pub selected: Option<ModelId>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// How a catalog load ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { count: usize },
    Failed,
    Superseded,
    Disposed,
}

impl CatalogState {
    pub fn get(&self, id: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.id().as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn selected_model(&self) -> Option<&Model> {
        self.selected.as_ref().and_then(|id| self.get(id.as_str()))
    }

    pub fn with_capability(&self, capability: &str) -> Vec<&Model> {
        self.models
            .iter()
            .filter(|m| m.has_capability(capability))
            .collect()
    }

    pub fn by_provider(&self, provider: Provider) -> Vec<&Model> {
        self.models
            .iter()
            .filter(|m| m.provider() == provider)
            .collect()
    }
}

/// Cloneable handle to the model catalog store
#[derive(Clone)]
pub struct ModelCatalogStore {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    provider: Arc<dyn ModelProvider>,
    id_generator: Arc<dyn ModelIdGenerator>,
    state: Observable<CatalogState>,
    /// Ids added through `add_model`; they survive reloads
    added: Mutex<Vec<ModelId>>,
    generation: AtomicU64,
    disposed: AtomicBool,
}

impl ModelCatalogStore {
    /// Create the store and start the initial catalog load.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(provider: Arc<dyn ModelProvider>, id_generator: Arc<dyn ModelIdGenerator>) -> Self {
        let store = Self {
            inner: Arc::new(CatalogInner {
                provider,
                id_generator,
                state: Observable::new(CatalogState {
                    is_loading: true,
                    ..CatalogState::default()
                }),
                added: Mutex::new(Vec::new()),
                generation: AtomicU64::new(1),
                disposed: AtomicBool::new(false),
            }),
        };

        let loader = store.clone();
        tokio::spawn(async move {
            loader.fetch(1).await;
        });

        store
    }

    pub fn snapshot(&self) -> CatalogState {
        self.inner.state.snapshot()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&CatalogState) + Send + Sync + 'static,
    {
        self.inner.state.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.state.unsubscribe(id)
    }

    pub fn watch(&self) -> watch::Receiver<CatalogState> {
        self.inner.state.watch()
    }

    /// Wait until no load is pending
    pub async fn settled(&self) -> CatalogState {
        self.inner.state.wait_for(|state| !state.is_loading).await
    }

    /// Fetch the catalog again (manual retry after a failure)
    pub async fn load(&self) -> LoadOutcome {
        if self.is_disposed() {
            return LoadOutcome::Disposed;
        }

        let mut generation = 0;
        self.inner.state.commit(|state| {
            generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.is_loading = true;
            state.error = None;
        });

        self.fetch(generation).await
    }

    /// Select a model by id. Unknown ids leave the selection untouched.
    ///
    /// Returns whether `id` names a model in the catalog.
    pub fn select(&self, id: &str) -> bool {
        if self.is_disposed() {
            return false;
        }

        let mut matched = false;
        let committed = self.inner.state.commit_if(|state| {
            let Some(model) = state.get(id) else {
                return false;
            };
            matched = true;

            let model_id = model.id().clone();
            if state.selected.as_ref() == Some(&model_id) {
                return false;
            }

            state.selected = Some(model_id);
            true
        });

        if committed.is_some() {
            info!("Selected model {}", id);
        } else if !matched {
            debug!("Ignoring selection of unknown model {}", id);
        }

        matched
    }

    /// Append a model with a freshly generated id. Selection is unchanged.
    pub fn add_model(&self, new_model: NewModel) -> Model {
        let mut added = None;

        if !self.is_disposed() {
            self.inner.state.commit(|state| {
                let mut id = self.inner.id_generator.next_id();
                while state.contains(id.as_str()) {
                    id = self.inner.id_generator.next_id();
                }

                let model = new_model.clone().into_model(id.clone());
                state.models.push(model.clone());
                self.inner
                    .added
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(id);
                added = Some(model);
            });
        }

        match added {
            Some(model) => {
                info!("Added model {} ({})", model.id(), model.name());
                model
            }
            None => {
                debug!("Model added to disposed catalog store was not stored");
                new_model.into_model(self.inner.id_generator.next_id())
            }
        }
    }

    /// Mark the store as discarded; late results are ignored from now on
    pub fn dispose(&self) {
        if !self.inner.disposed.swap(true, Ordering::SeqCst) {
            debug!("Model catalog store disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    async fn fetch(&self, generation: u64) -> LoadOutcome {
        let provider_name = self.inner.provider.provider_name();
        let result = self.inner.provider.fetch_catalog().await;

        if self.is_disposed() {
            debug!("Dropping catalog from {}: store disposed", provider_name);
            return LoadOutcome::Disposed;
        }

        match result {
            Ok(fetched) => {
                let fetched = dedupe(fetched, provider_name);
                let count = fetched.len();

                let added = &self.inner.added;
                if self.finish(generation, |state| {
                    let mut added = added.lock().unwrap_or_else(PoisonError::into_inner);
                    merge_catalog(state, &mut added, fetched);
                }) {
                    info!("Loaded {} models from {}", count, provider_name);
                    LoadOutcome::Loaded { count }
                } else {
                    debug!("Dropping catalog from {}: superseded", provider_name);
                    LoadOutcome::Superseded
                }
            }
            Err(error) => {
                let message = error.user_message();

                if self.finish(generation, |state| state.error = Some(message)) {
                    warn!("Failed to load models from {}: {}", provider_name, error);
                    LoadOutcome::Failed
                } else {
                    debug!("Dropping catalog failure from {}: superseded", provider_name);
                    LoadOutcome::Superseded
                }
            }
        }
    }

    fn finish<F>(&self, generation: u64, apply: F) -> bool
    where
        F: FnOnce(&mut CatalogState),
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
}

/// Keep the first occurrence of each id
fn dedupe(models: Vec<Model>, provider_name: &str) -> Vec<Model> {
    let mut seen = HashSet::new();

    models
        .into_iter()
        .filter(|model| {
            let fresh = seen.insert(model.id().clone());
            if !fresh {
                warn!(
                    "Skipping duplicate model id {} from {}",
                    model.id(),
                    provider_name
                );
            }
            fresh
        })
        .collect()
}

/// Replace fetched entries, keep locally added ones at the end, and repair
/// the selection
fn merge_catalog(state: &mut CatalogState, added: &mut Vec<ModelId>, fetched: Vec<Model>) {
    let fetched_ids: HashSet<ModelId> = fetched.iter().map(|m| m.id().clone()).collect();
    added.retain(|id| !fetched_ids.contains(id));

    let mut models = fetched;
    models.extend(
        state
            .models
            .drain(..)
            .filter(|m| added.contains(m.id())),
    );

    state.models = models;
    state.error = None;

    let selection_valid = state
        .selected
        .as_ref()
        .is_some_and(|id| state.models.iter().any(|m| m.id() == id));

    if !selection_valid {
        state.selected = state.models.first().map(|m| m.id().clone());
    }
}

impl std::fmt::Debug for ModelCatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelCatalogStore")
            .field("state", &self.inner.state)
            .field("provider", &self.inner.provider.provider_name())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CatalogLoadError, MockModelProvider, TimestampIdGenerator};
    use crate::infrastructure::model::{fixture_models, FixtureModelProvider};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn new_model(name: &str) -> NewModel {
        NewModel {
            name: name.to_string(),
            provider: Provider::Custom,
            description: "Fine-tuned in-house model".to_string(),
            capabilities: vec!["chat".to_string()],
            parameters: None,
            api_endpoint: Some("https://models.internal.example.com/v1".to_string()),
        }
    }

    async fn fixture_store() -> ModelCatalogStore {
        let store = ModelCatalogStore::new(
            Arc::new(FixtureModelProvider::new(Duration::ZERO)),
            Arc::new(TimestampIdGenerator::new()),
        );
        store.settled().await;
        store
    }

    fn ids(state: &CatalogState) -> Vec<&str> {
        state.models.iter().map(|m| m.id().as_str()).collect()
    }

    #[tokio::test]
    async fn test_initial_load_selects_first_model() {
        let store = fixture_store().await;

        let state = store.snapshot();
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert_eq!(ids(&state), vec!["1", "2", "3", "4"]);
        assert_eq!(state.selected.as_ref().map(ModelId::as_str), Some("1"));
        assert_eq!(state.selected_model().map(Model::name), Some("GPT-4 Turbo"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_is_loading_until_catalog_arrives() {
        let store = ModelCatalogStore::new(
            Arc::new(FixtureModelProvider::new(Duration::from_millis(10))),
            Arc::new(TimestampIdGenerator::new()),
        );

        let initial = store.snapshot();
        assert!(initial.is_loading);
        assert!(initial.models.is_empty());
        assert!(initial.selected.is_none());

        let settled = store.settled().await;
        assert_eq!(settled.models.len(), 4);
    }

    #[tokio::test]
    async fn test_select_known_and_unknown_ids() {
        let store = fixture_store().await;

        assert!(store.select("3"));
        assert_eq!(store.snapshot().selected.as_ref().map(ModelId::as_str), Some("3"));

        assert!(!store.select("99"));
        let state = store.snapshot();
        assert_eq!(state.selected.as_ref().map(ModelId::as_str), Some("3"));
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_select_same_model_does_not_notify() {
        let store = fixture_store().await;
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        store.subscribe(move |_: &CatalogState| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(store.select("1"));
        assert!(!store.select("missing"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(store.select("2"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_add_model_appends_with_distinct_ids() {
        let store = fixture_store().await;

        let first = store.add_model(new_model("In-house"));
        assert_eq!(store.snapshot().models.len(), 5);

        let second = store.add_model(new_model("In-house"));
        let state = store.snapshot();

        assert_eq!(state.models.len(), 6);
        assert_ne!(first.id(), second.id());
        assert_eq!(state.models[4].id(), first.id());
        assert_eq!(state.models[5].id(), second.id());
        assert_eq!(state.selected.as_ref().map(ModelId::as_str), Some("1"));
        assert!(store.select(second.id().as_str()));
    }

    #[tokio::test]
    async fn test_add_model_skips_ids_already_in_catalog() {
        struct Sequence(AtomicU64);

        impl ModelIdGenerator for Sequence {
            fn next_id(&self) -> ModelId {
                ModelId::from_sequence(self.0.fetch_add(1, Ordering::SeqCst))
            }
        }

        // Starts on "3", which the fixtures already use
        let store = ModelCatalogStore::new(
            Arc::new(FixtureModelProvider::new(Duration::ZERO)),
            Arc::new(Sequence(AtomicU64::new(3))),
        );
        store.settled().await;

        let added = store.add_model(new_model("Next"));

        assert_eq!(added.id().as_str(), "5");
        assert_eq!(store.snapshot().models.len(), 5);
    }

    #[tokio::test]
    async fn test_load_failure_sets_error_and_leaves_catalog_empty() {
        let mut provider = MockModelProvider::new();
        provider
            .expect_fetch_catalog()
            .returning(|| Err(CatalogLoadError::unreachable("connection refused")));
        provider.expect_provider_name().return_const("mock");

        let store = ModelCatalogStore::new(
            Arc::new(provider),
            Arc::new(TimestampIdGenerator::new()),
        );
        let state = store.settled().await;

        assert!(state.models.is_empty());
        assert!(state.selected.is_none());
        assert_eq!(state.error.as_deref(), Some("Failed to load models"));
    }

    #[tokio::test]
    async fn test_manual_retry_after_failure() {
        let mut provider = MockModelProvider::new();
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        provider.expect_fetch_catalog().returning(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(CatalogLoadError::malformed("truncated response"))
            } else {
                Ok(fixture_models())
            }
        });
        provider.expect_provider_name().return_const("mock");

        let store = ModelCatalogStore::new(
            Arc::new(provider),
            Arc::new(TimestampIdGenerator::new()),
        );
        assert!(store.settled().await.error.is_some());

        let outcome = store.load().await;

        assert_eq!(outcome, LoadOutcome::Loaded { count: 4 });
        let state = store.snapshot();
        assert!(state.error.is_none());
        assert_eq!(state.selected.as_ref().map(ModelId::as_str), Some("1"));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reload_keeps_selection_and_added_models() {
        let store = fixture_store().await;
        let added = store.add_model(new_model("Local"));
        store.select("4");

        assert_eq!(store.load().await, LoadOutcome::Loaded { count: 4 });

        let state = store.snapshot();
        assert_eq!(state.models.len(), 5);
        assert_eq!(state.models[4].id(), added.id());
        assert_eq!(state.selected.as_ref().map(ModelId::as_str), Some("4"));
    }

    #[tokio::test]
    async fn test_reload_repairs_selection_missing_from_new_catalog() {
        let mut provider = MockModelProvider::new();
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        provider.expect_fetch_catalog().returning(move || {
            let models = fixture_models();
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(models)
            } else {
                Ok(models.into_iter().skip(1).collect())
            }
        });
        provider.expect_provider_name().return_const("mock");

        let store = ModelCatalogStore::new(
            Arc::new(provider),
            Arc::new(TimestampIdGenerator::new()),
        );
        store.settled().await;
        assert_eq!(store.snapshot().selected.as_ref().map(ModelId::as_str), Some("1"));

        store.load().await;

        let state = store.snapshot();
        assert_eq!(ids(&state), vec!["2", "3", "4"]);
        assert_eq!(state.selected.as_ref().map(ModelId::as_str), Some("2"));
    }

    #[tokio::test]
    async fn test_duplicate_ids_from_provider_are_dropped() {
        let mut provider = MockModelProvider::new();
        provider.expect_fetch_catalog().returning(|| {
            let mut models = fixture_models();
            models.push(models[0].clone());
            Ok(models)
        });
        provider.expect_provider_name().return_const("mock");

        let store = ModelCatalogStore::new(
            Arc::new(provider),
            Arc::new(TimestampIdGenerator::new()),
        );

        assert_eq!(store.settled().await.models.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_loads_keep_latest() {
        let store = ModelCatalogStore::new(
            Arc::new(FixtureModelProvider::new(Duration::from_millis(30))),
            Arc::new(TimestampIdGenerator::new()),
        );

        // The initial load is still pending when the retry starts
        let outcome = store.load().await;

        assert_eq!(outcome, LoadOutcome::Loaded { count: 4 });
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(!store.snapshot().is_loading);
        assert_eq!(store.snapshot().models.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disposed_store_ignores_initial_load() {
        let store = ModelCatalogStore::new(
            Arc::new(FixtureModelProvider::new(Duration::from_millis(10))),
            Arc::new(TimestampIdGenerator::new()),
        );
        store.dispose();

        tokio::time::sleep(Duration::from_millis(30)).await;

        let state = store.snapshot();
        assert!(state.models.is_empty());
        assert!(state.is_loading);
        assert!(!store.select("1"));
        assert_eq!(store.load().await, LoadOutcome::Disposed);
    }

    #[tokio::test]
    async fn test_filters() {
        let store = fixture_store().await;
        let state = store.snapshot();

        let embedding: Vec<&str> = state
            .with_capability("embedding")
            .into_iter()
            .map(Model::name)
            .collect();
        assert_eq!(embedding, vec!["GPT-4 Turbo", "Llama 3 70B"]);

        let reasoning = state.with_capability("reasoning");
        assert_eq!(reasoning.len(), 2);

        let anthropic = state.by_provider(Provider::Anthropic);
        assert_eq!(anthropic.len(), 1);
        assert_eq!(anthropic[0].name(), "Claude 3 Opus");
        assert!(state.by_provider(Provider::Azure).is_empty());
    }
}
