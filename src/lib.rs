//! LLM Playground
//!
//! Client-side state for an LLM playground:
//! - Session store with sign-in, registration, sign-out and route guarding
//! - Model catalog store with selection and locally added models
//! - Simulated auth backend and fixture or file based model catalogs

pub mod cli;
pub mod config;
pub mod domain;
pub mod forms;
pub mod infrastructure;
pub mod state;
pub mod store;

pub use crate::config::AppConfig;
pub use state::PlaygroundState;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use domain::{AuthBackend, TimestampIdGenerator};
use infrastructure::{
    model::ModelProviderFactory,
    user::{Argon2Hasher, SimulatedAuthBackend},
};
use store::{ModelCatalogStore, SessionStore};

/// Create the playground state with default configuration
pub async fn create_playground_state() -> anyhow::Result<PlaygroundState> {
    create_playground_state_with_config(&AppConfig::default()).await
}

/// Create the playground state with custom configuration.
///
/// Both stores start their initial request immediately.
pub async fn create_playground_state_with_config(
    config: &AppConfig,
) -> anyhow::Result<PlaygroundState> {
    let auth_backend = create_auth_backend(&config.auth)?;

    let model_provider = ModelProviderFactory::create(&config.catalog)
        .map_err(|e| anyhow::anyhow!("Failed to create model provider: {}", e))?;
    info!("Model catalog source: {}", model_provider.provider_name());

    let session = SessionStore::new(auth_backend);
    let catalog = ModelCatalogStore::new(model_provider, Arc::new(TimestampIdGenerator::new()));

    Ok(PlaygroundState::new(session, catalog))
}

fn create_auth_backend(config: &crate::config::AuthConfig) -> anyhow::Result<Arc<dyn AuthBackend>> {
    let mut backend = SimulatedAuthBackend::new(
        Arc::new(Argon2Hasher::new()),
        Duration::from_millis(config.latency_ms),
    )
    .with_jitter(Duration::from_millis(config.jitter_ms))
    .with_default_role(config.default_role)
    .with_remembered_sessions(config.remember_sessions);

    if let Some(demo) = &config.demo_account {
        backend = backend
            .with_account(&demo.name, &demo.email, &demo.password, demo.role)
            .map_err(|e| anyhow::anyhow!("Failed to seed demo account: {}", e))?;
        info!("Seeded demo account {}", demo.email);
    }

    if let Some(email) = &config.persisted_session {
        backend = backend
            .with_persisted_account(email)
            .map_err(|e| anyhow::anyhow!("Failed to seed persisted session: {}", e))?;
        info!("Seeded persisted session for {}", email);
    }

    Ok(Arc::new(backend))
}
