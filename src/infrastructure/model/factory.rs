use std::sync::Arc;
use std::time::Duration;

use super::{FileModelProvider, FixtureModelProvider};
use crate::config::{CatalogConfig, CatalogSource};
use crate::domain::{DomainError, ModelProvider};

/// Factory for creating the catalog provider
#[derive(Debug)]
pub struct ModelProviderFactory;

impl ModelProviderFactory {
    /// Create a model provider from configuration
    pub fn create(config: &CatalogConfig) -> Result<Arc<dyn ModelProvider>, DomainError> {
        match config.source {
            CatalogSource::Fixture => {
                let provider = FixtureModelProvider::new(Duration::from_millis(config.latency_ms))
                    .with_unavailable(config.unavailable);
                Ok(Arc::new(provider))
            }

            CatalogSource::File => {
                let path = config.path.as_ref().ok_or_else(|| {
                    DomainError::configuration("catalog.path is required when catalog.source = \"file\"")
                })?;

                if path.as_os_str().is_empty() {
                    return Err(DomainError::validation("catalog.path must not be empty"));
                }

                Ok(Arc::new(FileModelProvider::new(path)))
            }
        }
    }
}
