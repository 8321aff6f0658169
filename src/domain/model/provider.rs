//! Model catalog provider trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::Model;
use crate::domain::CatalogLoadError;

/// Source of the model catalog (remote registry, fixture, file...)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Fetch the full catalog, in display order
    async fn fetch_catalog(&self) -> Result<Vec<Model>, CatalogLoadError>;

    /// Get the provider name (used in logs)
    fn provider_name(&self) -> &'static str;
}
