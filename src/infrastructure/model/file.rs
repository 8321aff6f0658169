//! Catalog read from a TOML file
//!
//! ```toml
//! [[models]]
//! id = "1"
//! name = "GPT-4 Turbo"
//! provider = "openai"
//! description = "Advanced language model"
//! capabilities = ["chat", "completion"]
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{validate_model_name, CatalogLoadError, Model, ModelProvider};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    models: Vec<Model>,
}

/// Reads the catalog from disk on every fetch
#[derive(Debug, Clone)]
pub struct FileModelProvider {
    path: PathBuf,
}

impl FileModelProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse catalog TOML, rejecting entries with blank names
pub fn parse_catalog(contents: &str) -> Result<Vec<Model>, CatalogLoadError> {
    let file: CatalogFile =
        toml::from_str(contents).map_err(|e| CatalogLoadError::malformed(e.to_string()))?;

    for model in &file.models {
        validate_model_name(model.name()).map_err(|e| {
            CatalogLoadError::malformed(format!("model '{}': {}", model.id(), e))
        })?;
    }

    Ok(file.models)
}

#[async_trait]
impl ModelProvider for FileModelProvider {
    async fn fetch_catalog(&self) -> Result<Vec<Model>, CatalogLoadError> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CatalogLoadError::unreachable(format!("{}: {}", self.path.display(), e))
        })?;

        parse_catalog(&contents)
    }

    fn provider_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Provider;

    const CATALOG: &str = r#"
        [[models]]
        id = "mistral-large"
        name = "Mistral Large"
        provider = "azure"
        description = "Hosted on Azure AI"
        capabilities = ["chat"]
        api_endpoint = "https://example.azure.com/mistral"

        [models.parameters]
        temperature = 0.2

        [[models]]
        id = "titan"
        name = "Titan Text"
        provider = "aws"
        description = "Bedrock text model"
    "#;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("catalog-{}.toml", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_parse_catalog() {
        let models = parse_catalog(CATALOG).unwrap();

        assert_eq!(models.len(), 2);
        assert_eq!(models[0].provider(), Provider::Azure);
        assert_eq!(
            models[0].parameters().and_then(|p| p.get("temperature")),
            Some(&serde_json::json!(0.2))
        );
        assert!(models[1].capabilities().is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_entries() {
        let bad_id = r#"
            [[models]]
            id = "-bad"
            name = "Bad"
            provider = "openai"
            description = ""
        "#;
        assert!(matches!(
            parse_catalog(bad_id),
            Err(CatalogLoadError::Malformed { .. })
        ));

        let blank_name = r#"
            [[models]]
            id = "ok"
            name = "  "
            provider = "openai"
            description = ""
        "#;
        assert!(matches!(
            parse_catalog(blank_name),
            Err(CatalogLoadError::Malformed { .. })
        ));

        let unknown_provider = r#"
            [[models]]
            id = "ok"
            name = "Ok"
            provider = "bedrock"
            description = ""
        "#;
        assert!(parse_catalog(unknown_provider).is_err());
    }

    #[test]
    fn test_empty_file_is_empty_catalog() {
        assert!(parse_catalog("").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_from_disk() {
        let path = temp_path();
        tokio::fs::write(&path, CATALOG).await.unwrap();

        let provider = FileModelProvider::new(&path);
        let models = provider.fetch_catalog().await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(models.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_unreachable() {
        let provider = FileModelProvider::new(temp_path());

        assert!(matches!(
            provider.fetch_catalog().await,
            Err(CatalogLoadError::Unreachable { .. })
        ));
    }
}
