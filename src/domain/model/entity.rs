//! Model descriptor entity and related types

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validation::{validate_model_id, ModelValidationError};

/// Model identifier - alphanumeric + hyphens, max 50 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelId(String);

impl ModelId {
    /// Create a new ModelId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ModelValidationError> {
        let id = id.into();
        validate_model_id(&id)?;
        Ok(Self(id))
    }

    /// Build an id from a generated sequence number (always valid)
    pub fn from_sequence(value: u64) -> Self {
        Self(value.to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ModelId {
    type Error = ModelValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModelId> for String {
    fn from(id: ModelId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hosting provider of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
    Anthropic,
    OpenAi,
    Custom,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Azure => "azure",
            Self::Gcp => "gcp",
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ModelValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" => Ok(Self::Aws),
            "azure" => Ok(Self::Azure),
            "gcp" => Ok(Self::Gcp),
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAi),
            "custom" => Ok(Self::Custom),
            other => Err(ModelValidationError::UnknownProvider(other.to_string())),
        }
    }
}

/// Model descriptor as shown in the playground catalog
///
/// Descriptors are immutable once created; the catalog only ever appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    id: ModelId,

    name: String,

    provider: Provider,

    description: String,

    /// Capability tags (e.g. "chat", "embedding"); order and duplicates are not significant
    #[serde(default)]
    capabilities: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameters: Option<HashMap<String, serde_json::Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_endpoint: Option<String>,
}

impl Model {
    /// Create a new Model with required fields
    pub fn new(
        id: ModelId,
        name: impl Into<String>,
        provider: Provider,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            provider,
            description: description.into(),
            capabilities: Vec::new(),
            parameters: None,
            api_endpoint: None,
        }
    }

    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parameters(mut self, parameters: HashMap<String, serde_json::Value>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = Some(endpoint.into());
        self
    }

    // Getters

    pub fn id(&self) -> &ModelId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    pub fn parameters(&self) -> Option<&HashMap<String, serde_json::Value>> {
        self.parameters.as_ref()
    }

    pub fn api_endpoint(&self) -> Option<&str> {
        self.api_endpoint.as_deref()
    }

    /// Check whether the model advertises a capability (case-insensitive)
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities
            .iter()
            .any(|c| c.eq_ignore_ascii_case(capability))
    }
}

/// A model descriptor that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewModel {
    pub name: String,
    pub provider: Provider,
    pub description: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub parameters: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub api_endpoint: Option<String>,
}

impl NewModel {
    /// Attach an id, producing the full descriptor
    pub fn into_model(self, id: ModelId) -> Model {
        Model {
            id,
            name: self.name,
            provider: self.provider,
            description: self.description,
            capabilities: self.capabilities,
            parameters: self.parameters,
            api_endpoint: self.api_endpoint,
        }
    }
}
