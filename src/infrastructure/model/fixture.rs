//! Built-in fixture catalog

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{CatalogLoadError, Model, ModelId, ModelProvider, Provider};

/// The four models the playground ships with, ids `1` to `4`
pub fn fixture_models() -> Vec<Model> {
    vec![
        Model::new(
            ModelId::from_sequence(1),
            "GPT-4 Turbo",
            Provider::OpenAi,
            "Advanced language model with improved reasoning capabilities",
        )
        .with_capabilities(["chat", "completion", "embedding", "function-calling"]),
        Model::new(
            ModelId::from_sequence(2),
            "Claude 3 Opus",
            Provider::Anthropic,
            "State-of-the-art model with strong reasoning and safety features",
        )
        .with_capabilities(["chat", "completion", "reasoning"]),
        Model::new(
            ModelId::from_sequence(3),
            "Gemini 1.5 Pro",
            Provider::Gcp,
            "Google's multimodal model with strong context handling",
        )
        .with_capabilities(["chat", "completion", "multimodal", "reasoning"]),
        Model::new(
            ModelId::from_sequence(4),
            "Llama 3 70B",
            Provider::Custom,
            "Meta's open model with excellent performance",
        )
        .with_capabilities(["chat", "completion", "embedding"])
        .with_api_endpoint("https://api.example.com/llama3"),
    ]
}

/// Serves [`fixture_models`] after a simulated network delay
#[derive(Debug, Clone)]
pub struct FixtureModelProvider {
    latency: Duration,
    unavailable: bool,
}

impl FixtureModelProvider {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            unavailable: false,
        }
    }

    /// Simulate an outage: every fetch fails as unreachable
    pub fn with_unavailable(mut self, unavailable: bool) -> Self {
        self.unavailable = unavailable;
        self
    }
}

#[async_trait]
impl ModelProvider for FixtureModelProvider {
    async fn fetch_catalog(&self) -> Result<Vec<Model>, CatalogLoadError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.unavailable {
            return Err(CatalogLoadError::unreachable(
                "fixture provider configured as unavailable",
            ));
        }

        Ok(fixture_models())
    }

    fn provider_name(&self) -> &'static str {
        "fixture"
    }
}
