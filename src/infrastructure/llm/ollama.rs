use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt as _;
use rig::providers::ollama;
use std::time::Duration;

use crate::domain::{ports::LlmService, DomainError, Prompt};
use crate::infrastructure::config::LlmConfig;

/// Chat completions from a local Ollama server (`OLLAMA_API_BASE_URL`).
pub struct OllamaLlm {
    model: String,
    timeout: Duration,
}

impl OllamaLlm {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            timeout: Duration::from_secs(LlmConfig::default().timeout_seconds),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(config.model.clone()).with_timeout(Duration::from_secs(config.timeout_seconds))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl LlmService for OllamaLlm {
    async fn generate(&self, prompt: &Prompt) -> Result<String, DomainError> {
        let client = ollama::Client::from_env();
        let agent = client.agent(&self.model).preamble(&prompt.system).build();

        let conversation = prompt.conversation();
        tokio::time::timeout(self.timeout, agent.prompt(&conversation))
            .await
            .map_err(|_| DomainError::timeout("Generation timed out"))?
            .map_err(|e| DomainError::generation(e.to_string()))
    }
}
