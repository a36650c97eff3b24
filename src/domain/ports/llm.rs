use crate::domain::{errors::DomainError, Prompt};
use async_trait::async_trait;

#[async_trait]
pub trait LlmService: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String, DomainError>;
}
