use crate::domain::{errors::DomainError, Embedding};
use async_trait::async_trait;

/// Must be the same model for chunks and queries.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError>;
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError>;
    /// Length of every vector this service returns. Indexing rejects any other.
    fn dimension(&self) -> usize;
}
