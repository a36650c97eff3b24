use crate::domain::{errors::DomainError, Embedding, SearchResult, TextChunk};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn upsert(&self, chunk: &TextChunk, embedding: &Embedding) -> Result<(), DomainError>;
    async fn search(&self, query: &Embedding, top_k: usize)
        -> Result<Vec<SearchResult>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Hands out empty stores, one per built index.
pub trait VectorStoreFactory: Send + Sync {
    fn create(&self) -> Arc<dyn VectorStore>;
}
