use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::domain::{
    ports::{VectorStore, VectorStoreFactory},
    DomainError, Embedding, SearchResult, TextChunk,
};

/// Brute-force cosine search over a vector of pairs.
pub struct InMemoryVectorStore {
    chunks: RwLock<Vec<(TextChunk, Embedding)>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, chunk: &TextChunk, embedding: &Embedding) -> Result<(), DomainError> {
        if !chunk.metadata.is_scalar_only() {
            return Err(DomainError::index_build(format!(
                "chunk {} has non-scalar metadata",
                chunk.chunk_index
            )));
        }
        if embedding.dimension() == 0 {
            return Err(DomainError::index_build("empty embedding"));
        }

        let mut store = self
            .chunks
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        if let Some((_, first)) = store.first() {
            if first.dimension() != embedding.dimension() {
                return Err(DomainError::index_build(format!(
                    "embedding dimension {} does not match index dimension {}",
                    embedding.dimension(),
                    first.dimension()
                )));
            }
        }

        store.retain(|(c, _)| c.id != chunk.id);
        store.push((chunk.clone(), embedding.clone()));
        Ok(())
    }

    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let store = self
            .chunks
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let mut results: Vec<SearchResult> = store
            .iter()
            .map(|(chunk, embedding)| SearchResult {
                chunk: chunk.clone(),
                score: query.cosine_similarity(embedding),
            })
            .collect();

        // Stable sort keeps insertion order among equal scores.
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);

        Ok(results)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let store = self
            .chunks
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        Ok(store.len())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryVectorStoreFactory;

impl VectorStoreFactory for InMemoryVectorStoreFactory {
    fn create(&self) -> Arc<dyn VectorStore> {
        Arc::new(InMemoryVectorStore::new())
    }
}
