use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::domain::{
    ports::{EmbeddingService, VectorStore, VectorStoreFactory},
    DomainError, Embedding, TextChunk,
};

pub const DEFAULT_EMBED_BATCH_SIZE: usize = 32;

/// Embedded chunks of the current document set.
pub struct DocumentIndex {
    store: Arc<dyn VectorStore>,
    chunk_count: usize,
}

impl DocumentIndex {
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    pub fn is_empty(&self) -> bool {
        self.chunk_count == 0
    }
}

/// Maps chunks to vectors at ingest time and queries to chunks at ask time.
pub struct EmbeddingIndexer {
    embedding: Arc<dyn EmbeddingService>,
    stores: Arc<dyn VectorStoreFactory>,
    batch_size: usize,
}

impl EmbeddingIndexer {
    pub fn new(embedding: Arc<dyn EmbeddingService>, stores: Arc<dyn VectorStoreFactory>) -> Self {
        Self {
            embedding,
            stores,
            batch_size: DEFAULT_EMBED_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Embeds every chunk into a fresh store. Nothing outside the returned
    /// index is touched, so a failure leaves any previous index usable.
    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    pub async fn build(&self, mut chunks: Vec<TextChunk>) -> Result<DocumentIndex, DomainError> {
        for chunk in &mut chunks {
            let dropped = chunk.metadata.filter_complex();
            if !dropped.is_empty() {
                debug!(chunk_index = chunk.chunk_index, ?dropped, "dropped non-scalar metadata");
            }
        }

        let store = self.stores.create();
        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<&str> = batch.iter().map(|c| c.content.as_str()).collect();
            let embeddings = self.embedding.embed_batch(&texts).await?;
            if embeddings.len() != batch.len() {
                return Err(DomainError::index_build(format!(
                    "embedding backend returned {} vectors for {} chunks",
                    embeddings.len(),
                    batch.len()
                )));
            }

            for (chunk, embedding) in batch.iter().zip(embeddings.iter()) {
                self.check_dimension(embedding)?;
                store.upsert(chunk, embedding).await?;
            }
        }

        let chunk_count = store.count().await?;
        if chunk_count == 0 {
            warn!("index built without any chunks");
        }

        Ok(DocumentIndex { store, chunk_count })
    }

    /// Top `top_k` chunks for `query`, most similar first. An absent or empty
    /// index yields no chunks without calling the embedding backend.
    #[instrument(skip(self, index, query))]
    pub async fn retrieve(
        &self,
        index: Option<&DocumentIndex>,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<TextChunk>, DomainError> {
        let Some(index) = index.filter(|i| !i.is_empty()) else {
            return Ok(Vec::new());
        };
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let embedding = self.embedding.embed(query).await?;
        self.check_dimension(&embedding)?;
        let results = index.store.search(&embedding, top_k).await?;
        debug!(hits = results.len(), "retrieved chunks");

        Ok(results.into_iter().map(|r| r.chunk).collect())
    }

    fn check_dimension(&self, embedding: &Embedding) -> Result<(), DomainError> {
        let expected = self.embedding.dimension();
        if embedding.dimension() != expected {
            return Err(DomainError::index_build(format!(
                "embedding has {} dimensions, model is configured for {}",
                embedding.dimension(),
                expected
            )));
        }
        Ok(())
    }
}
