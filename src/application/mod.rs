//! Application layer - Use cases and orchestration.
//!
//! Services depend on domain ports (traits) rather than concrete
//! implementations. `ChatSession` is the only entry point the HTTP layer uses.

pub mod services;

pub use services::{
    AnsweringPipeline, ChatSession, DocumentIndex, EmbeddingIndexer, IngestSummary,
    DEFAULT_EMBED_BATCH_SIZE, DEFAULT_TOP_K, NO_DOCUMENT_RESPONSE,
};
