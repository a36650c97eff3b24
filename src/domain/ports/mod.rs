mod document_reader;
mod embedding;
mod llm;
mod vector_store;

pub use document_reader::DocumentReader;
pub use embedding::EmbeddingService;
pub use llm::LlmService;
pub use vector_store::{VectorStore, VectorStoreFactory};
