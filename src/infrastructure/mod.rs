pub mod config;
pub mod embedding;
pub mod llm;
pub mod pdf;
pub mod vector_store;

pub use config::{AppConfig, Config, LogFormat, PromptsConfig};
pub use embedding::OllamaEmbedding;
pub use llm::OllamaLlm;
pub use pdf::PdfTextReader;
pub use vector_store::{InMemoryVectorStore, InMemoryVectorStoreFactory};
