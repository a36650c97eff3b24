mod answering;
mod indexing;
mod session;

pub use answering::{AnsweringPipeline, DEFAULT_TOP_K, NO_DOCUMENT_RESPONSE};
pub use indexing::{DocumentIndex, EmbeddingIndexer, DEFAULT_EMBED_BATCH_SIZE};
pub use session::{ChatSession, IngestSummary};
