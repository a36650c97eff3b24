mod conversation;
mod document;
mod embedding;
mod prompt;

pub use conversation::{ConversationMemory, ConversationTurn, Message, MessageRole};
pub use document::{
    ChunkMetadata, Document, DocumentSource, ExtractedText, SearchResult, TextChunk,
};
pub use embedding::Embedding;
pub use prompt::{
    Prompt, PromptTemplate, CONTEXT_PLACEHOLDER, DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_PROMPT,
    QUESTION_PLACEHOLDER,
};
