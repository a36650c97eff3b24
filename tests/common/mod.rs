#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use pdf_chat::application::{AnsweringPipeline, ChatSession, EmbeddingIndexer};
use pdf_chat::domain::ports::{DocumentReader, EmbeddingService, LlmService};
use pdf_chat::domain::{
    Document, DocumentSource, DomainError, Embedding, ExtractedText, Prompt, TextSplitter,
};
use pdf_chat::infrastructure::InMemoryVectorStoreFactory;

pub const PAGE_BREAK: char = '\u{c}';

const DIMENSION: usize = 256;

/// Bag-of-words vectors: each lowercase word bumps one hashed dimension.
/// Fails while `failing` is set.
#[derive(Default)]
pub struct HashingEmbedding {
    pub failing: AtomicBool,
}

impl HashingEmbedding {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::external("embedding server unavailable"));
        }
        Ok(())
    }
}

fn hash_vector(text: &str) -> Embedding {
    let mut vector = vec![0.0f32; DIMENSION];
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let mut hasher = DefaultHasher::new();
        word.to_lowercase().hash(&mut hasher);
        vector[(hasher.finish() % DIMENSION as u64) as usize] += 1.0;
    }
    Embedding::new(vector)
}

#[async_trait]
impl EmbeddingService for HashingEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        self.check()?;
        Ok(hash_vector(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        self.check()?;
        Ok(texts.iter().map(|t| hash_vector(t)).collect())
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }
}

/// Answers with the user turn of the prompt (context and question), and
/// records every prompt it receives. Fails while `failing` is set.
#[derive(Default)]
pub struct EchoLlm {
    pub prompts: Mutex<Vec<Prompt>>,
    pub failing: AtomicBool,
}

impl EchoLlm {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Prompt {
        self.prompts.lock().unwrap().last().cloned().expect("no prompt recorded")
    }
}

#[async_trait]
impl LlmService for EchoLlm {
    async fn generate(&self, prompt: &Prompt) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::generation("model server unavailable"));
        }
        Ok(prompt.user.clone())
    }
}

/// Treats document bytes as UTF-8 text with form feeds between pages.
/// Anything that is not valid UTF-8 counts as a corrupt document.
pub struct TextReader;

#[async_trait]
impl DocumentReader for TextReader {
    async fn extract(&self, document: &Document) -> Result<ExtractedText, DomainError> {
        let bytes = match &document.source {
            DocumentSource::Path(path) => tokio::fs::read(path).await?,
            DocumentSource::Bytes(bytes) => bytes.clone(),
        };
        let text = String::from_utf8(bytes)
            .map_err(|_| DomainError::io(format!("{} is not a readable document", document.name)))?;
        Ok(ExtractedText::new(
            text.split(PAGE_BREAK).map(str::to_string).collect(),
        ))
    }
}

pub fn text_document(name: &str, pages: &[&str]) -> Document {
    Document::from_bytes(name, pages.join(&PAGE_BREAK.to_string()).into_bytes())
}

pub fn corrupt_document() -> Document {
    Document::from_bytes("broken.pdf", vec![0xff, 0xfe, 0x00, 0x9f])
}

pub fn paris_text() -> String {
    "Paris is the capital of France. ".repeat(50)
}

pub fn berlin_text() -> String {
    "Berlin is the capital of Germany. ".repeat(10)
}

pub fn session_with(llm: Arc<EchoLlm>) -> ChatSession {
    session_with_embedding(llm, Arc::new(HashingEmbedding::default()))
}

pub fn session_with_embedding(llm: Arc<EchoLlm>, embedding: Arc<HashingEmbedding>) -> ChatSession {
    let indexer = Arc::new(EmbeddingIndexer::new(
        embedding,
        Arc::new(InMemoryVectorStoreFactory),
    ));
    let pipeline = AnsweringPipeline::new(indexer, llm);
    ChatSession::new(
        Arc::new(TextReader),
        TextSplitter::new(1024, 100).unwrap(),
        pipeline,
    )
}
