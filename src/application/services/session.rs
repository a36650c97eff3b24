use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

use super::answering::AnsweringPipeline;
use super::indexing::DocumentIndex;
use crate::domain::{
    ports::DocumentReader, ConversationMemory, Document, DomainError, TextSplitter,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub documents: usize,
    pub pages: usize,
    pub chunks: usize,
}

/// One user's assistant: the live index plus the conversation so far.
///
/// Exposes `ingest`, `ask` and `clear` and nothing else. Not shared; callers
/// that serve several requests must serialize access themselves.
pub struct ChatSession {
    reader: Arc<dyn DocumentReader>,
    splitter: TextSplitter,
    pipeline: AnsweringPipeline,
    index: Option<DocumentIndex>,
    memory: ConversationMemory,
}

impl ChatSession {
    pub fn new(
        reader: Arc<dyn DocumentReader>,
        splitter: TextSplitter,
        pipeline: AnsweringPipeline,
    ) -> Self {
        Self {
            reader,
            splitter,
            pipeline,
            index: None,
            memory: ConversationMemory::new(),
        }
    }

    pub async fn ingest(&mut self, document: Document) -> Result<IngestSummary, DomainError> {
        self.ingest_all(vec![document]).await
    }

    /// Replaces the index with one built from all `documents` and starts a
    /// fresh conversation. The new index is swapped in only once it is
    /// complete; on error the previous index and conversation stay as they were.
    #[instrument(skip(self, documents), fields(documents = documents.len()))]
    pub async fn ingest_all(
        &mut self,
        documents: Vec<Document>,
    ) -> Result<IngestSummary, DomainError> {
        if documents.is_empty() {
            return Err(DomainError::validation("no documents to ingest"));
        }

        let mut summary = IngestSummary {
            documents: documents.len(),
            ..Default::default()
        };
        let mut chunks = Vec::new();
        for document in &documents {
            let extracted = self.reader.extract(document).await?;
            summary.pages += extracted.page_count();

            let document_chunks = self.splitter.split_document(document, &extracted);
            info!(
                document = %document.name,
                received_at = %document.received_at,
                pages = extracted.page_count(),
                chunks = document_chunks.len(),
                "document split"
            );
            chunks.extend(document_chunks);
        }

        let index = self.pipeline.indexer().build(chunks).await?;
        summary.chunks = index.chunk_count();
        self.index = Some(index);
        self.memory.clear();

        info!(pages = summary.pages, chunks = summary.chunks, "ingest completed");
        Ok(summary)
    }

    /// Blank questions are ignored and yield `None`.
    pub async fn ask(&mut self, query: &str) -> Result<Option<String>, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        self.pipeline
            .answer(self.index.as_ref(), &mut self.memory, query)
            .await
            .map(Some)
    }

    pub fn clear(&mut self) {
        self.index = None;
        self.memory.clear();
        info!("session cleared");
    }
}
