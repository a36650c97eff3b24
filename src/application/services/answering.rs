use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::indexing::{DocumentIndex, EmbeddingIndexer};
use crate::domain::{
    ports::LlmService, ConversationMemory, ConversationTurn, DomainError, PromptTemplate,
};

/// Answer given while no document set is loaded.
pub const NO_DOCUMENT_RESPONSE: &str = "Please, add a PDF document first.";
pub const DEFAULT_TOP_K: usize = 4;

const CONTEXT_SEPARATOR: &str = "\n\n";

/// Retrieve, assemble the prompt, generate, remember.
pub struct AnsweringPipeline {
    indexer: Arc<EmbeddingIndexer>,
    llm: Arc<dyn LlmService>,
    template: PromptTemplate,
    top_k: usize,
    include_history: bool,
}

impl AnsweringPipeline {
    pub fn new(indexer: Arc<EmbeddingIndexer>, llm: Arc<dyn LlmService>) -> Self {
        Self {
            indexer,
            llm,
            template: PromptTemplate::default(),
            top_k: DEFAULT_TOP_K,
            include_history: true,
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_history(mut self, include_history: bool) -> Self {
        self.include_history = include_history;
        self
    }

    pub fn indexer(&self) -> &Arc<EmbeddingIndexer> {
        &self.indexer
    }

    /// Answers `query` against `index`. Generation failures propagate and
    /// leave `memory` unchanged; only successful answers are remembered.
    #[instrument(skip(self, index, memory, query), fields(top_k = self.top_k))]
    pub async fn answer(
        &self,
        index: Option<&DocumentIndex>,
        memory: &mut ConversationMemory,
        query: &str,
    ) -> Result<String, DomainError> {
        let Some(index) = index else {
            info!("question asked before any document was ingested");
            return Ok(NO_DOCUMENT_RESPONSE.to_string());
        };

        let chunks = self.indexer.retrieve(Some(index), query, self.top_k).await?;
        let context = chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);

        let history = if self.include_history {
            memory.messages()
        } else {
            Vec::new()
        };
        debug!(chunks = chunks.len(), prior_turns = memory.len(), "prompt assembled");

        let prompt = self.template.render(query, &context, history);
        let answer = self.llm.generate(&prompt).await?;

        memory.append(ConversationTurn::new(query, answer.clone()));
        Ok(answer)
    }
}
