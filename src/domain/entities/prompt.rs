use serde::{Deserialize, Serialize};

use super::conversation::Message;
use crate::domain::errors::{DomainError, Result};

pub const QUESTION_PLACEHOLDER: &str = "{question}";
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that analyses information \
from different documents. Use the following pieces of retrieved context to answer the question. \
Give specific details when possible. If you don't know the answer, just say that you don't know.";

pub const DEFAULT_USER_PROMPT: &str = "Question: {question}\nContext: {context}\nAnswer:";

/// Fixed instructions plus a user template with `{question}` and `{context}` slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    system: String,
    user: String,
}

impl PromptTemplate {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Result<Self> {
        let user = user.into();
        for placeholder in [QUESTION_PLACEHOLDER, CONTEXT_PLACEHOLDER] {
            if !user.contains(placeholder) {
                return Err(DomainError::validation(format!(
                    "prompt template is missing the {placeholder} placeholder"
                )));
            }
        }
        Ok(Self {
            system: system.into(),
            user,
        })
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn render(&self, question: &str, context: &str, history: Vec<Message>) -> Prompt {
        Prompt {
            system: self.system.clone(),
            history,
            user: fill(&self.user, question, context),
        }
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM_PROMPT.to_string(),
            user: DEFAULT_USER_PROMPT.to_string(),
        }
    }
}

// Single pass, so placeholder text inside the substituted values is left alone.
fn fill(template: &str, question: &str, context: &str) -> String {
    let mut out = String::with_capacity(template.len() + question.len() + context.len());
    let mut rest = template;
    loop {
        let next = [
            (rest.find(QUESTION_PLACEHOLDER), QUESTION_PLACEHOLDER, question),
            (rest.find(CONTEXT_PLACEHOLDER), CONTEXT_PLACEHOLDER, context),
        ]
        .into_iter()
        .filter_map(|(pos, placeholder, value)| pos.map(|p| (p, placeholder, value)))
        .min_by_key(|(pos, _, _)| *pos);

        match next {
            Some((pos, placeholder, value)) => {
                out.push_str(&rest[..pos]);
                out.push_str(value);
                rest = &rest[pos + placeholder.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

/// A fully assembled generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub history: Vec<Message>,
    pub user: String,
}

impl Prompt {
    /// Prior turns in chronological order, then the current context and question.
    pub fn conversation(&self) -> String {
        if self.history.is_empty() {
            return self.user.clone();
        }

        let history = self
            .history
            .iter()
            .map(|m| format!("{}: {}", m.role.as_str(), m.content))
            .collect::<Vec<_>>()
            .join("\n");

        format!("Previous conversation:\n{}\n\n{}", history, self.user)
    }

    pub fn render(&self) -> String {
        format!("{}\n\n{}", self.system, self.conversation())
    }
}
