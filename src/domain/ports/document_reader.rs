use crate::domain::{errors::DomainError, Document, ExtractedText};
use async_trait::async_trait;

#[async_trait]
pub trait DocumentReader: Send + Sync {
    /// Page-ordered text of `document`. Fails with `DomainError::Io` when the
    /// document cannot be read or parsed.
    async fn extract(&self, document: &Document) -> Result<ExtractedText, DomainError>;
}
