//! PDF text extraction.
//!
//! Uses lopdf to walk the page tree and extract each page's text separately.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::{ports::DocumentReader, Document, DocumentSource, DomainError, ExtractedText};

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextReader;

impl PdfTextReader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentReader for PdfTextReader {
    #[instrument(skip(self, document), fields(document = %document.name))]
    async fn extract(&self, document: &Document) -> Result<ExtractedText, DomainError> {
        let bytes = match &document.source {
            DocumentSource::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| DomainError::io(format!("{}: {e}", path.display())))?,
            DocumentSource::Bytes(bytes) => bytes.clone(),
        };

        // Parsing is CPU bound.
        let extracted = tokio::task::spawn_blocking(move || extract_pages(&bytes))
            .await
            .map_err(|e| DomainError::internal(format!("PDF extraction task failed: {e}")))??;

        debug!(pages = extracted.page_count(), "pdf extracted");
        Ok(extracted)
    }
}

/// Text of every page in document order. Pages whose text cannot be
/// extracted (scanned images, unsupported fonts) come back empty.
pub fn extract_pages(bytes: &[u8]) -> Result<ExtractedText, DomainError> {
    let pdf = lopdf::Document::load_mem(bytes)
        .map_err(|e| DomainError::io(format!("invalid PDF: {e}")))?;

    let pages = pdf
        .get_pages()
        .into_keys()
        .map(|page_number| match pdf.extract_text(&[page_number]) {
            Ok(text) => text.trim_end().to_string(),
            Err(e) => {
                debug!(page_number, error = %e, "page has no extractable text");
                String::new()
            }
        })
        .collect();

    Ok(ExtractedText::new(pages))
}
