//! Overlapping character-window splitter.
//!
//! Windows of at most `chunk_size` characters are cut at the latest paragraph
//! break, falling back to a line break, a sentence end, a space and finally a
//! hard character cut. Each window after the first starts with the last
//! `chunk_overlap` characters of the previous one, so dropping those leading
//! characters and concatenating gives back the input exactly. Text made only
//! of whitespace has nothing to retrieve and yields no chunks at all.

use std::ops::Range;

use crate::domain::errors::{DomainError, Result};
use crate::domain::{ChunkMetadata, Document, ExtractedText, TextChunk};

pub const DEFAULT_CHUNK_SIZE: usize = 1024;
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

const SEPARATOR_LEVELS: &[&[&str]] = &[&["\n\n"], &["\n"], &[". ", "? ", "! "], &[" "]];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(DomainError::validation("chunk_size must be greater than zero"));
        }
        if chunk_overlap >= chunk_size {
            return Err(DomainError::validation(format!(
                "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_spans(text)
            .into_iter()
            .map(|span| text[span].to_string())
            .collect()
    }

    /// Byte ranges of the chunks of `text`. Whitespace-only input yields no
    /// chunks; any other input is covered end to end, surrounding whitespace
    /// included.
    pub fn split_spans(&self, text: &str) -> Vec<Range<usize>> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let total_chars = offsets.len() - 1;

        let mut spans = Vec::new();
        let mut start = 0;
        loop {
            let limit = start + self.chunk_size;
            if limit >= total_chars {
                spans.push(offsets[start]..text.len());
                break;
            }

            let end = self.find_break(text, &offsets, start, limit);
            spans.push(offsets[start]..offsets[end]);
            start = end - self.chunk_overlap;
        }
        spans
    }

    /// Splits a document's extracted text, tagging each chunk with its source and page.
    pub fn split_document(&self, document: &Document, extracted: &ExtractedText) -> Vec<TextChunk> {
        let text = extracted.text();
        self.split_spans(&text)
            .into_iter()
            .enumerate()
            .map(|(index, span)| {
                let mut metadata = ChunkMetadata::new()
                    .with("source", document.name.clone())
                    .with("document_id", document.id.to_string())
                    .with("chunk_index", index);
                if let Some(page) = extracted.page_at(span.start) {
                    metadata.insert("page", page);
                }
                TextChunk::new(document.id, &text[span], index).with_metadata(metadata)
            })
            .collect()
    }

    // Character position in (start + overlap, limit] where the window ends.
    fn find_break(&self, text: &str, offsets: &[usize], start: usize, limit: usize) -> usize {
        // A separator must begin past the overlap or the next window would not advance.
        let floor = (start + self.chunk_overlap).max(start + self.chunk_size / 2);
        let window_start = offsets[floor];
        let window = &text[window_start..offsets[limit]];

        for level in SEPARATOR_LEVELS {
            let best = level
                .iter()
                .filter_map(|sep| window.rfind(sep).map(|i| i + sep.len()))
                .max();
            if let Some(relative) = best {
                if let Ok(position) = offsets.binary_search(&(window_start + relative)) {
                    return position;
                }
            }
        }
        limit
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}
