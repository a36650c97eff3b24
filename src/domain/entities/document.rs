use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use uuid::Uuid;

/// An uploaded document awaiting ingestion. Consumed by ingest, never retained.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    pub source: DocumentSource,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum DocumentSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl Document {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::new(name, DocumentSource::Path(path))
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(name.into(), DocumentSource::Bytes(bytes.into()))
    }

    fn new(name: String, source: DocumentSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            source,
            received_at: Utc::now(),
        }
    }
}

/// Page-ordered text of a document. Pages without text are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub pages: Vec<String>,
}

impl ExtractedText {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every page followed by a single space, in page order.
    pub fn text(&self) -> String {
        let mut text = String::with_capacity(self.pages.iter().map(|p| p.len() + 1).sum());
        for page in &self.pages {
            text.push_str(page);
            text.push(' ');
        }
        text
    }

    /// 1-based page holding `offset` of [`ExtractedText::text`].
    pub fn page_at(&self, offset: usize) -> Option<usize> {
        let mut end = 0;
        for (i, page) in self.pages.iter().enumerate() {
            end += page.len() + 1;
            if offset < end {
                return Some(i + 1);
            }
        }
        if self.pages.is_empty() {
            None
        } else {
            Some(self.pages.len())
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChunk {
    pub id: Uuid,
    pub document_id: Uuid,
    pub content: String,
    pub chunk_index: usize,
    pub metadata: ChunkMetadata,
}

impl TextChunk {
    pub fn new(document_id: Uuid, content: impl Into<String>, chunk_index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            content: content.into(),
            chunk_index,
            metadata: ChunkMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ChunkMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Free-form chunk metadata. Vector stores only accept scalar values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkMetadata(Map<String, Value>);

impl ChunkMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_scalar_only(&self) -> bool {
        self.0.values().all(is_scalar)
    }

    /// Drops null, array and object values, returning the removed keys.
    pub fn filter_complex(&mut self) -> Vec<String> {
        let dropped: Vec<String> = self
            .0
            .iter()
            .filter(|(_, v)| !is_scalar(v))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &dropped {
            self.0.remove(key);
        }
        dropped
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: TextChunk,
    pub score: f32,
}
