//! Data types for documents, stored chunks, and search results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form metadata attached to a document or chunk.
pub type Metadata = Map<String, Value>;

/// A unit of text with its metadata.
///
/// The PDF loader yields one `Document` per page; the splitter yields one per
/// chunk. `id` is assigned at ingestion time (`doc-<index>`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Stable identifier, if one has been assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The text content.
    pub text: String,
    /// Key-value metadata.
    pub metadata: Metadata,
}

impl Document {
    /// Create a document with the given text and no metadata.
    pub fn new(text: impl Into<String>) -> Self {
        Self { id: None, text: text.into(), metadata: Metadata::new() }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Attach an identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A chunk as written to a [`VectorStore`](crate::VectorStore).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredChunk {
    /// Unique identifier; the sole key for upsert.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text.
    pub embedding: Vec<f32>,
    /// Sanitized metadata inherited from the source page.
    pub metadata: Metadata,
}

/// A retrieved chunk paired with its distance to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk. Backends may leave `embedding` empty.
    pub chunk: StoredChunk,
    /// Vector distance to the query (lower is more relevant).
    pub distance: f32,
}

/// Drop metadata entries whose value is `null`, `""`, `[]` or `{}`.
///
/// Other falsy values such as `0` and `false` are kept.
pub fn sanitize_metadata(metadata: &Metadata) -> Metadata {
    metadata
        .iter()
        .filter(|(_, value)| !is_empty_value(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
