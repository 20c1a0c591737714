use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An input document: raw text plus loosely-typed metadata.
///
/// Metadata should carry a page-like field (key `"page"`); it is copied onto
/// every chunk produced from the document. Remaining keys pass through
/// untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Raw document text
    pub text: String,

    /// Pass-through metadata (page number, title, ...)
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Document {
    /// Create a document without metadata
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: Map::new(),
        }
    }

    /// Create a document with metadata
    pub fn with_metadata(text: impl Into<String>, metadata: Map<String, Value>) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }

    /// Builder: set the page metadata field
    #[must_use]
    pub fn page(mut self, page: impl Into<Value>) -> Self {
        self.metadata.insert("page".to_string(), page.into());
        self
    }
}

/// A token-bounded output segment of a document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Chunk text, whitespace-trimmed at cut points
    pub text: String,

    /// Token count as seen by the tokenizer capability
    pub token_count: usize,

    /// Page field copied from the source document's metadata, if present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<Value>,

    /// Position of this chunk within its document (0-based)
    pub ordinal: usize,

    /// Source identifier for traceability (e.g. the original file name)
    pub source: String,

    /// Remaining pass-through metadata from the source document
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Chunk {
    /// Character length of the chunk text
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the chunk text is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
