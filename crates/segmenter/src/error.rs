use thiserror::Error;

/// Result type for segmenter operations
pub type Result<T> = std::result::Result<T, SegmenterError>;

/// Errors that can occur while segmenting documents
#[derive(Error, Debug)]
pub enum SegmenterError {
    /// Invalid configuration, rejected before any document is processed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A structural marker pattern failed to compile
    #[error("Invalid pattern for marker '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// The embedding capability failed; aborts the affected document only
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// The tokenizer capability failed; aborts the affected document only
    #[error("Tokenization error: {0}")]
    Tokenization(String),
}

impl SegmenterError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an embedding error
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create a tokenization error
    pub fn tokenization(msg: impl Into<String>) -> Self {
        Self::Tokenization(msg.into())
    }
}
