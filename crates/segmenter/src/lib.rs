//! # Chunkwise Segmenter
//!
//! Semantic-structural segmentation of long documents into token-bounded,
//! semantically coherent chunks for retrieval and indexing pipelines.
//!
//! ## Philosophy
//!
//! Three competing signals decide where a document is cut:
//! - a hard token budget (`min_tokens`..`max_tokens`) enforced greedily,
//! - structural markers: weighted regex cues like headings, list items and
//!   section breaks, plus HOLD/RESUME pairs that fence off regions (code
//!   blocks) that must never be split,
//! - semantic continuity, estimated from embedding similarity across
//!   sliding windows of adjacent text units.
//!
//! ## Architecture
//!
//! ```text
//! Document text
//!     │
//!     ├──> Marker Scanner ─────> offset-ordered marker matches
//!     │                              │
//!     ├──> Protected-Region Tracker ─┴─> non-splittable spans
//!     │
//!     ├──> Unit Segmentation (paragraphs / sentences)
//!     │        │
//!     │        ├─> Window Embedder ──> per-boundary dissimilarity
//!     │        └─> Tokenizer ────────> per-unit token counts
//!     │
//!     ├──> Boundary Scorer ──> scored, eligibility-flagged cut sites
//!     │
//!     └──> Chunk Assembler ──> ordered Chunk[] with metadata
//! ```
//!
//! The embedding model and tokenizer are consumed as capabilities
//! ([`EmbeddingProvider`], [`TokenCounter`]); this crate never looks inside
//! them.
//!
//! ## Example
//!
//! ```no_run
//! use chunkwise_segmenter::{Document, Segmenter, SegmenterConfig};
//! use std::sync::Arc;
//!
//! # async fn run(
//! #     embedder: Arc<dyn chunkwise_segmenter::EmbeddingProvider>,
//! #     tokenizer: Arc<dyn chunkwise_segmenter::TokenCounter>,
//! # ) -> chunkwise_segmenter::Result<()> {
//! let segmenter = Segmenter::new(SegmenterConfig::default(), embedder, tokenizer)?;
//!
//! let documents = vec![Document::new("Intro...\n\nDetails...\n").page(1)];
//! let chunks = segmenter.segment_documents(documents, "guide.txt").await;
//! for chunk in chunks {
//!     println!("[{}#{}] {} tokens", chunk.source, chunk.ordinal, chunk.token_count);
//! }
//! # Ok(())
//! # }
//! ```

mod assemble;
mod config;
mod error;
mod markers;
mod protect;
mod score;
mod segmenter;
mod semantic;
mod types;
mod units;

pub use config::SegmenterConfig;
pub use error::{Result, SegmenterError};
pub use markers::{
    default_marker_specs, default_markers, scan, MarkerMatch, MarkerMode, MarkerSpec,
    StructuralMarker,
};
pub use protect::{is_protected, protected_spans, ProtectedSpan};
pub use score::CandidateBoundary;
pub use segmenter::Segmenter;
pub use semantic::{cosine_similarity, EmbeddingProvider, TokenCounter};
pub use types::{Chunk, Document};
pub use units::{split_units, Unit, UnitGranularity};
