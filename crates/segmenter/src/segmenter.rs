use crate::assemble::assemble;
use crate::config::SegmenterConfig;
use crate::error::{Result, SegmenterError};
use crate::markers::{scan, StructuralMarker};
use crate::protect::protected_spans;
use crate::score::score_boundaries;
use crate::semantic::{boundary_dissimilarity, EmbeddingProvider, TokenCounter};
use crate::types::{Chunk, Document};
use crate::units::{split_units, Unit};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Drives the segmentation pipeline over batches of documents.
///
/// Cheap to clone: the validated config, compiled markers, and capability
/// handles are shared. The marker list is the only state shared between
/// concurrently processed documents, and it is read-only.
#[derive(Clone)]
pub struct Segmenter {
    config: SegmenterConfig,
    markers: Arc<Vec<StructuralMarker>>,
    embedder: Arc<dyn EmbeddingProvider>,
    tokenizer: Arc<dyn TokenCounter>,
}

impl Segmenter {
    /// Create a segmenter, validating the config and compiling markers.
    ///
    /// Fails fast on an invalid token budget, window, or marker pattern;
    /// no document is processed under a bad config.
    pub fn new(
        config: SegmenterConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        tokenizer: Arc<dyn TokenCounter>,
    ) -> Result<Self> {
        config.validate()?;
        let markers = Arc::new(config.compile_markers()?);
        Ok(Self {
            config,
            markers,
            embedder,
            tokenizer,
        })
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Segment a batch of documents, preserving input order.
    ///
    /// Documents are processed concurrently up to
    /// `max_concurrent_documents`; results are reassembled by input index so
    /// the output order never depends on completion order. A document whose
    /// pipeline fails is logged and contributes no chunks; its siblings are
    /// unaffected. Dropping the returned future cancels all in-flight work,
    /// including outstanding embedding and tokenizer calls.
    pub async fn segment_documents(&self, documents: Vec<Document>, source: &str) -> Vec<Chunk> {
        if documents.is_empty() {
            return Vec::new();
        }

        let total = documents.len();
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_documents));
        let mut join = JoinSet::new();

        for (index, document) in documents.into_iter().enumerate() {
            let segmenter = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let source = source.to_string();
            join.spawn(async move {
                // The semaphore is never closed; ok() keeps the permit alive
                // for the duration of the document.
                let _permit = semaphore.acquire_owned().await.ok();
                let result = segmenter.segment_document(&document, &source).await;
                (index, result)
            });
        }

        let mut per_document: Vec<Vec<Chunk>> = vec![Vec::new(); total];
        while let Some(joined) = join.join_next().await {
            match joined {
                Ok((index, Ok(chunks))) => per_document[index] = chunks,
                Ok((index, Err(e))) => {
                    log::warn!("Failed to segment document {index}: {e}");
                }
                Err(e) => log::warn!("Segmentation task failed: {e}"),
            }
        }

        per_document.into_iter().flatten().collect()
    }

    /// Segment a single document.
    ///
    /// Empty or whitespace-only text yields zero chunks; text below
    /// `min_tokens` yields exactly one. Neither is an error.
    pub async fn segment_document(&self, document: &Document, source: &str) -> Result<Vec<Chunk>> {
        let text = document.text.as_str();
        let units = split_units(text, self.config.granularity);
        if units.is_empty() {
            return Ok(Vec::new());
        }

        let matches = scan(text, &self.markers);
        let spans = protected_spans(&matches, text.len());

        let unit_tokens = self.count_unit_tokens(text, &units).await?;
        let dissimilarity =
            boundary_dissimilarity(text, &units, self.config.window_size, &self.embedder).await?;
        let boundaries = score_boundaries(
            &units,
            &dissimilarity,
            &matches,
            &spans,
            self.config.semantic_weight,
            self.config.marker_tolerance,
        );
        let assembled = assemble(
            text,
            &units,
            &unit_tokens,
            &boundaries,
            self.config.min_tokens,
            self.config.max_tokens,
        );

        log::debug!(
            "Segmented into {} chunks ({} units, {} protected spans)",
            assembled.len(),
            units.len(),
            spans.len()
        );

        let page = document.metadata.get("page").cloned();
        let mut metadata = document.metadata.clone();
        metadata.remove("page");

        Ok(assembled
            .into_iter()
            .enumerate()
            .map(|(ordinal, chunk)| Chunk {
                text: chunk.text,
                token_count: chunk.token_count,
                page: page.clone(),
                ordinal,
                source: source.to_string(),
                metadata: metadata.clone(),
            })
            .collect())
    }

    /// Token counts per unit, fanned out and reassembled by unit index
    async fn count_unit_tokens(&self, text: &str, units: &[Unit]) -> Result<Vec<usize>> {
        let mut join = JoinSet::new();
        for (index, unit) in units.iter().enumerate() {
            let unit_text = unit.text(text).to_string();
            let tokenizer = Arc::clone(&self.tokenizer);
            join.spawn(async move { (index, tokenizer.count_tokens(&unit_text).await) });
        }

        let mut counts = vec![0usize; units.len()];
        while let Some(joined) = join.join_next().await {
            let (index, result) = joined
                .map_err(|e| SegmenterError::tokenization(format!("tokenizer task failed: {e}")))?;
            counts[index] = result?;
        }
        Ok(counts)
    }
}
