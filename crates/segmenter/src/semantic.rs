use crate::error::{Result, SegmenterError};
use crate::units::Unit;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Embedding capability: text in, vector out.
///
/// Implementations must be `Send + Sync`; the segmenter fans out one call per
/// distinct window and may issue them from multiple tasks at once.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Tokenizer capability: text in, token count out
#[async_trait]
pub trait TokenCounter: Send + Sync {
    async fn count_tokens(&self, text: &str) -> Result<usize>;
}

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for mismatched dimensions or zero-norm inputs.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Semantic-dissimilarity signal for every interior unit boundary.
///
/// Boundary `i` sits between units `i` and `i + 1`. Its preceding window is
/// up to `window_size` units ending at `i`, its following window up to
/// `window_size` units starting at `i + 1`, both clamped at the text edges.
/// Each distinct window is embedded exactly once; requests fan out
/// concurrently and results are reassembled by window index, so the output
/// does not depend on completion order. Any embedding failure aborts the
/// whole document.
pub(crate) async fn boundary_dissimilarity(
    text: &str,
    units: &[Unit],
    window_size: usize,
    embedder: &Arc<dyn EmbeddingProvider>,
) -> Result<Vec<f32>> {
    let n = units.len();
    if n < 2 {
        return Ok(Vec::new());
    }

    // Adjacent boundaries share windows; key by unit range to embed each once.
    let mut window_ids: BTreeMap<(usize, usize), usize> = BTreeMap::new();
    let mut windows: Vec<(usize, usize)> = Vec::new();
    let mut pairs: Vec<(usize, usize)> = Vec::with_capacity(n - 1);

    for i in 0..n - 1 {
        let pre = ((i + 1).saturating_sub(window_size), i + 1);
        let post = (i + 1, (i + 1 + window_size).min(n));
        let mut id_of = |range: (usize, usize)| {
            *window_ids.entry(range).or_insert_with(|| {
                windows.push(range);
                windows.len() - 1
            })
        };
        let pre_id = id_of(pre);
        let post_id = id_of(post);
        pairs.push((pre_id, post_id));
    }

    let mut join = JoinSet::new();
    for (id, &(first, last)) in windows.iter().enumerate() {
        let window_text = text[units[first].start..units[last - 1].end].to_string();
        let embedder = Arc::clone(embedder);
        join.spawn(async move { (id, embedder.embed(&window_text).await) });
    }

    let mut vectors: Vec<Option<Vec<f32>>> = vec![None; windows.len()];
    while let Some(joined) = join.join_next().await {
        let (id, result) =
            joined.map_err(|e| SegmenterError::embedding(format!("embedding task failed: {e}")))?;
        vectors[id] = Some(result?);
    }

    Ok(pairs
        .iter()
        .map(|&(pre, post)| match (&vectors[pre], &vectors[post]) {
            (Some(a), Some(b)) => {
                let d = 1.0 - cosine_similarity(a, b);
                if d.is_finite() {
                    d
                } else {
                    0.0
                }
            }
            _ => 0.0,
        })
        .collect())
}
