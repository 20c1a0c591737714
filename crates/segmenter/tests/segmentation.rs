//! End-to-end segmentation scenarios with deterministic mock capabilities.

use async_trait::async_trait;
use chunkwise_segmenter::{
    Document, EmbeddingProvider, Result, Segmenter, SegmenterConfig, TokenCounter,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

/// Embeds a window onto an axis chosen by its first word, so dissimilarity
/// spikes exactly where the leading topic word changes.
struct TopicEmbedder;

#[async_trait]
impl EmbeddingProvider for TopicEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let topic = text.split_whitespace().next().unwrap_or("");
        let mut v = vec![0.0f32; 8];
        v[seed(topic) % 8] = 1.0;
        Ok(v)
    }
}

/// Same embedding as [`TopicEmbedder`], plus a content-derived delay so
/// completion order varies between windows.
struct JitteryEmbedder;

#[async_trait]
impl EmbeddingProvider for JitteryEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        tokio::time::sleep(Duration::from_millis((seed(text) % 17) as u64)).await;
        TopicEmbedder.embed(text).await
    }
}

struct WordTokenizer;

#[async_trait]
impl TokenCounter for WordTokenizer {
    async fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count())
    }
}

fn seed(text: &str) -> usize {
    text.bytes().fold(7usize, |acc, b| {
        acc.wrapping_mul(31).wrapping_add(b as usize)
    })
}

fn paragraph(topic: &str, words: usize) -> String {
    let mut out: Vec<String> = vec![topic.to_string()];
    for i in 1..words {
        out.push(format!("w{i}"));
    }
    out.join(" ")
}

fn segmenter(config: SegmenterConfig) -> Segmenter {
    Segmenter::new(config, Arc::new(TopicEmbedder), Arc::new(WordTokenizer)).unwrap()
}

#[tokio::test]
async fn semantic_spike_decides_the_cut() {
    // Three 40-token paragraphs; the only topic shift is after the second.
    let text = format!(
        "{}\n\n{}\n\n{}\n",
        paragraph("alpha", 40),
        paragraph("alpha", 40),
        paragraph("omega", 40),
    );
    let seg = segmenter(SegmenterConfig {
        max_tokens: 100,
        min_tokens: 30,
        window_size: 1,
        structural_markers: Some(Vec::new()),
        ..Default::default()
    });

    let chunks = seg
        .segment_document(&Document::new(text).page(1), "spike.txt")
        .await
        .unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].token_count, 80);
    assert_eq!(chunks[1].token_count, 40);
    assert!(chunks[1].text.starts_with("omega"));
}

#[tokio::test]
async fn protected_block_overrides_the_token_ceiling() {
    // A 150-token fenced block with max_tokens=100 must come out whole.
    // 49 + 50 + 49 words plus the two fence lines: 150 tokens in the block.
    let text = format!(
        "```rust\n{}\n\n{}\n\n{}\n```\n",
        paragraph("fn_one", 49),
        paragraph("fn_two", 50),
        paragraph("fn_three", 49),
    );
    let seg = segmenter(SegmenterConfig {
        max_tokens: 100,
        min_tokens: 30,
        window_size: 1,
        ..Default::default()
    });

    let chunks = seg
        .segment_document(&Document::new(text), "code.md")
        .await
        .unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].token_count, 150);
    assert!(chunks[0].token_count > seg.config().max_tokens);
}

#[tokio::test]
async fn empty_document_list_yields_empty_output() {
    let seg = segmenter(SegmenterConfig::default());
    let chunks = seg.segment_documents(Vec::new(), "nothing").await;
    assert!(chunks.is_empty());
}

#[tokio::test]
async fn document_below_min_tokens_is_one_chunk() {
    let text = format!("{}\n\n{}\n", paragraph("alpha", 12), paragraph("omega", 8));
    let seg = segmenter(SegmenterConfig {
        max_tokens: 100,
        min_tokens: 50,
        window_size: 1,
        ..Default::default()
    });

    let chunks = seg
        .segment_document(&Document::new(text), "tiny.txt")
        .await
        .unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].token_count, 20);
}

#[tokio::test]
async fn section_break_is_removed_at_the_cut() {
    let text = format!(
        "{}\n\n---\n\n{}\n",
        paragraph("alpha", 60),
        paragraph("omega", 60),
    );
    let seg = segmenter(SegmenterConfig {
        max_tokens: 100,
        min_tokens: 30,
        window_size: 1,
        ..Default::default()
    });

    let chunks = seg
        .segment_document(&Document::new(text.clone()), "sections.md")
        .await
        .unwrap();

    assert_eq!(chunks.len(), 2);
    for chunk in &chunks {
        assert!(!chunk.text.contains("---"), "marker survived: {}", chunk.text);
    }

    // Reconstruction modulo trimming: the chunks' words are the original
    // words minus the removed marker.
    let original_words: Vec<&str> = text.split_whitespace().filter(|w| *w != "---").collect();
    let chunk_words: Vec<&str> = chunks
        .iter()
        .flat_map(|c| c.text.split_whitespace())
        .collect();
    assert_eq!(chunk_words, original_words);
}

#[tokio::test]
async fn token_bounds_hold_for_all_but_the_last_chunk() {
    let mut text = String::new();
    for i in 0..12 {
        text.push_str(&paragraph(&format!("topic{i}"), 25));
        text.push_str("\n\n");
    }
    let seg = segmenter(SegmenterConfig {
        max_tokens: 90,
        min_tokens: 40,
        window_size: 2,
        structural_markers: Some(Vec::new()),
        ..Default::default()
    });

    let chunks = seg
        .segment_document(&Document::new(text), "bounds.txt")
        .await
        .unwrap();

    assert!(chunks.len() > 1);
    for chunk in &chunks[..chunks.len() - 1] {
        assert!(
            (40..=90).contains(&chunk.token_count),
            "chunk of {} tokens breaks the budget",
            chunk.token_count
        );
    }
}

#[tokio::test]
async fn no_chunk_splits_a_fenced_block() {
    let mut text = String::new();
    for i in 0..4 {
        text.push_str(&paragraph(&format!("prose{i}"), 30));
        text.push_str("\n\n");
        text.push_str(&format!(
            "```\n{}\n\n{}\n```\n\n",
            paragraph(&format!("code{i}a"), 20),
            paragraph(&format!("code{i}b"), 20),
        ));
    }
    let seg = segmenter(SegmenterConfig {
        max_tokens: 80,
        min_tokens: 20,
        window_size: 1,
        ..Default::default()
    });

    let chunks = seg
        .segment_document(&Document::new(text), "fences.md")
        .await
        .unwrap();

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        let fence_lines = chunk
            .text
            .lines()
            .filter(|l| l.trim_end().starts_with("```"))
            .count();
        assert_eq!(
            fence_lines % 2,
            0,
            "chunk splits a fenced block:\n{}",
            chunk.text
        );
    }
}

#[tokio::test]
async fn output_is_deterministic_under_completion_order_jitter() {
    let documents: Vec<Document> = (0..4)
        .map(|d| {
            let mut text = String::new();
            for i in 0..8 {
                text.push_str(&paragraph(&format!("d{d}t{}", i / 3), 22));
                text.push_str("\n\n");
            }
            Document::new(text).page(d)
        })
        .collect();

    let config = SegmenterConfig {
        max_tokens: 80,
        min_tokens: 30,
        window_size: 2,
        max_concurrent_documents: 3,
        ..Default::default()
    };

    let jittery = Segmenter::new(
        config.clone(),
        Arc::new(JitteryEmbedder),
        Arc::new(WordTokenizer),
    )
    .unwrap();
    let steady = Segmenter::new(config, Arc::new(TopicEmbedder), Arc::new(WordTokenizer)).unwrap();

    let first = jittery
        .segment_documents(documents.clone(), "batch.txt")
        .await;
    let second = jittery
        .segment_documents(documents.clone(), "batch.txt")
        .await;
    let reference = steady.segment_documents(documents, "batch.txt").await;

    assert_eq!(first, second);
    assert_eq!(first, reference);
}
