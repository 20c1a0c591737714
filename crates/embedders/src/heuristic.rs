use async_trait::async_trait;
use chunkwise_segmenter::{Result, TokenCounter};

/// Character-count token heuristic (~4 characters per token for prose).
///
/// Cheap and monotone in text length; accurate enough for budget
/// enforcement when a real tokenizer is not worth the latency.
#[derive(Debug, Clone)]
pub struct CharTokenCounter {
    chars_per_token: usize,
}

impl CharTokenCounter {
    #[must_use]
    pub const fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: if chars_per_token == 0 {
                1
            } else {
                chars_per_token
            },
        }
    }
}

impl Default for CharTokenCounter {
    fn default() -> Self {
        Self::new(4)
    }
}

#[async_trait]
impl TokenCounter for CharTokenCounter {
    async fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok((text.len() / self.chars_per_token).max(1))
    }
}

/// Whitespace word count as a token estimate
#[derive(Debug, Clone, Default)]
pub struct WordTokenCounter;

#[async_trait]
impl TokenCounter for WordTokenCounter {
    async fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count())
    }
}
