use crate::error::{Result, SegmenterError};
use crate::markers::{default_markers, MarkerSpec, StructuralMarker};
use crate::units::UnitGranularity;
use serde::{Deserialize, Serialize};

/// Configuration for document segmentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Maximum chunk size in tokens (hard ceiling, protected spans excepted)
    pub max_tokens: usize,

    /// Minimum chunk size in tokens (advisory floor)
    pub min_tokens: usize,

    /// Units per embedding window on each side of a boundary
    pub window_size: usize,

    /// Candidate-boundary granularity
    #[serde(default)]
    pub granularity: UnitGranularity,

    /// Scale applied to the semantic-dissimilarity term when scoring.
    /// The default keeps structural markers dominant when both disagree.
    pub semantic_weight: f32,

    /// How close (in bytes) a marker match must be to a boundary to count
    pub marker_tolerance: usize,

    /// Upper bound on documents processed concurrently
    pub max_concurrent_documents: usize,

    /// Structural markers; `None` means the documented default set, while
    /// `Some(vec![])` disables markers entirely
    #[serde(default)]
    pub structural_markers: Option<Vec<MarkerSpec>>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            min_tokens: 64,
            window_size: 3,
            granularity: UnitGranularity::Paragraph,
            semantic_weight: 0.5,
            marker_tolerance: 16,
            max_concurrent_documents: 4,
            structural_markers: None,
        }
    }
}

impl SegmenterConfig {
    /// Budget tuned for embedding-index chunks (smaller, focused)
    pub fn for_retrieval() -> Self {
        Self {
            max_tokens: 384,
            min_tokens: 48,
            window_size: 2,
            ..Default::default()
        }
    }

    /// Validate configuration; fails fast before any document is processed
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(SegmenterError::invalid_config("max_tokens must be > 0"));
        }

        if self.min_tokens == 0 {
            return Err(SegmenterError::invalid_config("min_tokens must be > 0"));
        }

        if self.min_tokens > self.max_tokens {
            return Err(SegmenterError::invalid_config(format!(
                "min_tokens ({}) cannot exceed max_tokens ({})",
                self.min_tokens, self.max_tokens
            )));
        }

        if self.window_size == 0 {
            return Err(SegmenterError::invalid_config("window_size must be >= 1"));
        }

        if self.max_concurrent_documents == 0 {
            return Err(SegmenterError::invalid_config(
                "max_concurrent_documents must be >= 1",
            ));
        }

        if !self.semantic_weight.is_finite() || self.semantic_weight < 0.0 {
            return Err(SegmenterError::invalid_config(format!(
                "semantic_weight must be a non-negative finite number, got {}",
                self.semantic_weight
            )));
        }

        for marker in self.structural_markers.iter().flatten() {
            if !marker.weight.is_finite() || marker.weight < 0.0 {
                return Err(SegmenterError::invalid_config(format!(
                    "marker '{}' weight must be a non-negative finite number, got {}",
                    marker.name, marker.weight
                )));
            }
        }

        Ok(())
    }

    /// Compile the configured markers, or the default set when omitted
    pub(crate) fn compile_markers(&self) -> Result<Vec<StructuralMarker>> {
        match &self.structural_markers {
            None => Ok(default_markers()),
            Some(specs) => specs.iter().map(MarkerSpec::compile).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SegmenterConfig::default().validate().is_ok());
        assert!(SegmenterConfig::for_retrieval().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_token_budget() {
        let config = SegmenterConfig {
            min_tokens: 600,
            max_tokens: 500,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_window() {
        let config = SegmenterConfig {
            window_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_negative_marker_weight() {
        let config = SegmenterConfig {
            structural_markers: Some(vec![MarkerSpec::optional_cut("bad", -1.0, "x")]),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn omitted_marker_list_compiles_to_defaults() {
        let config = SegmenterConfig::default();
        let markers = config.compile_markers().unwrap();
        assert!(!markers.is_empty());
    }

    #[test]
    fn explicit_empty_marker_list_disables_markers() {
        let config = SegmenterConfig {
            structural_markers: Some(Vec::new()),
            ..Default::default()
        };
        assert!(config.compile_markers().unwrap().is_empty());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = SegmenterConfig {
            structural_markers: Some(vec![MarkerSpec::optional_cut("heading", 2.0, r"(?m)^#\s")]),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: SegmenterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_tokens, config.max_tokens);
        let markers = back.structural_markers.unwrap();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].name, "heading");
    }
}
