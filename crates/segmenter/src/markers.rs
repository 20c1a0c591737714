use crate::error::{Result, SegmenterError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// How a structural marker influences segmentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerMode {
    /// The match is an attractive cut site, weighted by the marker's weight
    OptionalCut,
    /// The match opens a protected region that must not be split
    Hold,
    /// The match closes the currently open protected region
    Resume,
}

/// Declarative form of a structural marker, as it appears in configuration.
///
/// The pattern is kept as source text here so configs stay serializable;
/// compilation happens once, at segmenter construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerSpec {
    /// Marker name, used in diagnostics
    pub name: String,

    /// Cut/hold/resume behavior
    pub mode: MarkerMode,

    /// Cut affinity magnitude; meaningful only for `OptionalCut`
    #[serde(default)]
    pub weight: f32,

    /// Regex source, matched case-sensitively in multiline mode
    pub pattern: String,

    /// Strip the matched text from the output when a cut lands on it
    #[serde(default)]
    pub remove_marker: bool,
}

impl MarkerSpec {
    /// Declare an `OptionalCut` marker
    pub fn optional_cut(name: impl Into<String>, weight: f32, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: MarkerMode::OptionalCut,
            weight,
            pattern: pattern.into(),
            remove_marker: false,
        }
    }

    /// Declare a `Hold` marker
    pub fn hold(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: MarkerMode::Hold,
            weight: 0.0,
            pattern: pattern.into(),
            remove_marker: false,
        }
    }

    /// Declare a `Resume` marker
    pub fn resume(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: MarkerMode::Resume,
            weight: 0.0,
            pattern: pattern.into(),
            remove_marker: false,
        }
    }

    /// Builder: set `remove_marker`
    #[must_use]
    pub fn remove_marker(mut self, remove: bool) -> Self {
        self.remove_marker = remove;
        self
    }

    /// Compile the spec into a ready-to-scan marker
    pub fn compile(&self) -> Result<StructuralMarker> {
        let pattern = Regex::new(&self.pattern).map_err(|source| SegmenterError::InvalidPattern {
            name: self.name.clone(),
            source,
        })?;
        Ok(StructuralMarker {
            name: self.name.clone(),
            mode: self.mode,
            weight: self.weight,
            pattern,
            remove_marker: self.remove_marker,
        })
    }
}

/// A compiled structural marker; immutable once built
#[derive(Debug, Clone)]
pub struct StructuralMarker {
    pub name: String,
    pub mode: MarkerMode,
    pub weight: f32,
    pub pattern: Regex,
    pub remove_marker: bool,
}

/// A single marker hit in the source text
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerMatch {
    /// Index into the marker list this match came from
    pub marker: usize,

    /// Behavior of the matched marker
    pub mode: MarkerMode,

    /// Weight of the matched marker
    pub weight: f32,

    /// Whether the matched text is stripped at a coinciding cut
    pub remove_marker: bool,

    /// Byte offset range of the match in the source text
    pub start: usize,
    pub end: usize,

    /// The matched substring
    pub text: String,
}

static DEFAULT_MARKERS: Lazy<Vec<StructuralMarker>> = Lazy::new(|| {
    default_marker_specs()
        .iter()
        .map(|spec| {
            spec.compile()
                .unwrap_or_else(|e| panic!("default marker failed to compile: {e}"))
        })
        .collect()
});

/// The documented default marker set, used when the config declares none.
///
/// Markdown-flavored: headings and section breaks attract cuts, list items
/// weakly so, and fenced code blocks are held together.
pub fn default_marker_specs() -> Vec<MarkerSpec> {
    vec![
        MarkerSpec::optional_cut("heading", 2.0, r"(?m)^#{1,6}\s"),
        MarkerSpec::optional_cut("section_break", 1.5, r"(?m)^[-=*]{3,}\s*$").remove_marker(true),
        MarkerSpec::optional_cut("list_item", 0.5, r"(?m)^\s*(?:[-*+]|\d+[.)])\s"),
        MarkerSpec::hold("fence_open", r"(?m)^```\w*"),
        MarkerSpec::resume("fence_close", r"(?m)^```\s*$"),
    ]
}

/// Compiled form of [`default_marker_specs`]
pub fn default_markers() -> Vec<StructuralMarker> {
    DEFAULT_MARKERS.clone()
}

/// Locate every marker match in `text`.
///
/// Output is sorted by start offset, ties broken by marker declaration order.
/// Overlapping matches from different markers are all retained; overlapping
/// matches of the same marker keep only the earliest.
pub fn scan(text: &str, markers: &[StructuralMarker]) -> Vec<MarkerMatch> {
    let mut matches = Vec::new();

    for (index, marker) in markers.iter().enumerate() {
        // find_iter is already non-overlapping per pattern; the guard keeps
        // earliest-wins semantics if that ever changes.
        let mut last_end: Option<usize> = None;
        for m in marker.pattern.find_iter(text) {
            if last_end.is_some_and(|end| m.start() < end) {
                continue;
            }
            last_end = Some(m.end());
            matches.push(MarkerMatch {
                marker: index,
                mode: marker.mode,
                weight: marker.weight,
                remove_marker: marker.remove_marker,
                start: m.start(),
                end: m.end(),
                text: m.as_str().to_string(),
            });
        }
    }

    matches.sort_by(|a, b| a.start.cmp(&b.start).then(a.marker.cmp(&b.marker)));
    matches
}
