use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Smallest text span eligible as a chunk boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    /// Byte offset of the unit's first character
    pub start: usize,
    /// Byte offset one past the unit's last character (separator included)
    pub end: usize,
}

impl Unit {
    /// Slice this unit out of the source text
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Granularity of the candidate-boundary grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitGranularity {
    /// Blank-line separated paragraphs
    #[default]
    Paragraph,
    /// Unicode sentence boundaries
    Sentence,
}

/// Split text into contiguous units at the requested granularity.
///
/// Unit ranges tile the input exactly: each unit owns its trailing separator
/// (blank lines or inter-sentence whitespace), so concatenating unit slices
/// reconstructs the text. Whitespace-only input yields no units.
pub fn split_units(text: &str, granularity: UnitGranularity) -> Vec<Unit> {
    match granularity {
        UnitGranularity::Paragraph => split_paragraphs(text),
        UnitGranularity::Sentence => split_sentences(text),
    }
}

fn split_paragraphs(text: &str) -> Vec<Unit> {
    let mut units = Vec::new();
    let mut current_start = 0usize;
    let mut seen_content = false;
    let mut in_separator = false;
    let mut offset = 0usize;

    for line in text.split_inclusive('\n') {
        let blank = line.trim().is_empty();
        if blank {
            if seen_content {
                in_separator = true;
            }
        } else if in_separator {
            // First content line after a blank run starts the next unit.
            units.push(Unit {
                start: current_start,
                end: offset,
            });
            current_start = offset;
            in_separator = false;
        } else {
            seen_content = true;
        }
        offset += line.len();
    }

    if seen_content && current_start < text.len() {
        units.push(Unit {
            start: current_start,
            end: text.len(),
        });
    }

    units
}

fn split_sentences(text: &str) -> Vec<Unit> {
    let mut units: Vec<Unit> = Vec::new();
    let mut carry_start: Option<usize> = None;

    for (offset, segment) in text.split_sentence_bound_indices() {
        let end = offset + segment.len();
        if segment.trim().is_empty() {
            // Whitespace-only segments ride along with the preceding unit.
            if let Some(last) = units.last_mut() {
                last.end = end;
            } else if carry_start.is_none() {
                carry_start = Some(offset);
            }
        } else {
            units.push(Unit {
                start: carry_start.take().unwrap_or(offset),
                end,
            });
        }
    }

    units
}
