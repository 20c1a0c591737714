use crate::markers::{MarkerMatch, MarkerMode};

/// A `[start, end)` byte range in which no cut may be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectedSpan {
    pub start: usize,
    pub end: usize,
}

impl ProtectedSpan {
    /// Whether `offset` falls strictly inside the span.
    ///
    /// The span edges themselves are legal cut sites: a cut at `start` puts
    /// the whole region in the following chunk, a cut at `end` in the
    /// preceding one.
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        offset > self.start && offset < self.end
    }
}

/// Derive protected spans from HOLD/RESUME matches.
///
/// Scans matches in offset order with an open-HOLD depth counter: the first
/// HOLD opens a span, nested HOLDs are absorbed, and any RESUME closes the
/// open span at its match end regardless of marker name. An unterminated
/// span closes at `text_len`: an oversized chunk beats cutting inside an
/// unterminated region.
pub fn protected_spans(matches: &[MarkerMatch], text_len: usize) -> Vec<ProtectedSpan> {
    let mut spans = Vec::new();
    let mut open_start: Option<usize> = None;

    for m in matches {
        match m.mode {
            MarkerMode::Hold => {
                if open_start.is_none() {
                    open_start = Some(m.start);
                }
            }
            MarkerMode::Resume => {
                // A RESUME at the opening HOLD's own offset is the same
                // physical marker (plain ``` fences match both patterns);
                // only a later RESUME closes the span.
                if let Some(start) = open_start {
                    if m.start > start {
                        open_start = None;
                        spans.push(ProtectedSpan { start, end: m.end });
                    }
                }
            }
            MarkerMode::OptionalCut => {}
        }
    }

    if let Some(start) = open_start {
        spans.push(ProtectedSpan {
            start,
            end: text_len,
        });
    }

    merge_spans(spans)
}

/// Collapse overlapping or touching spans into `[min start, max end)` ranges
fn merge_spans(mut spans: Vec<ProtectedSpan>) -> Vec<ProtectedSpan> {
    spans.sort_by_key(|s| s.start);

    let mut merged: Vec<ProtectedSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        if span.end <= span.start {
            continue;
        }
        match merged.last_mut() {
            Some(last) if span.start <= last.end => {
                last.end = last.end.max(span.end);
            }
            _ => merged.push(span),
        }
    }
    merged
}

/// Whether `offset` lies strictly inside any span. Spans must be sorted.
pub fn is_protected(spans: &[ProtectedSpan], offset: usize) -> bool {
    let idx = spans.partition_point(|s| s.start < offset);
    // Only the span starting at or before `offset` can contain it.
    idx.checked_sub(1)
        .and_then(|i| spans.get(i))
        .is_some_and(|s| s.contains(offset))
}
