use crate::markers::{MarkerMatch, MarkerMode};
use crate::protect::{is_protected, ProtectedSpan};
use crate::units::Unit;

/// A scored candidate cut site at a unit boundary
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateBoundary {
    /// Byte offset of the cut site (end of `unit`, start of `unit + 1`)
    pub offset: usize,

    /// Index of the unit ending at this boundary
    pub unit: usize,

    /// Aggregate cut affinity: marker weights plus weighted dissimilarity
    pub score: f32,

    /// False when the offset lies inside a protected span; never selected
    pub eligible: bool,

    /// Byte ranges of coincident `remove_marker` matches, excised at cut time
    pub removals: Vec<(usize, usize)>,
}

/// Whether a match coincides with a boundary offset: it starts within
/// `tolerance` bytes of the offset, or spans the offset outright.
fn coincides(m: &MarkerMatch, offset: usize, tolerance: usize) -> bool {
    m.start.abs_diff(offset) <= tolerance || (m.start <= offset && offset < m.end)
}

/// Score every interior unit boundary.
///
/// `score = Σ weight(optional-cut matches near the offset)
///        + semantic_weight × dissimilarity`.
/// Boundaries inside a protected span are marked ineligible. Matches and
/// spans must be offset-sorted.
pub(crate) fn score_boundaries(
    units: &[Unit],
    dissimilarity: &[f32],
    matches: &[MarkerMatch],
    spans: &[ProtectedSpan],
    semantic_weight: f32,
    marker_tolerance: usize,
) -> Vec<CandidateBoundary> {
    let n = units.len();
    let mut boundaries = Vec::with_capacity(n.saturating_sub(1));

    for (i, unit) in units.iter().enumerate().take(n.saturating_sub(1)) {
        let offset = unit.end;
        let mut score = 0.0f32;
        let mut removals = Vec::new();

        for m in matches {
            if m.start > offset + marker_tolerance {
                break;
            }
            if !coincides(m, offset, marker_tolerance) {
                continue;
            }
            if m.mode == MarkerMode::OptionalCut {
                score += m.weight;
            }
            if m.remove_marker {
                removals.push((m.start, m.end));
            }
        }

        let d = dissimilarity.get(i).copied().unwrap_or(0.0);
        if d.is_finite() {
            score += semantic_weight * d;
        }

        boundaries.push(CandidateBoundary {
            offset,
            unit: i,
            score,
            eligible: !is_protected(spans, offset),
            removals,
        });
    }

    boundaries
}
