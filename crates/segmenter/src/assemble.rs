use crate::score::CandidateBoundary;
use crate::units::Unit;

/// A chunk before document metadata is attached
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AssembledChunk {
    pub text: String,
    pub token_count: usize,
}

/// Greedy forward walk over the candidate boundaries.
///
/// Within each chunk: accumulate units, then cut at the highest-scoring
/// eligible boundary whose implied token count lies in
/// `[min_tokens, max_tokens]` (earliest offset wins ties). When no boundary
/// lands in range, force-cut at the latest eligible boundary at or below the
/// ceiling; when even that does not exist the chunk extends past
/// `max_tokens` until the enclosing protected span ends. The final chunk
/// keeps whatever remains, however short.
///
/// `boundaries[i]` must be the boundary after `units[i]`; both offset-sorted.
pub(crate) fn assemble(
    text: &str,
    units: &[Unit],
    unit_tokens: &[usize],
    boundaries: &[CandidateBoundary],
    min_tokens: usize,
    max_tokens: usize,
) -> Vec<AssembledChunk> {
    let n = units.len();
    let mut chunks = Vec::new();
    if n == 0 {
        return chunks;
    }

    let mut start_unit = 0usize;
    // Removed-marker ranges queued from the previous cut that belong to the
    // head of the current chunk.
    let mut pending_removals: Vec<(usize, usize)> = Vec::new();

    while start_unit < n {
        let chunk_start = units[start_unit].start;
        let mut running = 0usize;
        let mut best: Option<(usize, f32)> = None;
        let mut fallback: Option<usize> = None;
        let mut cut: Option<usize> = None;

        for u in start_unit..n {
            running = running.saturating_add(unit_tokens[u]);
            if u + 1 >= n {
                break;
            }
            let b = &boundaries[u];
            if running <= max_tokens {
                if b.eligible {
                    fallback = Some(u);
                    if running >= min_tokens && best.is_none_or(|(_, s)| b.score > s) {
                        best = Some((u, b.score));
                    }
                }
                continue;
            }

            // Ceiling crossed at this boundary.
            if let Some((bu, _)) = best {
                cut = Some(bu);
            } else if let Some(fu) = fallback {
                cut = Some(fu);
            } else if b.eligible {
                // Everything up to the ceiling was protected; the overrun
                // ends at the first legal cut site past the span.
                cut = Some(u);
            } else {
                continue;
            }
            break;
        }

        // The text ran out before the ceiling forced a decision.
        if cut.is_none() && running > max_tokens {
            cut = best.map(|(u, _)| u).or(fallback);
        }

        let (end_unit, end_offset, boundary_removals) = match cut {
            Some(u) => (u, boundaries[u].offset, boundaries[u].removals.as_slice()),
            None => (n - 1, units[n - 1].end, &[][..]),
        };

        let mut removals = std::mem::take(&mut pending_removals);
        for &(rs, re) in boundary_removals {
            if rs < end_offset {
                removals.push((rs, re.min(end_offset)));
                if re > end_offset {
                    pending_removals.push((end_offset, re));
                }
            } else {
                pending_removals.push((rs, re));
            }
        }
        removals.sort_unstable();
        removals.dedup();

        let chunk_text = excise(text, chunk_start, end_offset, &removals);
        let token_count = unit_tokens[start_unit..=end_unit].iter().sum();
        let trimmed = chunk_text.trim();
        if !trimmed.is_empty() {
            chunks.push(AssembledChunk {
                text: trimmed.to_string(),
                token_count,
            });
        }

        start_unit = end_unit + 1;
    }

    chunks
}

/// Copy `text[start..end]` skipping the given removal ranges
fn excise(text: &str, start: usize, end: usize, removals: &[(usize, usize)]) -> String {
    let mut out = String::with_capacity(end - start);
    let mut pos = start;

    for &(rs, re) in removals {
        let rs = rs.clamp(start, end);
        let re = re.clamp(start, end);
        if re <= pos {
            continue;
        }
        if rs > pos {
            out.push_str(&text[pos..rs]);
        }
        pos = pos.max(re);
        if pos >= end {
            break;
        }
    }

    if pos < end {
        out.push_str(&text[pos..end]);
    }
    out
}
