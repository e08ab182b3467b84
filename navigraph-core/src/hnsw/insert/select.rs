//! Diversity-preserving neighbour selection.

use crate::hnsw::{error::HnswError, types::Neighbour};

/// Selects up to `limit` neighbours from `candidates` (distances measured from
/// the base element), preferring diverse directions over raw closeness.
///
/// Candidates are visited from closest to farthest. A candidate is admitted
/// only when it is strictly closer to the base element than to every
/// neighbour admitted before it. When `extend` is set, slots left free by the
/// heuristic are filled with the closest rejected candidates.
///
/// `distance(a, b)` measures the distance between two candidate identifiers.
pub(crate) fn select_neighbours<F>(
    candidates: &[Neighbour],
    limit: usize,
    extend: bool,
    mut distance: F,
) -> Result<Vec<Neighbour>, HnswError>
where
    F: FnMut(usize, usize) -> Result<f64, HnswError>,
{
    if limit == 0 {
        return Ok(Vec::new());
    }
    let mut ordered = candidates.to_vec();
    ordered.sort_unstable();
    ordered.dedup_by_key(|n| n.id);

    let mut selected: Vec<Neighbour> = Vec::with_capacity(limit.min(ordered.len()));
    let mut rejected = Vec::new();
    for candidate in ordered {
        if selected.len() == limit {
            break;
        }
        let mut diverse = true;
        for kept in &selected {
            if distance(candidate.id, kept.id)? <= candidate.distance {
                diverse = false;
                break;
            }
        }
        if diverse {
            selected.push(candidate);
        } else {
            rejected.push(candidate);
        }
    }

    if extend {
        let free = limit - selected.len();
        selected.extend(rejected.into_iter().take(free));
        selected.sort_unstable();
    }
    Ok(selected)
}
