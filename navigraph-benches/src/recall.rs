//! Recall measurement against an exhaustive-search oracle.

use std::{
    collections::{BinaryHeap, HashSet},
    fmt,
    ops::AddAssign,
};

use navigraph_core::{DistanceError, DistanceSpace, Neighbour};

/// Integer recall score; convert to a fraction only when reporting.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RecallScore {
    /// Number of true neighbours found by the approximate search.
    pub hits: usize,
    /// Number of true neighbours that could have been found.
    pub total: usize,
}

impl AddAssign for RecallScore {
    fn add_assign(&mut self, other: Self) {
        self.hits += other.hits;
        self.total += other.total;
    }
}

impl fmt::Display for RecallScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.hits, self.total)
    }
}

/// Exact top-`k` neighbours of `query` among `vectors`, closest first.
///
/// # Errors
/// Returns [`DistanceError`] if the space rejects a pair.
pub fn brute_force_top_k<S: DistanceSpace>(
    space: &S,
    vectors: &[Vec<f32>],
    query: &[f32],
    k: usize,
) -> Result<Vec<Neighbour>, DistanceError> {
    if k == 0 {
        return Ok(Vec::new());
    }

    let mut heap: BinaryHeap<Neighbour> = BinaryHeap::with_capacity(k + 1);
    for (id, candidate) in vectors.iter().enumerate() {
        let distance = space.distance(query, candidate)?.value();
        heap.push(Neighbour { id, distance });
        if heap.len() > k {
            heap.pop();
        }
    }
    Ok(heap.into_sorted_vec())
}

/// Overlap between the first `k` oracle and observed neighbours.
///
/// # Examples
/// ```
/// use navigraph_benches::recall::{RecallScore, recall_at_k};
/// use navigraph_core::Neighbour;
///
/// let oracle = vec![
///     Neighbour { id: 0, distance: 0.1 },
///     Neighbour { id: 1, distance: 0.2 },
/// ];
/// let observed = vec![
///     Neighbour { id: 0, distance: 0.1 },
///     Neighbour { id: 2, distance: 0.3 },
/// ];
/// assert_eq!(recall_at_k(&oracle, &observed, 2), RecallScore { hits: 1, total: 2 });
/// ```
#[must_use]
pub fn recall_at_k(oracle: &[Neighbour], observed: &[Neighbour], k: usize) -> RecallScore {
    let total = k.min(oracle.len());
    let truth: HashSet<usize> = oracle.iter().take(total).map(|n| n.id).collect();
    let hits = observed
        .iter()
        .take(total)
        .filter(|neighbour| truth.contains(&neighbour.id))
        .count();
    RecallScore { hits, total }
}
