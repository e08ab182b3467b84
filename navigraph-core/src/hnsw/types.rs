//! Graph-level value types: identifiers, the entry point, insertion plans and
//! the neighbour ordering used by every heap in the index.

use std::cmp::Ordering;

/// Identifier assigned to every inserted vector, dense from zero.
pub type ElementId = usize;

/// Entry point into the hierarchical graph used when searching.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct EntryPoint {
    pub(crate) node: usize,
    pub(crate) level: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct InsertionPlan {
    pub(crate) layers: Vec<LayerPlan>,
}

#[derive(Clone, Debug)]
pub(crate) struct LayerPlan {
    pub(crate) level: usize,
    pub(crate) neighbours: Vec<Neighbour>,
}

/// Neighbour discovered during a search, including its distance from the query.
///
/// Ordering compares distances first and identifiers second, so sorted result
/// sets are deterministic.
///
/// # Examples
/// ```
/// use navigraph_core::Neighbour;
///
/// let neighbour = Neighbour { id: 3, distance: 0.42 };
/// assert_eq!(neighbour.id, 3);
/// assert!(neighbour < Neighbour { id: 1, distance: 0.5 });
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbour {
    /// Identifier returned when the vector was inserted.
    pub id: ElementId,
    /// Distance between the query and [`Neighbour::id`].
    pub distance: f64,
}

impl Eq for Neighbour {}

impl Ord for Neighbour {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.id.cmp(&other.id))
    }
}

impl PartialOrd for Neighbour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
