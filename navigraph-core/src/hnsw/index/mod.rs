//! Thread-safe HNSW index facade.
//!
//! Owns the distance space and the layered graph, assigns element
//! identifiers and exposes single and batch insertion and k-NN search. Every
//! operation takes `&self`; Rayon drives the batch variants.

mod internal;

use std::{
    num::NonZeroUsize,
    sync::atomic::{AtomicUsize, Ordering},
};

use rayon::prelude::*;
use tracing::{Span, instrument};

use crate::distance::{DistanceSpace, Metric, Space};

use super::{
    error::HnswError,
    graph::{Graph, NodeContext, SearchContext},
    invariants::HnswInvariantChecker,
    levels::LevelSampler,
    params::HnswParams,
    telemetry,
    types::{ElementId, Neighbour},
    validate::validate_vector,
};

/// Approximate nearest-neighbour index over a [`DistanceSpace`].
///
/// # Examples
/// ```
/// use navigraph_core::{HnswIndex, HnswParams, Metric};
///
/// let params = HnswParams::new(8, 32).expect("params must be valid");
/// let index = HnswIndex::for_metric(Metric::L2, 2, 16, params).expect("index");
/// let near = index.insert(&[0.0, 0.0]).expect("insert");
/// index.insert(&[5.0, 5.0]).expect("insert");
///
/// let hits = index.search_knn(&[0.1, 0.2], 1).expect("search");
/// assert_eq!(hits[0].id, near);
/// ```
#[derive(Debug)]
pub struct HnswIndex<S = Space> {
    space: S,
    params: HnswParams,
    graph: Graph,
    ef_search: AtomicUsize,
    levels: LevelSampler,
    reserved: AtomicUsize,
    len: AtomicUsize,
}

impl HnswIndex<Space> {
    /// Creates an empty index using one of the built-in metrics.
    ///
    /// # Errors
    /// Returns [`HnswError::InvalidParameters`] when `dimension` or
    /// `max_elements` is zero.
    pub fn for_metric(
        metric: Metric,
        dimension: usize,
        max_elements: usize,
        params: HnswParams,
    ) -> Result<Self, HnswError> {
        let space = Space::new(metric, dimension).map_err(|_| HnswError::InvalidParameters {
            reason: "dimension must be greater than zero".into(),
        })?;
        Self::new(space, max_elements, params)
    }
}

impl<S: DistanceSpace> HnswIndex<S> {
    /// Creates an empty index holding at most `max_elements` vectors of
    /// `space`.
    ///
    /// # Errors
    /// Returns [`HnswError::InvalidParameters`] when `max_elements` or the
    /// space dimension is zero.
    pub fn new(space: S, max_elements: usize, params: HnswParams) -> Result<Self, HnswError> {
        if max_elements == 0 {
            return Err(HnswError::InvalidParameters {
                reason: "max_elements must be greater than zero".into(),
            });
        }
        if space.dimension() == 0 {
            return Err(HnswError::InvalidParameters {
                reason: "dimension must be greater than zero".into(),
            });
        }
        Ok(Self {
            graph: Graph::with_capacity(params.clone(), max_elements),
            ef_search: AtomicUsize::new(params.ef_search()),
            levels: LevelSampler::new(&params),
            reserved: AtomicUsize::new(0),
            len: AtomicUsize::new(0),
            params,
            space,
        })
    }

    /// Overrides the query beam width.
    #[must_use]
    pub fn with_ef_search(self, ef_search: NonZeroUsize) -> Self {
        self.set_ef_search(ef_search);
        self
    }

    /// Changes the query beam width used by subsequent searches.
    pub fn set_ef_search(&self, ef_search: NonZeroUsize) {
        self.ef_search.store(ef_search.get(), Ordering::Relaxed);
    }

    /// Inserts `vector`, returning its freshly assigned identifier.
    ///
    /// # Errors
    /// - [`HnswError::DimensionMismatch`] when the length differs from the
    ///   space dimension.
    /// - [`HnswError::NonFiniteComponent`] for NaN or infinite components.
    /// - [`HnswError::Distance`] when the metric rejects the vector (zero
    ///   vectors in cosine spaces).
    /// - [`HnswError::CapacityExceeded`] once `max_elements` ids are in use.
    ///
    /// The graph is left untouched by every one of these failures.
    #[instrument(
        name = "hnsw.insert",
        err,
        skip(self, vector),
        fields(node = tracing::field::Empty, level = tracing::field::Empty)
    )]
    pub fn insert(&self, vector: &[f32]) -> Result<ElementId, HnswError> {
        validate_vector(&self.space, vector)?;
        let node = self.reserve_id()?;
        let level = self.levels.sample()?;
        let span = Span::current();
        span.record("node", node);
        span.record("level", level);
        self.insert_reserved(NodeContext { node, level }, vector)?;
        Ok(node)
    }

    /// Inserts every vector, returning identifiers in input order.
    ///
    /// All vectors are validated and the remaining capacity checked before
    /// any insertion starts. The first vector of a batch targeting an empty
    /// index seeds the entry point; the rest are inserted in parallel.
    ///
    /// # Errors
    /// Same as [`Self::insert`]. Capacity is re-checked per element, so a
    /// concurrent writer can still make a later element fail.
    #[instrument(name = "hnsw.insert_batch", err, skip(self, vectors), fields(count = vectors.len()))]
    pub fn insert_batch(&self, vectors: &[Vec<f32>]) -> Result<Vec<ElementId>, HnswError> {
        for vector in vectors {
            validate_vector(&self.space, vector)?;
        }
        if vectors.len() > self.remaining_capacity() {
            return Err(HnswError::CapacityExceeded {
                capacity: self.capacity(),
            });
        }
        let Some((first, rest)) = vectors.split_first() else {
            return Ok(Vec::new());
        };

        let mut ids = Vec::with_capacity(vectors.len());
        let parallel = if self.graph.entry()?.is_none() {
            ids.push(self.insert(first)?);
            rest
        } else {
            vectors
        };
        let inserted: Vec<ElementId> = parallel
            .par_iter()
            .map(|vector| self.insert(vector))
            .collect::<Result<_, _>>()?;
        ids.extend(inserted);
        Ok(ids)
    }

    /// Returns up to `k` approximate nearest neighbours of `query`, closest
    /// first.
    ///
    /// An empty index or `k == 0` yields an empty result.
    ///
    /// # Errors
    /// - [`HnswError::DimensionMismatch`] when the query length is wrong.
    /// - [`HnswError::NonFiniteComponent`] for NaN or infinite components.
    /// - [`HnswError::Distance`] when the metric rejects the query.
    #[instrument(name = "hnsw.search_knn", err, skip(self, query))]
    pub fn search_knn(&self, query: &[f32], k: usize) -> Result<Vec<Neighbour>, HnswError> {
        validate_vector(&self.space, query)?;
        telemetry::record_search();
        if k == 0 {
            return Ok(Vec::new());
        }
        let Some(entry) = self.graph.entry()? else {
            return Ok(Vec::new());
        };
        let searcher = self.graph.searcher();
        let closest = searcher.descend(&self.space, query, entry, 0)?;
        let ef = self.ef_search().max(k);
        let mut neighbours = searcher.search_layer(
            &self.space,
            SearchContext {
                query,
                entry: closest,
                level: 0,
            }
            .with_ef(ef),
            &[closest],
        )?;
        neighbours.truncate(k);
        Ok(neighbours)
    }

    /// Runs [`Self::search_knn`] for every query in parallel, preserving order.
    ///
    /// # Errors
    /// Returns the first error produced by any query.
    #[instrument(name = "hnsw.search_knn_batch", err, skip(self, queries), fields(count = queries.len()))]
    pub fn search_knn_batch(
        &self,
        queries: &[Vec<f32>],
        k: usize,
    ) -> Result<Vec<Vec<Neighbour>>, HnswError> {
        queries
            .par_iter()
            .map(|query| self.search_knn(query, k))
            .collect()
    }

    /// Returns the number of completed insertions.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.len.load(Ordering::Acquire) }

    /// Returns whether the index currently stores no vectors.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Returns the maximum number of vectors the index accepts.
    #[must_use]
    #[rustfmt::skip]
    pub fn capacity(&self) -> usize { self.graph.capacity() }

    /// Returns the vector dimension.
    #[must_use]
    #[rustfmt::skip]
    pub fn dimension(&self) -> usize { self.space.dimension() }

    /// Returns the distance space.
    #[must_use]
    #[rustfmt::skip]
    pub fn space(&self) -> &S { &self.space }

    /// Returns the construction parameters.
    #[must_use]
    #[rustfmt::skip]
    pub fn params(&self) -> &HnswParams { &self.params }

    /// Returns the query beam width currently in effect.
    #[must_use]
    #[rustfmt::skip]
    pub fn ef_search(&self) -> usize { self.ef_search.load(Ordering::Relaxed) }

    /// Returns the stored vector for `id`, if it has been inserted.
    #[must_use]
    pub fn vector(&self, id: ElementId) -> Option<&[f32]> {
        self.graph.node(id).map(|node| node.vector())
    }

    /// Returns a handle for checking structural invariants.
    #[must_use]
    pub fn invariants(&self) -> HnswInvariantChecker<'_> {
        HnswInvariantChecker::new(&self.graph)
    }

    #[cfg(test)]
    pub(crate) fn graph(&self) -> &Graph {
        &self.graph
    }
}
