//! Error types produced by the HNSW index.

use thiserror::Error;

use crate::{distance::DistanceError, error::define_error_codes};

/// Errors produced by the HNSW index.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum HnswError {
    /// A vector did not carry the dimension configured for the index.
    #[error("dimension mismatch: index expects {expected} components, vector has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// Every slot of the fixed-capacity index is taken.
    #[error("index capacity of {capacity} elements exhausted")]
    CapacityExceeded { capacity: usize },
    /// Parameters were invalid for the current configuration.
    #[error("invalid HNSW parameter: {reason}")]
    InvalidParameters { reason: String },
    /// A vector component was NaN or infinite.
    #[error("vector component {index} is not finite: {value}")]
    NonFiniteComponent { index: usize, value: f32 },
    /// The distance space produced a NaN or infinite distance.
    #[error("distance from the query to node {node} is not finite")]
    NonFiniteDistance { node: usize },
    /// Wrapped [`DistanceError`].
    #[error("distance failure: {0}")]
    Distance(#[from] DistanceError),
    /// The same node slot was initialised more than once.
    #[error("node {node} has already been inserted")]
    DuplicateNode { node: usize },
    /// Attempted to operate on an inconsistent graph state.
    #[error("HNSW graph invariant violated: {message}")]
    GraphInvariantViolation { message: String },
    /// A thread panicked while holding one of the graph locks.
    #[error("lock poisoned: {resource}")]
    LockPoisoned { resource: &'static str },
}

define_error_codes! {
    /// Machine-readable error codes for [`HnswError`].
    HnswError => HnswErrorCode {
        /// Vector length differs from the index dimension.
        DimensionMismatch = "HNSW_DIMENSION_MISMATCH" if Self::DimensionMismatch { .. },
        /// All `max_elements` slots are in use.
        CapacityExceeded = "HNSW_CAPACITY_EXCEEDED" if Self::CapacityExceeded { .. },
        /// Construction parameters were rejected.
        InvalidParameters = "HNSW_INVALID_PARAMETERS" if Self::InvalidParameters { .. },
        /// A vector component was NaN or infinite.
        NonFiniteComponent = "HNSW_NON_FINITE_COMPONENT" if Self::NonFiniteComponent { .. },
        /// A distance evaluated to NaN or infinity.
        NonFiniteDistance = "HNSW_NON_FINITE_DISTANCE" if Self::NonFiniteDistance { .. },
        /// The distance space reported an error.
        Distance = "HNSW_DISTANCE" if Self::Distance(..),
        /// A node slot was initialised twice.
        DuplicateNode = "HNSW_DUPLICATE_NODE" if Self::DuplicateNode { .. },
        /// The graph reached an inconsistent state.
        GraphInvariantViolation = "HNSW_GRAPH_INVARIANT_VIOLATION" if Self::GraphInvariantViolation { .. },
        /// A graph lock was poisoned by a panicking thread.
        LockPoisoned = "HNSW_LOCK_POISONED" if Self::LockPoisoned { .. },
    }
}
