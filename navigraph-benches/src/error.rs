//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of panicking
//! inside Criterion closures.

use navigraph_core::{DistanceError, HnswError};

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic data generation failed.
    #[error("synthetic source generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Index construction or querying failed.
    #[error("HNSW operation failed: {0}")]
    Hnsw(#[from] HnswError),
    /// The exhaustive-search oracle failed to compute a distance.
    #[error("oracle distance failed: {0}")]
    Distance(#[from] DistanceError),
}
