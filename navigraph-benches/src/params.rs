//! Benchmark parameter types used as Criterion benchmark identifiers.

use std::fmt;

use crate::recall::RecallScore;

/// Parameters for an index build benchmark run.
#[derive(Clone, Debug)]
pub struct BuildBenchParams {
    /// Number of points inserted.
    pub point_count: usize,
    /// Neighbour fan-out (`M`).
    pub max_connections: usize,
    /// Beam width during construction.
    pub ef_construction: usize,
}

impl fmt::Display for BuildBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={},M={},ef={}",
            self.point_count, self.max_connections, self.ef_construction
        )
    }
}

/// Parameters for a query benchmark run.
#[derive(Clone, Debug)]
pub struct SearchBenchParams {
    /// Beam width used by the queries.
    pub ef_search: usize,
    /// Number of neighbours requested per query.
    pub k: usize,
    /// Recall measured against the exhaustive oracle for this setting.
    pub recall: RecallScore,
}

impl fmt::Display for SearchBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ef={},k={},recall={}", self.ef_search, self.k, self.recall)
    }
}
