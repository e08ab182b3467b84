//! Hierarchical Navigable Small World (HNSW) graph index.
//!
//! Insertion and search run concurrently: each node guards one neighbour list
//! per layer, edge updates lock both endpoints in identifier order, and the
//! entry point has its own lock that is only written when a node reaches a
//! new top layer. Searches copy neighbour lists before expanding them.

mod error;
mod graph;
mod index;
mod insert;
mod invariants;
mod levels;
mod node;
mod params;
mod search;
mod telemetry;
mod types;
mod validate;

pub use self::{
    error::{HnswError, HnswErrorCode},
    index::HnswIndex,
    invariants::{
        HnswInvariant, HnswInvariantChecker, HnswInvariantViolation, LayerConsistencyDetail,
    },
    params::HnswParams,
    types::{ElementId, Neighbour},
};

#[cfg(test)]
mod tests;
