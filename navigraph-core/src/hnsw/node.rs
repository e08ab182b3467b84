//! Node storage for the HNSW graph.
//!
//! Each node owns its vector and one independently locked neighbour list per
//! layer, so insertions touching disjoint neighbourhoods never contend.

use std::sync::{PoisonError, RwLock};

#[derive(Debug)]
pub(crate) struct Node {
    vector: Box<[f32]>,
    neighbours: Vec<RwLock<Vec<usize>>>,
}

impl Node {
    pub(crate) fn new(vector: Box<[f32]>, level: usize) -> Self {
        let mut neighbours = Vec::with_capacity(level + 1);
        neighbours.resize_with(level + 1, || RwLock::new(Vec::new()));
        Self { vector, neighbours }
    }

    #[rustfmt::skip]
    pub(crate) fn vector(&self) -> &[f32] { &self.vector }

    /// Highest layer the node participates in.
    pub(crate) fn level(&self) -> usize {
        self.neighbours.len() - 1
    }

    pub(crate) fn layer(&self, level: usize) -> Option<&RwLock<Vec<usize>>> {
        self.neighbours.get(level)
    }

    /// Copies every layer, reading through poisoned locks.
    pub(crate) fn snapshot_layers(&self) -> Vec<Vec<usize>> {
        self.neighbours
            .iter()
            .map(|layer| layer.read().unwrap_or_else(PoisonError::into_inner).clone())
            .collect()
    }
}
