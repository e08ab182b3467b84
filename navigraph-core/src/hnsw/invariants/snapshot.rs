//! Lock-free copy of the adjacency that checks run against.

use crate::hnsw::{graph::Graph, types::EntryPoint};

use super::{HnswInvariantViolation, LayerConsistencyDetail};

#[derive(Debug)]
pub(super) struct GraphSnapshot {
    pub(super) entry: Option<EntryPoint>,
    nodes: Vec<Option<Vec<Vec<usize>>>>,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct Edge {
    pub(super) origin: usize,
    pub(super) target: usize,
    pub(super) layer: usize,
}

impl GraphSnapshot {
    pub(super) fn capture(graph: &Graph) -> Self {
        let mut nodes = vec![None; graph.capacity()];
        for (id, node) in graph.nodes_iter() {
            nodes[id] = Some(node.snapshot_layers());
        }
        Self {
            entry: graph.entry_snapshot(),
            nodes,
        }
    }

    pub(super) fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub(super) fn layers(&self, id: usize) -> Option<&[Vec<usize>]> {
        self.nodes.get(id).and_then(Option::as_deref)
    }

    /// Published nodes with their per-layer neighbour lists.
    pub(super) fn nodes(&self) -> impl Iterator<Item = (usize, &[Vec<usize>])> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, layers)| Some((id, layers.as_deref()?)))
    }

    pub(super) fn is_empty(&self) -> bool {
        self.nodes().next().is_none()
    }

    /// Every directed reference in the snapshot.
    pub(super) fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.nodes().flat_map(|(origin, layers)| {
            layers.iter().enumerate().flat_map(move |(layer, targets)| {
                targets.iter().map(move |&target| Edge {
                    origin,
                    target,
                    layer,
                })
            })
        })
    }

    /// Resolves the far end of `edge`, failing when it lacks `edge.layer`.
    pub(super) fn target_layers(&self, edge: Edge) -> Result<&[Vec<usize>], HnswInvariantViolation> {
        let Edge {
            origin,
            target,
            layer,
        } = edge;
        let inconsistent = |detail| HnswInvariantViolation::LayerConsistency {
            origin,
            target,
            layer,
            detail,
        };
        let layers = self
            .layers(target)
            .ok_or_else(|| inconsistent(LayerConsistencyDetail::MissingNode))?;
        if layer < layers.len() {
            Ok(layers)
        } else {
            Err(inconsistent(LayerConsistencyDetail::MissingLayer {
                available: layers.len(),
            }))
        }
    }
}
