//! Structural health checks over the HNSW graph.
//!
//! [`crate::HnswIndex::invariants`] hands out a checker that copies the
//! adjacency once per run and evaluates the chosen checks against that copy,
//! so no graph lock is held while a check runs.

mod bidirectional;
mod degree_bounds;
mod entry_point;
mod layer_consistency;
mod reachability;
mod snapshot;

use std::fmt;

use thiserror::Error;

use crate::hnsw::{graph::Graph, params::HnswParams};

use self::snapshot::GraphSnapshot;

/// A structural property of a healthy graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HnswInvariant {
    /// Every reference at layer `l` lands on a node that has layer `l`.
    LayerConsistency,
    /// At most `2 * M` neighbours on layer 0 and `M` above it.
    DegreeBounds,
    /// Every node can be reached from the entry point.
    Reachability,
    /// Links are symmetric per layer and no node lists itself.
    BidirectionalLinks,
    /// The entry point sits on the top populated layer.
    EntryPoint,
}

impl HnswInvariant {
    /// Every invariant, cheapest structural checks first.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::LayerConsistency,
            Self::DegreeBounds,
            Self::Reachability,
            Self::BidirectionalLinks,
            Self::EntryPoint,
        ]
    }

    fn run(self, audit: Audit<'_>, sink: &mut Sink<'_>) -> Result<(), HnswInvariantViolation> {
        match self {
            Self::LayerConsistency => layer_consistency::check(audit, sink),
            Self::DegreeBounds => degree_bounds::check(audit, sink),
            Self::Reachability => reachability::check(audit, sink),
            Self::BidirectionalLinks => bidirectional::check(audit, sink),
            Self::EntryPoint => entry_point::check(audit, sink),
        }
    }
}

/// Why a reference failed the layer-consistency check.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LayerConsistencyDetail {
    /// No node was ever published under the referenced id.
    MissingNode,
    /// The node exists but its top layer is below the reference.
    MissingLayer { available: usize },
}

impl fmt::Display for LayerConsistencyDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNode => f.write_str("target node is missing"),
            Self::MissingLayer { available } => {
                write!(f, "target node exposes only {available} level(s)")
            }
        }
    }
}

/// A single failed check.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum HnswInvariantViolation {
    /// `origin` lists `target` on a layer `target` does not have.
    #[error("node {origin} references {target} at layer {layer}, but {detail}")]
    LayerConsistency {
        /// Node holding the reference.
        origin: usize,
        /// Referenced node.
        target: usize,
        /// Layer of the reference.
        layer: usize,
        /// What was wrong with `target`.
        detail: LayerConsistencyDetail,
    },
    /// A neighbour list is longer than its layer allows.
    #[error("node {node} has {degree} connection(s) on layer {layer}, exceeding limit {limit}")]
    DegreeBounds {
        /// Owner of the list.
        node: usize,
        /// Layer of the list.
        layer: usize,
        /// Observed length.
        degree: usize,
        /// Allowed length.
        limit: usize,
    },
    /// Nodes are published but no entry point is set.
    #[error("graph entry point missing despite populated nodes")]
    MissingEntryPoint,
    /// Some node reaches higher than the entry point.
    #[error("node {node} reaches layer {level}, above entry point {entry} at layer {entry_level}")]
    EntryPointNotHighest {
        /// Entry point id.
        entry: usize,
        /// Entry point layer.
        entry_level: usize,
        /// Taller node.
        node: usize,
        /// Its top layer.
        level: usize,
    },
    /// No path on any layer leads from the entry point to `node`.
    #[error("node {node} is unreachable from the entry point")]
    UnreachableNode {
        /// Stranded node.
        node: usize,
    },
    /// `origin -> target` exists but `target -> origin` does not.
    #[error("edge {origin}->{target} at layer {layer} is missing the reverse link")]
    MissingBacklink {
        /// Node with the one-way reference.
        origin: usize,
        /// Node missing the reverse reference.
        target: usize,
        /// Layer of the edge.
        layer: usize,
    },
    /// A node lists itself.
    #[error("node {node} links to itself at layer {layer}")]
    SelfLoop {
        /// Offending node.
        node: usize,
        /// Layer of the loop.
        layer: usize,
    },
}

/// Runs [`HnswInvariant`] checks against one index.
///
/// `check*` methods stop at the first violation; `collect*` methods keep
/// going and return everything they found.
#[derive(Debug)]
pub struct HnswInvariantChecker<'graph> {
    graph: &'graph Graph,
}

impl<'graph> HnswInvariantChecker<'graph> {
    pub(crate) fn new(graph: &'graph Graph) -> Self {
        Self { graph }
    }

    /// # Errors
    /// Returns the first violation of any invariant.
    pub fn check_all(&self) -> Result<(), HnswInvariantViolation> {
        self.check_many(HnswInvariant::all())
    }

    /// Checks `invariants` in order.
    ///
    /// # Errors
    /// Returns the first violation found.
    pub fn check_many(
        &self,
        invariants: impl IntoIterator<Item = HnswInvariant>,
    ) -> Result<(), HnswInvariantViolation> {
        self.evaluate(invariants, &mut Sink::Stop)
    }

    /// # Errors
    /// Returns the first violation of `invariant`.
    pub fn check(&self, invariant: HnswInvariant) -> Result<(), HnswInvariantViolation> {
        self.check_many([invariant])
    }

    /// Every violation of every invariant.
    #[must_use]
    pub fn collect_all(&self) -> Vec<HnswInvariantViolation> {
        self.collect_many(HnswInvariant::all())
    }

    /// Every violation of the chosen invariants, in check order.
    #[must_use]
    pub fn collect_many(
        &self,
        invariants: impl IntoIterator<Item = HnswInvariant>,
    ) -> Vec<HnswInvariantViolation> {
        let mut found = Vec::new();
        // A gathering sink never short-circuits.
        let outcome = self.evaluate(invariants, &mut Sink::Gather(&mut found));
        debug_assert!(outcome.is_ok());
        found
    }

    fn evaluate(
        &self,
        invariants: impl IntoIterator<Item = HnswInvariant>,
        sink: &mut Sink<'_>,
    ) -> Result<(), HnswInvariantViolation> {
        let snapshot = GraphSnapshot::capture(self.graph);
        let audit = Audit {
            snapshot: &snapshot,
            params: self.graph.params(),
        };
        invariants
            .into_iter()
            .try_for_each(|invariant| invariant.run(audit, sink))
    }
}

/// What a single check sees.
#[derive(Clone, Copy)]
struct Audit<'a> {
    snapshot: &'a GraphSnapshot,
    params: &'a HnswParams,
}

/// Where checks send violations.
enum Sink<'a> {
    Stop,
    Gather(&'a mut Vec<HnswInvariantViolation>),
}

impl Sink<'_> {
    fn report(&mut self, violation: HnswInvariantViolation) -> Result<(), HnswInvariantViolation> {
        match self {
            Self::Stop => Err(violation),
            Self::Gather(found) => {
                found.push(violation);
                Ok(())
            }
        }
    }
}
