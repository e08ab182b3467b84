//! Internal graph representation for the HNSW index.
//!
//! Node slots are pre-allocated and published once through [`OnceLock`]s.
//! Every neighbour list carries its own lock; edge mutations lock both
//! endpoints in ascending identifier order so each edge is added or removed
//! symmetrically without risking lock-order inversions.

use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::hnsw::{
    error::HnswError,
    insert::{InsertionExecutor, InsertionPlanner},
    node::Node,
    params::HnswParams,
    search::LayerSearcher,
    types::{EntryPoint, Neighbour},
};

/// Context for attaching a node to the HNSW graph.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeContext {
    /// Identifier of the node slot being initialised.
    pub(crate) node: usize,
    /// Highest level assigned to the node within the hierarchy.
    pub(crate) level: usize,
}

/// Context for connecting or pruning edges at one layer.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EdgeContext {
    /// Layer level for the edge operation.
    pub(crate) level: usize,
    /// Maximum number of connections permitted at this level.
    pub(crate) max_connections: usize,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct SearchContext<'q> {
    pub(crate) query: &'q [f32],
    pub(crate) entry: Neighbour,
    pub(crate) level: usize,
}

impl<'q> SearchContext<'q> {
    #[must_use]
    #[inline]
    pub(crate) fn with_ef(self, ef: usize) -> ExtendedSearchContext<'q> {
        ExtendedSearchContext { base: self, ef }
    }

    #[inline]
    pub(crate) fn query(&self) -> &'q [f32] {
        self.query
    }

    #[inline]
    pub(crate) fn level(&self) -> usize {
        self.level
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct ExtendedSearchContext<'q> {
    pub(crate) base: SearchContext<'q>,
    pub(crate) ef: usize,
}

impl<'q> ExtendedSearchContext<'q> {
    #[inline]
    pub(crate) fn query(&self) -> &'q [f32] {
        self.base.query()
    }

    #[inline]
    pub(crate) fn level(&self) -> usize {
        self.base.level()
    }
}

#[derive(Debug)]
pub(crate) struct Graph {
    params: HnswParams,
    nodes: Vec<OnceLock<Node>>,
    entry: RwLock<Option<EntryPoint>>,
}

impl Graph {
    #[must_use]
    pub(crate) fn with_capacity(params: HnswParams, capacity: usize) -> Self {
        debug_assert!(capacity > 0, "capacity must be greater than zero");
        let mut nodes = Vec::with_capacity(capacity);
        nodes.resize_with(capacity, OnceLock::new);
        Self {
            params,
            nodes,
            entry: RwLock::new(None),
        }
    }

    #[rustfmt::skip]
    pub(crate) fn params(&self) -> &HnswParams { &self.params }

    /// Returns the allocated slot count.
    #[must_use]
    #[rustfmt::skip]
    pub(crate) fn capacity(&self) -> usize { self.nodes.len() }

    pub(crate) fn entry(&self) -> Result<Option<EntryPoint>, HnswError> {
        let guard = self.entry.read().map_err(|_| poisoned_entry())?;
        Ok(*guard)
    }

    /// Reads the entry point even if a writer panicked while holding it.
    pub(crate) fn entry_snapshot(&self) -> Option<EntryPoint> {
        *self.entry.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Iterates over all published nodes along with their identifiers.
    pub(crate) fn nodes_iter(&self) -> impl Iterator<Item = (usize, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.get().map(|node| (id, node)))
    }

    pub(crate) fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.get(id).and_then(OnceLock::get)
    }

    pub(crate) fn vector(&self, id: usize) -> Result<&[f32], HnswError> {
        self.node(id)
            .map(Node::vector)
            .ok_or_else(|| missing_node(id, "vector lookup"))
    }

    /// Publishes a node in its pre-allocated slot.
    pub(crate) fn attach_node(&self, ctx: NodeContext, vector: Box<[f32]>) -> Result<(), HnswError> {
        if ctx.level > self.params.max_level() {
            return Err(HnswError::InvalidParameters {
                reason: format!(
                    "node {}: level {} exceeds max_level {}",
                    ctx.node,
                    ctx.level,
                    self.params.max_level()
                ),
            });
        }
        let slot = self
            .nodes
            .get(ctx.node)
            .ok_or_else(|| HnswError::InvalidParameters {
                reason: format!("node {} is outside pre-allocated capacity", ctx.node),
            })?;
        slot.set(Node::new(vector, ctx.level))
            .map_err(|_| HnswError::DuplicateNode { node: ctx.node })
    }

    /// Installs `ctx` as the entry point when the graph has none.
    ///
    /// Returns the existing entry otherwise, which the caller descends from.
    pub(crate) fn seed_entry(&self, ctx: NodeContext) -> Result<Option<EntryPoint>, HnswError> {
        let mut guard = self.entry.write().map_err(|_| poisoned_entry())?;
        match *guard {
            Some(existing) => Ok(Some(existing)),
            None => {
                *guard = Some(EntryPoint {
                    node: ctx.node,
                    level: ctx.level,
                });
                Ok(None)
            }
        }
    }

    /// Replaces the entry point when `ctx` reaches a strictly higher level.
    ///
    /// Ties keep the earlier node.
    pub(crate) fn promote_entry(&self, ctx: NodeContext) -> Result<bool, HnswError> {
        let mut guard = self.entry.write().map_err(|_| poisoned_entry())?;
        let current_level = guard.map(|entry| entry.level);
        if current_level.is_none_or(|level| ctx.level > level) {
            *guard = Some(EntryPoint {
                node: ctx.node,
                level: ctx.level,
            });
            return Ok(true);
        }
        Ok(false)
    }

    /// Copies the neighbour list of `id` at `level`.
    pub(crate) fn neighbours(&self, id: usize, level: usize) -> Result<Vec<usize>, HnswError> {
        Ok(self.read_layer(id, level)?.clone())
    }

    pub(crate) fn degree(&self, id: usize, level: usize) -> Result<usize, HnswError> {
        Ok(self.read_layer(id, level)?.len())
    }

    /// Adds the undirected edge `left <-> right` at `level`.
    ///
    /// Returns the degrees of `left` and `right` after the update.
    pub(crate) fn link(
        &self,
        level: usize,
        left: usize,
        right: usize,
    ) -> Result<(usize, usize), HnswError> {
        self.with_pair(level, left, right, |left_list, right_list| {
            if !left_list.contains(&right) {
                left_list.push(right);
            }
            if !right_list.contains(&left) {
                right_list.push(left);
            }
            (left_list.len(), right_list.len())
        })
    }

    /// Removes the undirected edge `left <-> right` at `level`, if present.
    pub(crate) fn unlink(&self, level: usize, left: usize, right: usize) -> Result<(), HnswError> {
        self.with_pair(level, left, right, |left_list, right_list| {
            left_list.retain(|&id| id != right);
            right_list.retain(|&id| id != left);
        })
    }

    /// Overwrites a neighbour list without touching the reverse edges.
    #[cfg(test)]
    pub(crate) fn set_neighbours(
        &self,
        id: usize,
        level: usize,
        neighbours: Vec<usize>,
    ) -> Result<(), HnswError> {
        *self.write_layer(id, level)? = neighbours;
        Ok(())
    }

    fn with_pair<R>(
        &self,
        level: usize,
        left: usize,
        right: usize,
        apply: impl FnOnce(&mut Vec<usize>, &mut Vec<usize>) -> R,
    ) -> Result<R, HnswError> {
        if left == right {
            return Err(HnswError::GraphInvariantViolation {
                message: format!("self-loop requested for node {left} at level {level}"),
            });
        }
        let (low, high) = (left.min(right), left.max(right));
        let mut low_guard = self.write_layer(low, level)?;
        let mut high_guard = self.write_layer(high, level)?;
        Ok(if left < right {
            apply(&mut low_guard, &mut high_guard)
        } else {
            apply(&mut high_guard, &mut low_guard)
        })
    }

    fn layer(&self, id: usize, level: usize) -> Result<&RwLock<Vec<usize>>, HnswError> {
        let node = self.node(id).ok_or_else(|| missing_node(id, "neighbour access"))?;
        node.layer(level)
            .ok_or_else(|| HnswError::GraphInvariantViolation {
                message: format!(
                    "node {id} has no layer {level} (highest layer {})",
                    node.level()
                ),
            })
    }

    fn read_layer(&self, id: usize, level: usize) -> Result<RwLockReadGuard<'_, Vec<usize>>, HnswError> {
        self.layer(id, level)?
            .read()
            .map_err(|_| poisoned_neighbours())
    }

    fn write_layer(
        &self,
        id: usize,
        level: usize,
    ) -> Result<RwLockWriteGuard<'_, Vec<usize>>, HnswError> {
        self.layer(id, level)?
            .write()
            .map_err(|_| poisoned_neighbours())
    }

    #[inline]
    pub(crate) fn insertion_planner(&self) -> InsertionPlanner<'_> {
        InsertionPlanner::new(self)
    }

    #[inline]
    pub(crate) fn insertion_executor(&self) -> InsertionExecutor<'_> {
        InsertionExecutor::new(self)
    }

    #[inline]
    pub(crate) fn searcher(&self) -> LayerSearcher<'_> {
        LayerSearcher::new(self)
    }
}

fn missing_node(id: usize, operation: &str) -> HnswError {
    HnswError::GraphInvariantViolation {
        message: format!("node {id} missing during {operation}"),
    }
}

fn poisoned_entry() -> HnswError {
    HnswError::LockPoisoned {
        resource: "entry point",
    }
}

fn poisoned_neighbours() -> HnswError {
    HnswError::LockPoisoned {
        resource: "neighbour list",
    }
}
