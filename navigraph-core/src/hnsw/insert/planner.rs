//! Plans HNSW insertions without mutating the graph.

use crate::{
    distance::DistanceSpace,
    hnsw::{
        error::HnswError,
        graph::{Graph, NodeContext, SearchContext},
        types::{EntryPoint, InsertionPlan, LayerPlan, Neighbour},
    },
};

#[derive(Debug)]
pub(crate) struct InsertionPlanner<'graph> {
    graph: &'graph Graph,
}

/// Inputs required to plan an insertion: the node being inserted, its vector,
/// the entry point to descend from and the construction beam width.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PlanningInputs<'a> {
    pub(crate) ctx: NodeContext,
    pub(crate) vector: &'a [f32],
    pub(crate) entry: EntryPoint,
    pub(crate) ef: usize,
}

impl<'graph> InsertionPlanner<'graph> {
    pub(crate) fn new(graph: &'graph Graph) -> Self {
        Self { graph }
    }

    /// Computes the descent path from the entry point down to the target
    /// level, then searches each layer from the target level to layer 0 for
    /// neighbour candidates. Layers are returned from the top down.
    pub(crate) fn plan<S: DistanceSpace + ?Sized>(
        &self,
        space: &S,
        inputs: PlanningInputs<'_>,
    ) -> Result<InsertionPlan, HnswError> {
        let PlanningInputs {
            ctx,
            vector,
            entry,
            ef,
        } = inputs;
        let target_level = ctx.level.min(entry.level);
        let searcher = self.graph.searcher();
        let closest = searcher.descend(space, vector, entry, target_level)?;

        let mut layers = Vec::with_capacity(target_level + 1);
        let mut seeds = vec![closest];
        for level in (0..=target_level).rev() {
            let found = searcher.search_layer(
                space,
                SearchContext {
                    query: vector,
                    entry: closest,
                    level,
                }
                .with_ef(ef),
                &seeds,
            )?;
            // Concurrent inserts may already have linked to this node.
            let neighbours: Vec<Neighbour> =
                found.into_iter().filter(|n| n.id != ctx.node).collect();
            if !neighbours.is_empty() {
                seeds.clone_from(&neighbours);
            }
            layers.push(LayerPlan { level, neighbours });
        }
        Ok(InsertionPlan { layers })
    }
}
