//! Applies insertion plans by linking the new node into every planned layer
//! and re-pruning neighbours whose degree overflows.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::{
    distance::DistanceSpace,
    hnsw::{
        error::HnswError,
        graph::{EdgeContext, Graph, NodeContext},
        telemetry,
        types::{InsertionPlan, LayerPlan, Neighbour},
        validate::validate_distance,
    },
};

use super::select::select_neighbours;

#[derive(Debug)]
pub(crate) struct InsertionExecutor<'graph> {
    graph: &'graph Graph,
}

impl<'graph> InsertionExecutor<'graph> {
    pub(crate) fn new(graph: &'graph Graph) -> Self {
        Self { graph }
    }

    /// Links `ctx.node` into every layer of `plan`.
    pub(crate) fn apply<S: DistanceSpace + ?Sized>(
        &self,
        space: &S,
        ctx: NodeContext,
        plan: InsertionPlan,
    ) -> Result<(), HnswError> {
        for layer in plan.layers {
            let edge = EdgeContext {
                level: layer.level,
                max_connections: self
                    .graph
                    .params()
                    .connection_limit_for_level(layer.level),
            };
            self.connect_layer(space, ctx, edge, layer)?;
        }
        Ok(())
    }

    fn connect_layer<S: DistanceSpace + ?Sized>(
        &self,
        space: &S,
        ctx: NodeContext,
        edge: EdgeContext,
        layer: LayerPlan,
    ) -> Result<(), HnswError> {
        let selected = select_neighbours(
            &layer.neighbours,
            edge.max_connections,
            false,
            |left, right| self.pair_distance(space, left, right),
        )?;
        trace!(
            node = ctx.node,
            level = edge.level,
            candidates = layer.neighbours.len(),
            selected = selected.len(),
            "linking layer"
        );
        for neighbour in selected {
            let (_, neighbour_degree) = self.graph.link(edge.level, ctx.node, neighbour.id)?;
            if neighbour_degree > edge.max_connections {
                self.prune(space, neighbour.id, edge)?;
            }
        }
        // Concurrent inserts may have linked to the new node meanwhile.
        if self.graph.degree(ctx.node, edge.level)? > edge.max_connections {
            self.prune(space, ctx.node, edge)?;
        }
        Ok(())
    }

    /// Shrinks the neighbour list of `node` at `edge.level` back to
    /// `edge.max_connections`, removing every dropped edge in both directions.
    ///
    /// Neighbours for which `node` is the only link at this layer are kept in
    /// preference to others so pruning never strands them.
    pub(crate) fn prune<S: DistanceSpace + ?Sized>(
        &self,
        space: &S,
        node: usize,
        edge: EdgeContext,
    ) -> Result<(), HnswError> {
        loop {
            let current = self.graph.neighbours(node, edge.level)?;
            if current.len() <= edge.max_connections {
                return Ok(());
            }
            let origin = self.graph.vector(node)?;
            let mut scored = current
                .iter()
                .map(|&id| {
                    Ok(Neighbour {
                        id,
                        distance: validate_distance(space, self.graph, origin, id)?,
                    })
                })
                .collect::<Result<Vec<_>, HnswError>>()?;
            scored.sort_unstable();

            let mut pinned = Vec::new();
            let mut free = Vec::new();
            for candidate in scored {
                if self.graph.degree(candidate.id, edge.level)? <= 1 {
                    pinned.push(candidate);
                } else {
                    free.push(candidate);
                }
            }
            if pinned.len() > edge.max_connections {
                debug!(
                    node,
                    level = edge.level,
                    pinned = pinned.len(),
                    limit = edge.max_connections,
                    "stranding unavoidable; keeping closest sole-link neighbours"
                );
                pinned.truncate(edge.max_connections);
            }

            let remaining = edge.max_connections - pinned.len();
            let chosen = select_neighbours(&free, remaining, true, |left, right| {
                self.pair_distance(space, left, right)
            })?;
            let keep: HashSet<usize> = pinned
                .iter()
                .chain(chosen.iter())
                .map(|neighbour| neighbour.id)
                .collect();

            let mut evicted = 0_usize;
            for id in current.into_iter().filter(|id| !keep.contains(id)) {
                self.graph.unlink(edge.level, node, id)?;
                evicted += 1;
            }
            telemetry::record_prune(evicted);
            trace!(node, level = edge.level, evicted, kept = keep.len(), "pruned neighbours");
        }
    }

    fn pair_distance<S: DistanceSpace + ?Sized>(
        &self,
        space: &S,
        left: usize,
        right: usize,
    ) -> Result<f64, HnswError> {
        validate_distance(space, self.graph, self.graph.vector(left)?, right)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        distance::{Metric, Space},
        hnsw::params::HnswParams,
    };

    fn star_graph(points: &[f32], max_connections: usize) -> (Graph, Space) {
        let params = HnswParams::new(max_connections, max_connections)
            .expect("params")
            .with_max_level(2);
        let graph = Graph::with_capacity(params, points.len());
        for (node, &x) in points.iter().enumerate() {
            graph
                .attach_node(NodeContext { node, level: 1 }, vec![x].into_boxed_slice())
                .expect("attach");
        }
        (graph, Space::new(Metric::L2, 1).expect("space"))
    }

    fn assert_symmetric(graph: &Graph, level: usize) {
        for (id, _) in graph.nodes_iter() {
            for neighbour in graph.neighbours(id, level).expect("neighbours") {
                assert!(
                    graph
                        .neighbours(neighbour, level)
                        .expect("neighbours")
                        .contains(&id),
                    "edge {id}->{neighbour} lacks its reverse at layer {level}"
                );
            }
        }
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    fn prune_restores_degree_bound_symmetrically(#[case] limit: usize) {
        let (graph, space) = star_graph(&[0.0, 1.0, 2.0, -1.0, -2.0, 5.0], 4);
        // Give every spoke a second link so none is pinned.
        for spoke in 1..6 {
            graph.link(1, 0, spoke).expect("hub link");
            let other = if spoke == 5 { 1 } else { spoke + 1 };
            graph.link(1, spoke, other).expect("ring link");
        }
        let edge = EdgeContext {
            level: 1,
            max_connections: limit,
        };
        graph
            .insertion_executor()
            .prune(&space, 0, edge)
            .expect("prune");

        assert_eq!(graph.degree(0, 1).expect("degree"), limit);
        assert_symmetric(&graph, 1);
    }

    #[test]
    fn prune_prefers_diverse_neighbours_over_closest() {
        // Hub 0 at the origin; 1.1 sits behind 1.0, -2.0 points the other way.
        let (graph, space) = star_graph(&[0.0, 1.0, 1.1, -2.0, 5.0], 4);
        for spoke in 1..4 {
            graph.link(1, 0, spoke).expect("hub link");
            graph.link(1, spoke, 4).expect("anchor link");
        }
        let edge = EdgeContext {
            level: 1,
            max_connections: 2,
        };
        graph
            .insertion_executor()
            .prune(&space, 0, edge)
            .expect("prune");

        let mut kept = graph.neighbours(0, 1).expect("neighbours");
        kept.sort_unstable();
        assert_eq!(kept, vec![1, 3], "closest-first would have kept 1 and 2");
        assert!(graph.neighbours(2, 1).expect("neighbours").contains(&4));
        assert_symmetric(&graph, 1);
    }

    #[test]
    fn prune_keeps_sole_link_neighbours() {
        let (graph, space) = star_graph(&[0.0, 1.0, 1.1, 9.0], 4);
        graph.link(1, 0, 1).expect("link");
        graph.link(1, 0, 2).expect("link");
        graph.link(1, 1, 2).expect("link");
        graph.link(1, 0, 3).expect("link");
        let edge = EdgeContext {
            level: 1,
            max_connections: 2,
        };
        graph
            .insertion_executor()
            .prune(&space, 0, edge)
            .expect("prune");

        let kept = graph.neighbours(0, 1).expect("neighbours");
        assert_eq!(kept.len(), 2);
        assert!(kept.contains(&3), "far sole-link neighbour must survive");
        assert!(kept.contains(&1));
        assert_symmetric(&graph, 1);
    }

    #[test]
    fn prune_is_a_no_op_within_bounds() {
        let (graph, space) = star_graph(&[0.0, 1.0, 2.0], 2);
        graph.link(0, 0, 1).expect("link");
        graph.link(0, 0, 2).expect("link");
        let edge = EdgeContext {
            level: 0,
            max_connections: 4,
        };
        graph
            .insertion_executor()
            .prune(&space, 0, edge)
            .expect("prune");
        assert_eq!(graph.degree(0, 0).expect("degree"), 2);
    }
}
