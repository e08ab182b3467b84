//! Layer search routines for the HNSW graph.
//!
//! Implements greedy descent and best-first per-layer search whilst enforcing
//! finite distance invariants. Neighbour lists are copied out of their locks
//! before expansion, so searches tolerate concurrent pruning.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashSet},
};

use crate::distance::DistanceSpace;

use super::{
    error::HnswError,
    graph::{ExtendedSearchContext, Graph, SearchContext},
    types::{EntryPoint, Neighbour},
    validate::{validate_batch_distances, validate_distance},
};

#[derive(Debug)]
struct SearchState {
    visited: HashSet<usize>,
    candidates: BinaryHeap<Reverse<Neighbour>>,
    best: BinaryHeap<Neighbour>,
}

impl SearchState {
    fn new(entries: &[Neighbour], ef: usize) -> Self {
        let mut state = Self {
            visited: HashSet::new(),
            candidates: BinaryHeap::new(),
            best: BinaryHeap::new(),
        };
        for entry in entries {
            if state.visit(entry.id) {
                state.try_enqueue(entry.id, entry.distance, ef);
            }
        }
        state
    }

    fn pop_candidate(&mut self) -> Option<Neighbour> {
        self.candidates.pop().map(|Reverse(closest)| closest)
    }

    fn is_full_and_worse(&self, ef: usize, distance: f64) -> bool {
        self.best.len() >= ef
            && self
                .best
                .peek()
                .is_some_and(|furthest| distance > furthest.distance)
    }

    fn visit(&mut self, candidate: usize) -> bool {
        self.visited.insert(candidate)
    }

    fn try_enqueue(&mut self, candidate: usize, distance: f64, ef: usize) {
        if self.is_full_and_worse(ef, distance) {
            return;
        }
        let neighbour = Neighbour {
            id: candidate,
            distance,
        };
        self.candidates.push(Reverse(neighbour));
        self.best.push(neighbour);
        while self.best.len() > ef {
            self.best.pop();
        }
    }

    fn finalise(self) -> Vec<Neighbour> {
        self.best.into_sorted_vec()
    }
}

#[derive(Debug)]
pub(crate) struct LayerSearcher<'graph> {
    graph: &'graph Graph,
}

impl<'graph> LayerSearcher<'graph> {
    pub(crate) fn new(graph: &'graph Graph) -> Self {
        Self { graph }
    }

    /// Walks towards the query with beam width one, returning the closest node
    /// found at `ctx.level`.
    pub(crate) fn greedy_search_layer<S: DistanceSpace + ?Sized>(
        &self,
        space: &S,
        ctx: SearchContext<'_>,
    ) -> Result<Neighbour, HnswError> {
        let mut current = ctx.entry;
        loop {
            let neighbours = self.graph.neighbours(current.id, ctx.level())?;
            if neighbours.is_empty() {
                return Ok(current);
            }
            let distances = validate_batch_distances(space, self.graph, ctx.query(), &neighbours)?;
            let best = neighbours
                .into_iter()
                .zip(distances)
                .map(|(id, distance)| Neighbour { id, distance })
                .min();
            match best {
                Some(best) if best.distance < current.distance => current = best,
                _ => return Ok(current),
            }
        }
    }

    /// Greedily descends from `entry` through every layer above
    /// `target_level`, returning the closest node found on the last layer
    /// visited.
    pub(crate) fn descend<S: DistanceSpace + ?Sized>(
        &self,
        space: &S,
        query: &[f32],
        entry: EntryPoint,
        target_level: usize,
    ) -> Result<Neighbour, HnswError> {
        let mut current = Neighbour {
            id: entry.node,
            distance: validate_distance(space, self.graph, query, entry.node)?,
        };
        for level in ((target_level + 1)..=entry.level).rev() {
            current = self.greedy_search_layer(
                space,
                SearchContext {
                    query,
                    entry: current,
                    level,
                },
            )?;
        }
        Ok(current)
    }

    /// Beam search at one layer, seeded with `entries`. Returns up to `ef`
    /// neighbours sorted by ascending distance.
    pub(crate) fn search_layer<S: DistanceSpace + ?Sized>(
        &self,
        space: &S,
        ctx: ExtendedSearchContext<'_>,
        entries: &[Neighbour],
    ) -> Result<Vec<Neighbour>, HnswError> {
        let ef = ctx.ef.max(1);
        let mut state = SearchState::new(entries, ef);

        while let Some(nearest) = state.pop_candidate() {
            if state.is_full_and_worse(ef, nearest.distance) {
                break;
            }

            let fresh: Vec<_> = self
                .graph
                .neighbours(nearest.id, ctx.level())?
                .into_iter()
                .filter(|candidate| state.visit(*candidate))
                .collect();
            if fresh.is_empty() {
                continue;
            }

            let distances = validate_batch_distances(space, self.graph, ctx.query(), &fresh)?;
            for (candidate, distance) in fresh.into_iter().zip(distances) {
                state.try_enqueue(candidate, distance, ef);
            }
        }
        Ok(state.finalise())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        distance::{Metric, Space},
        hnsw::{graph::NodeContext, params::HnswParams},
    };

    /// Points on a line, chained 0 - 1 - 2 - ... at layer 0.
    fn line_graph(points: &[f32]) -> (Graph, Space) {
        let params = HnswParams::new(2, 4).expect("params");
        let graph = Graph::with_capacity(params, points.len());
        for (node, &x) in points.iter().enumerate() {
            graph
                .attach_node(NodeContext { node, level: 0 }, vec![x].into_boxed_slice())
                .expect("attach");
        }
        for node in 1..points.len() {
            graph.link(0, node - 1, node).expect("link");
        }
        (graph, Space::new(Metric::L2, 1).expect("space"))
    }

    fn entry(graph: &Graph, space: &Space, query: &[f32], id: usize) -> Neighbour {
        let distance = space
            .distance(query, graph.vector(id).expect("vector"))
            .expect("distance")
            .value();
        Neighbour { id, distance }
    }

    #[test]
    fn greedy_search_walks_to_local_minimum() {
        let (graph, space) = line_graph(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        let query = [3.2];
        let ctx = SearchContext {
            query: &query,
            entry: entry(&graph, &space, &query, 0),
            level: 0,
        };
        let found = graph
            .searcher()
            .greedy_search_layer(&space, ctx)
            .expect("search");
        assert_eq!(found.id, 3);
    }

    #[rstest]
    #[case(1, vec![3])]
    #[case(3, vec![3, 4, 2])]
    #[case(10, vec![3, 4, 2, 1, 0])]
    fn layer_search_returns_sorted_beam(#[case] ef: usize, #[case] expected: Vec<usize>) {
        let (graph, space) = line_graph(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        let query = [3.4];
        let ctx = SearchContext {
            query: &query,
            entry: entry(&graph, &space, &query, 0),
            level: 0,
        };
        let seeds = [ctx.entry];
        let found = graph
            .searcher()
            .search_layer(&space, ctx.with_ef(ef), &seeds)
            .expect("search");
        let ids: Vec<_> = found.iter().map(|n| n.id).collect();
        assert_eq!(ids, expected);
        assert!(found.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn layer_search_deduplicates_seeds() {
        let (graph, space) = line_graph(&[0.0, 1.0, 2.0]);
        let query = [0.0];
        let seed = entry(&graph, &space, &query, 1);
        let ctx = SearchContext {
            query: &query,
            entry: seed,
            level: 0,
        };
        let found = graph
            .searcher()
            .search_layer(&space, ctx.with_ef(8), &[seed, seed])
            .expect("search");
        let ids: Vec<_> = found.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
