//! Private helpers for id reservation and the per-node insertion pipeline.

use std::sync::atomic::Ordering;

use tracing::debug;

use crate::{
    distance::DistanceSpace,
    hnsw::{
        error::HnswError,
        graph::NodeContext,
        insert::PlanningInputs,
        telemetry,
        types::{ElementId, EntryPoint, InsertionPlan},
    },
};

use super::HnswIndex;

impl<S: DistanceSpace> HnswIndex<S> {
    /// Claims the next free slot without ever moving past capacity.
    pub(super) fn reserve_id(&self) -> Result<ElementId, HnswError> {
        let capacity = self.graph.capacity();
        self.reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |next| {
                (next < capacity).then_some(next + 1)
            })
            .map_err(|_| HnswError::CapacityExceeded { capacity })
    }

    pub(super) fn remaining_capacity(&self) -> usize {
        self.graph
            .capacity()
            .saturating_sub(self.reserved.load(Ordering::Acquire))
    }

    /// Plans, publishes and links `ctx.node`.
    ///
    /// Planning only reads the graph and runs before the node is published,
    /// so a planning failure leaves the graph exactly as it was.
    pub(super) fn insert_reserved(&self, ctx: NodeContext, vector: &[f32]) -> Result<(), HnswError> {
        let planned = match self.graph.entry()? {
            Some(entry) => Some((entry, self.plan(ctx, vector, entry)?)),
            None => None,
        };
        self.graph.attach_node(ctx, vector.into())?;
        let (entry, plan) = match planned {
            Some(planned) => planned,
            None => match self.graph.seed_entry(ctx)? {
                None => {
                    debug!(node = ctx.node, level = ctx.level, "seeded entry point");
                    self.finish_insert();
                    return Ok(());
                }
                // Another writer seeded the graph after the entry was read.
                Some(entry) => (entry, self.plan(ctx, vector, entry)?),
            },
        };
        self.graph
            .insertion_executor()
            .apply(&self.space, ctx, plan)?;
        if ctx.level > entry.level && self.graph.promote_entry(ctx)? {
            debug!(
                node = ctx.node,
                level = ctx.level,
                previous = entry.node,
                "promoted entry point"
            );
        }
        self.finish_insert();
        Ok(())
    }

    fn plan(
        &self,
        ctx: NodeContext,
        vector: &[f32],
        entry: EntryPoint,
    ) -> Result<InsertionPlan, HnswError> {
        self.graph.insertion_planner().plan(
            &self.space,
            PlanningInputs {
                ctx,
                vector,
                entry,
                ef: self.params.ef_construction(),
            },
        )
    }

    fn finish_insert(&self) {
        self.len.fetch_add(1, Ordering::AcqRel);
        telemetry::record_insert();
    }
}
