//! HNSW insertion workflow.
//!
//! Planning computes the descent path and per-layer candidate pools without
//! mutating the graph. Execution selects neighbours with the diversity
//! heuristic, links them bidirectionally and re-prunes any neighbour pushed
//! over its degree cap.

mod executor;
mod planner;
mod select;

pub(crate) use executor::InsertionExecutor;
pub(crate) use planner::{InsertionPlanner, PlanningInputs};
