//! Internal graph representation for the HNSW index.

mod core;

pub(crate) use core::*;
