//! Core library for navigraph, an in-memory approximate nearest-neighbour
//! index built on the HNSW graph.
//!
//! ```
//! use navigraph_core::{HnswIndex, HnswParams, Metric};
//!
//! let index = HnswIndex::for_metric(Metric::Cosine, 3, 100, HnswParams::default())
//!     .expect("valid configuration");
//! let ids = index
//!     .insert_batch(&[vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]])
//!     .expect("batch insert");
//! let hits = index.search_knn(&[0.9, 0.1, 0.0], 1).expect("search");
//! assert_eq!(hits[0].id, ids[0]);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod distance;
mod error;
pub mod hnsw;

pub use crate::{
    distance::{
        Distance, DistanceError, DistanceErrorCode, DistanceSpace, Metric, ParseMetricError,
        Space, VectorKind, cosine_distance, inner_product_distance, squared_euclidean_distance,
    },
    error::Result,
    hnsw::{
        ElementId, HnswError, HnswErrorCode, HnswIndex, HnswInvariant, HnswInvariantChecker,
        HnswInvariantViolation, HnswParams, LayerConsistencyDetail, Neighbour,
    },
};
