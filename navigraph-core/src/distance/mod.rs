//! Distance primitives and metric spaces.
//!
//! The free functions validate their inputs and surface detailed errors so
//! callers can react during ingestion. [`Space`] wraps the same kernels behind
//! the [`DistanceSpace`] trait used by the index, checking only dimensions on
//! the hot path because stored vectors were validated on insertion.

mod cosine;
mod euclidean;
mod helpers;
mod inner_product;
mod space;
mod types;

pub use self::cosine::cosine_distance;
pub use self::euclidean::squared_euclidean_distance;
pub use self::inner_product::inner_product_distance;
pub use self::space::{DistanceSpace, Metric, ParseMetricError, Space};
pub use self::types::{Distance, DistanceError, DistanceErrorCode, Result, VectorKind};
