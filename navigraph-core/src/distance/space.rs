//! Metric spaces consumed by the HNSW index.

use core::{fmt, str::FromStr};

use super::{
    cosine::cosine,
    euclidean::squared_euclidean,
    helpers::squared_magnitude,
    inner_product::negative_dot,
    types::{Distance, DistanceError, Result, VectorKind},
};

/// Built-in distance metrics.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Metric {
    /// Squared Euclidean distance.
    #[default]
    L2,
    /// Negated inner product.
    InnerProduct,
    /// `1 - cosine similarity`.
    Cosine,
}

impl Metric {
    /// Returns the short name used in logs and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::L2 => "l2",
            Self::InnerProduct => "ip",
            Self::Cosine => "cosine",
        }
    }

    /// Whether `distance(a, b) == distance(b, a)` holds for every pair.
    #[rustfmt::skip]
    #[must_use]
    pub const fn is_symmetric(self) -> bool { !matches!(self, Self::InnerProduct) }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown metric name.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown metric `{0}` (expected l2, ip or cosine)")]
pub struct ParseMetricError(String);

impl FromStr for Metric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l2" | "euclidean" => Ok(Self::L2),
            "ip" | "inner-product" | "inner_product" => Ok(Self::InnerProduct),
            "cosine" => Ok(Self::Cosine),
            _ => Err(ParseMetricError(s.to_owned())),
        }
    }
}

/// Pluggable distance capability over fixed-dimension vectors.
///
/// Implementations must be deterministic and order vectors so that smaller
/// distances mean closer vectors.
pub trait DistanceSpace: Send + Sync {
    /// Number of components every vector in this space carries.
    fn dimension(&self) -> usize;

    /// Metric family implemented by this space.
    fn metric(&self) -> Metric;

    /// Computes the distance between two vectors of this space.
    ///
    /// # Errors
    ///
    /// Returns [`DistanceError::DimensionMismatch`] when either vector does not
    /// carry [`Self::dimension`] components, plus any metric-specific failure.
    fn distance(&self, left: &[f32], right: &[f32]) -> Result<Distance>;

    /// Rejects vectors the metric cannot handle, before they enter an index.
    ///
    /// # Errors
    ///
    /// Returns a metric-specific [`DistanceError`].
    fn validate_vector(&self, vector: &[f32]) -> Result<()> {
        let _ = vector;
        Ok(())
    }
}

/// Built-in [`DistanceSpace`] for the [`Metric`] variants.
///
/// # Examples
///
/// ```
/// use navigraph_core::{DistanceSpace, Metric, Space};
///
/// let space = Space::new(Metric::L2, 2).expect("positive dimension");
/// let distance = space.distance(&[0.0, 0.0], &[3.0, 4.0]).expect("same dimension");
/// assert_eq!(distance.value(), 25.0);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Space {
    metric: Metric,
    dimension: usize,
}

impl Space {
    /// Creates a space for `metric` over `dimension` components.
    ///
    /// # Errors
    ///
    /// Returns [`DistanceError::ZeroLength`] when `dimension` is zero.
    pub fn new(metric: Metric, dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(DistanceError::ZeroLength);
        }
        Ok(Self { metric, dimension })
    }

    fn check_dimension(&self, len: usize) -> Result<()> {
        if len != self.dimension {
            return Err(DistanceError::DimensionMismatch {
                left: self.dimension,
                right: len,
            });
        }
        Ok(())
    }
}

impl DistanceSpace for Space {
    #[rustfmt::skip]
    fn dimension(&self) -> usize { self.dimension }

    #[rustfmt::skip]
    fn metric(&self) -> Metric { self.metric }

    fn distance(&self, left: &[f32], right: &[f32]) -> Result<Distance> {
        self.check_dimension(left.len())?;
        self.check_dimension(right.len())?;
        match self.metric {
            Metric::L2 => Ok(Distance::new(squared_euclidean(left, right))),
            Metric::InnerProduct => Ok(Distance::new(negative_dot(left, right))),
            Metric::Cosine => cosine(left, right),
        }
    }

    fn validate_vector(&self, vector: &[f32]) -> Result<()> {
        if self.metric == Metric::Cosine && squared_magnitude(vector) == 0.0 {
            return Err(DistanceError::ZeroMagnitude {
                which: VectorKind::Left,
            });
        }
        Ok(())
    }
}
