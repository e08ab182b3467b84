//! Error and result types shared by the distance kernels.

use core::fmt;

use thiserror::Error;

use crate::error::define_error_codes;

/// Which operand of a two-vector call an error refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VectorKind {
    /// The first argument, or the vector being inserted or queried.
    Left,
    /// The second argument, or the stored vector.
    Right,
}

impl VectorKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for VectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a distance could not be computed.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum DistanceError {
    /// An operand was empty.
    #[error("vectors must have positive dimension")]
    ZeroLength,
    /// Operand lengths differ. Spaces report the offending vector as `left`
    /// and their own dimension as `right`.
    #[error("dimension mismatch: left={left}, right={right}")]
    DimensionMismatch { left: usize, right: usize },
    /// An operand held NaN or an infinity.
    #[error("{which} vector contains a non-finite value at index {index}: {value}")]
    NonFinite {
        which: VectorKind,
        index: usize,
        value: f32,
    },
    /// Cosine distance needs both operands to have a non-zero norm.
    #[error("{which} vector has zero magnitude")]
    ZeroMagnitude { which: VectorKind },
}

define_error_codes! {
    /// Stable identifiers for [`DistanceError`] variants.
    DistanceError => DistanceErrorCode {
        /// An operand was empty.
        ZeroLength = "DISTANCE_ZERO_LENGTH" if Self::ZeroLength,
        /// Operand lengths differ.
        DimensionMismatch = "DISTANCE_DIMENSION_MISMATCH" if Self::DimensionMismatch { .. },
        /// An operand held NaN or an infinity.
        NonFinite = "DISTANCE_NON_FINITE" if Self::NonFinite { .. },
        /// Cosine distance requested for a zero vector.
        ZeroMagnitude = "DISTANCE_ZERO_MAGNITUDE" if Self::ZeroMagnitude { .. },
    }
}

/// Result alias used throughout the distance module.
pub type Result<T> = core::result::Result<T, DistanceError>;

/// A computed distance. Smaller is always closer, whatever the metric.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Distance(f64);

impl Distance {
    pub(crate) const fn new(value: f64) -> Self {
        Self(value)
    }

    /// The distance as a plain float.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl From<Distance> for f64 {
    fn from(distance: Distance) -> Self {
        distance.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
