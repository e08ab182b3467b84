use super::{
    helpers::{check_operands, widened_pairs},
    types::{Distance, Result},
};

/// Computes the squared Euclidean (L2) distance between two vectors.
///
/// The square root is omitted: it is monotonic, so neighbour ordering is the
/// same and the kernel stays cheaper.
///
/// # Examples
///
/// ```
/// use navigraph_core::{DistanceError, squared_euclidean_distance};
///
/// fn main() -> Result<(), DistanceError> {
///     let distance = squared_euclidean_distance(&[1.0, 2.0, 3.0], &[4.0, 6.0, 8.0])?;
///     assert!((distance.value() - 50.0).abs() < 1e-6);
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// - [`DistanceError::ZeroLength`](crate::DistanceError::ZeroLength) when any input is empty.
/// - [`DistanceError::DimensionMismatch`](crate::DistanceError::DimensionMismatch) when input lengths differ.
/// - [`DistanceError::NonFinite`](crate::DistanceError::NonFinite) when a value is NaN or infinite.
pub fn squared_euclidean_distance(left: &[f32], right: &[f32]) -> Result<Distance> {
    check_operands(left, right)?;
    Ok(Distance::new(squared_euclidean(left, right)))
}

/// Unchecked kernel; callers guarantee equal lengths.
pub(crate) fn squared_euclidean(left: &[f32], right: &[f32]) -> f64 {
    widened_pairs(left, right).map(|(l, r)| (l - r).powi(2)).sum()
}
