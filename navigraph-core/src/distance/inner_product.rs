use super::{
    helpers::{check_operands, widened_pairs},
    types::{Distance, Result},
};

/// Computes the negated inner product of two vectors.
///
/// Larger dot products mean more similar vectors, so the sign is flipped to
/// keep "smaller is closer" consistent with the other metrics. The value can
/// be negative and is not a metric in the mathematical sense.
///
/// # Examples
///
/// ```
/// use navigraph_core::{DistanceError, inner_product_distance};
///
/// fn main() -> Result<(), DistanceError> {
///     let distance = inner_product_distance(&[1.0, 2.0], &[3.0, 4.0])?;
///     assert!((distance.value() + 11.0).abs() < 1e-6);
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// - [`DistanceError::ZeroLength`](crate::DistanceError::ZeroLength) when any input is empty.
/// - [`DistanceError::DimensionMismatch`](crate::DistanceError::DimensionMismatch) when input lengths differ.
/// - [`DistanceError::NonFinite`](crate::DistanceError::NonFinite) when a value is NaN or infinite.
pub fn inner_product_distance(left: &[f32], right: &[f32]) -> Result<Distance> {
    check_operands(left, right)?;
    Ok(Distance::new(negative_dot(left, right)))
}

pub(crate) fn negative_dot(left: &[f32], right: &[f32]) -> f64 {
    let dot: f64 = widened_pairs(left, right).map(|(l, r)| l * r).sum();
    -dot
}
