use super::{
    helpers::{check_operands, widened_pairs},
    types::{Distance, DistanceError, Result, VectorKind},
};

/// Computes the cosine distance (`1 - cosine similarity`) between two vectors.
///
/// Norms are computed inside the kernel, so inputs need not be normalised.
/// The result lies in `[0, 2]`.
///
/// # Examples
///
/// ```
/// use navigraph_core::{DistanceError, cosine_distance};
///
/// fn main() -> Result<(), DistanceError> {
///     let orthogonal = cosine_distance(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0])?;
///     assert!((orthogonal.value() - 1.0).abs() < 1e-6);
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// - [`DistanceError::ZeroLength`] when any input is empty.
/// - [`DistanceError::DimensionMismatch`] when input lengths differ.
/// - [`DistanceError::NonFinite`] when a value is NaN or infinite.
/// - [`DistanceError::ZeroMagnitude`] when either vector has zero L2 norm.
pub fn cosine_distance(left: &[f32], right: &[f32]) -> Result<Distance> {
    check_operands(left, right)?;
    cosine(left, right)
}

/// Kernel without finiteness checks; callers guarantee equal lengths.
pub(crate) fn cosine(left: &[f32], right: &[f32]) -> Result<Distance> {
    let (dot, left_sq, right_sq) = widened_pairs(left, right).fold(
        (0.0_f64, 0.0_f64, 0.0_f64),
        |(dot, ls, rs), (l, r)| (dot + l * r, ls + l * l, rs + r * r),
    );
    let which = match (left_sq == 0.0, right_sq == 0.0) {
        (true, _) => Some(VectorKind::Left),
        (false, true) => Some(VectorKind::Right),
        (false, false) => None,
    };
    if let Some(which) = which {
        return Err(DistanceError::ZeroMagnitude { which });
    }

    // Rounding can push the ratio just outside [-1, 1].
    let similarity = (dot / (left_sq.sqrt() * right_sq.sqrt())).clamp(-1.0, 1.0);
    Ok(Distance::new(1.0 - similarity))
}
