//! Input checks and accumulators shared by the kernels.

use super::types::{DistanceError, Result, VectorKind};

fn ensure_finite(values: &[f32], which: VectorKind) -> Result<()> {
    if values.is_empty() {
        return Err(DistanceError::ZeroLength);
    }
    match values.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(DistanceError::NonFinite {
            which,
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

/// Rejects empty or non-finite operands and operands of unequal length.
pub(crate) fn check_operands(left: &[f32], right: &[f32]) -> Result<()> {
    ensure_finite(left, VectorKind::Left)?;
    ensure_finite(right, VectorKind::Right)?;
    if left.len() == right.len() {
        Ok(())
    } else {
        Err(DistanceError::DimensionMismatch {
            left: left.len(),
            right: right.len(),
        })
    }
}

/// Widened products of each component pair.
pub(crate) fn widened_pairs<'a>(
    left: &'a [f32],
    right: &'a [f32],
) -> impl Iterator<Item = (f64, f64)> + 'a {
    left.iter()
        .zip(right)
        .map(|(&l, &r)| (f64::from(l), f64::from(r)))
}

/// Sum of squared components, used to reject zero vectors for cosine spaces.
pub(crate) fn squared_magnitude(values: &[f32]) -> f64 {
    values.iter().map(|&v| f64::from(v).powi(2)).sum()
}
