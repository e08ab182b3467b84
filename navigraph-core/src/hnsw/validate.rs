use crate::distance::DistanceSpace;

use super::{error::HnswError, graph::Graph};

/// Rejects vectors that may not enter the index or be used as a query.
pub(crate) fn validate_vector<S: DistanceSpace + ?Sized>(
    space: &S,
    vector: &[f32],
) -> Result<(), HnswError> {
    let expected = space.dimension();
    if vector.len() != expected {
        return Err(HnswError::DimensionMismatch {
            expected,
            actual: vector.len(),
        });
    }
    if let Some((index, &value)) = vector
        .iter()
        .enumerate()
        .find(|(_, value)| !value.is_finite())
    {
        return Err(HnswError::NonFiniteComponent { index, value });
    }
    space.validate_vector(vector)?;
    Ok(())
}

pub(crate) fn validate_distance<S: DistanceSpace + ?Sized>(
    space: &S,
    graph: &Graph,
    query: &[f32],
    node: usize,
) -> Result<f64, HnswError> {
    let value = space.distance(query, graph.vector(node)?)?.value();
    if value.is_finite() {
        Ok(value)
    } else {
        Err(HnswError::NonFiniteDistance { node })
    }
}

pub(crate) fn validate_batch_distances<S: DistanceSpace + ?Sized>(
    space: &S,
    graph: &Graph,
    query: &[f32],
    candidates: &[usize],
) -> Result<Vec<f64>, HnswError> {
    candidates
        .iter()
        .map(|&candidate| validate_distance(space, graph, query, candidate))
        .collect()
}
