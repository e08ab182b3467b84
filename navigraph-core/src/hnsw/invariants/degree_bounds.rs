use super::{Audit, HnswInvariantViolation, Sink};

pub(super) fn check(audit: Audit<'_>, sink: &mut Sink<'_>) -> Result<(), HnswInvariantViolation> {
    let params = audit.params;
    let overflowing = audit.snapshot.nodes().flat_map(|(node, layers)| {
        layers.iter().enumerate().filter_map(move |(layer, neighbours)| {
            let limit = params.connection_limit_for_level(layer);
            (neighbours.len() > limit).then_some(HnswInvariantViolation::DegreeBounds {
                node,
                layer,
                degree: neighbours.len(),
                limit,
            })
        })
    });
    for violation in overflowing {
        sink.report(violation)?;
    }
    Ok(())
}
