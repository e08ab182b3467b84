use tracing::{Level, debug, trace};

use super::{Audit, HnswInvariantViolation, Sink};

pub(super) fn check(audit: Audit<'_>, sink: &mut Sink<'_>) -> Result<(), HnswInvariantViolation> {
    if tracing::enabled!(Level::TRACE) {
        trace!(edges = audit.snapshot.edges().count(), "checking link symmetry");
    }
    for edge in audit.snapshot.edges() {
        if edge.origin == edge.target {
            sink.report(HnswInvariantViolation::SelfLoop {
                node: edge.origin,
                layer: edge.layer,
            })?;
            continue;
        }
        let reverse = match audit.snapshot.target_layers(edge) {
            Ok(layers) => &layers[edge.layer],
            Err(violation) => {
                sink.report(violation)?;
                continue;
            }
        };
        if !reverse.contains(&edge.origin) {
            debug!(?edge, neighbours = ?reverse, "missing backlink");
            sink.report(HnswInvariantViolation::MissingBacklink {
                origin: edge.origin,
                target: edge.target,
                layer: edge.layer,
            })?;
        }
    }
    Ok(())
}
