use super::{Audit, HnswInvariantViolation, Sink, snapshot::Edge};

pub(super) fn check(audit: Audit<'_>, sink: &mut Sink<'_>) -> Result<(), HnswInvariantViolation> {
    // The entry point must own the layer it is recorded at.
    let entry = audit.snapshot.entry.map(|entry| Edge {
        origin: entry.node,
        target: entry.node,
        layer: entry.level,
    });
    for edge in audit.snapshot.edges().chain(entry) {
        if let Err(violation) = audit.snapshot.target_layers(edge) {
            sink.report(violation)?;
        }
    }
    Ok(())
}
