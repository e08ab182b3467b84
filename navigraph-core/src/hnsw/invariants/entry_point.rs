use super::{Audit, HnswInvariantViolation, Sink};

pub(super) fn check(audit: Audit<'_>, sink: &mut Sink<'_>) -> Result<(), HnswInvariantViolation> {
    if audit.snapshot.is_empty() {
        return Ok(());
    }
    let Some(entry) = audit.snapshot.entry else {
        return sink.report(HnswInvariantViolation::MissingEntryPoint);
    };
    let taller = audit
        .snapshot
        .nodes()
        .map(|(node, layers)| (node, layers.len().saturating_sub(1)))
        .filter(|&(_, level)| level > entry.level);
    for (node, level) in taller {
        sink.report(HnswInvariantViolation::EntryPointNotHighest {
            entry: entry.node,
            entry_level: entry.level,
            node,
            level,
        })?;
    }
    Ok(())
}
