//! Breadth-first walk over the union of all layers, starting at the entry
//! point. Nodes the walk never touches are reported as unreachable.

use std::collections::VecDeque;

use super::{Audit, HnswInvariantViolation, Sink, snapshot::Edge};

pub(super) fn check(audit: Audit<'_>, sink: &mut Sink<'_>) -> Result<(), HnswInvariantViolation> {
    let snapshot = audit.snapshot;
    if snapshot.is_empty() {
        return Ok(());
    }
    let Some(entry) = snapshot.entry else {
        return sink.report(HnswInvariantViolation::MissingEntryPoint);
    };
    let root = Edge {
        origin: entry.node,
        target: entry.node,
        layer: entry.level,
    };
    if let Err(violation) = snapshot.target_layers(root) {
        return sink.report(violation);
    }

    let mut seen = vec![false; snapshot.capacity()];
    let mut frontier = VecDeque::from([entry.node]);
    seen[entry.node] = true;
    while let Some(origin) = frontier.pop_front() {
        let Some(layers) = snapshot.layers(origin) else {
            continue;
        };
        for (layer, neighbours) in layers.iter().enumerate() {
            for &target in neighbours {
                let edge = Edge {
                    origin,
                    target,
                    layer,
                };
                match snapshot.target_layers(edge) {
                    Err(violation) => sink.report(violation)?,
                    Ok(_) if !seen[target] => {
                        seen[target] = true;
                        frontier.push_back(target);
                    }
                    Ok(_) => {}
                }
            }
        }
    }

    for (node, _) in snapshot.nodes() {
        if !seen[node] {
            sink.report(HnswInvariantViolation::UnreachableNode { node })?;
        }
    }
    Ok(())
}
