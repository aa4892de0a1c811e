use std::collections::BTreeSet;

use log::{debug, trace};
use trackcheck_core::LayoutGraph;

use crate::{Detail, Finding, FindingKind};

/// Finds elements with at least one free connection point.
///
/// Findings follow the element order of the layout. Unnamed elements are
/// skipped since they cannot be reported by name.
#[must_use]
pub fn check_unconnected_tracks(layout: &LayoutGraph) -> Vec<Finding> {
    debug!(
        "checking {} elements for unconnected tracks",
        layout.element_count()
    );

    let findings: Vec<Finding> = layout
        .elements()
        .filter_map(|(id, element)| {
            let free = layout.free_points(id);
            if free.is_empty() {
                return None;
            }
            if !element.has_name() {
                trace!("skipping unnamed element {id} with free points {free:?}");
                return None;
            }
            Some(Finding {
                kind: FindingKind::UnconnectedTrack,
                name: element.name().to_string(),
                elements: BTreeSet::from([element.name().to_string()]),
                detail: Detail::FreePoints(free),
            })
        })
        .collect();

    debug!("found {} unconnected tracks", findings.len());
    findings
}
