use std::collections::BTreeSet;

use log::{debug, trace};
use trackcheck_core::LayoutGraph;

use crate::{Detail, Finding, FindingKind};

/// Finds elements whose kind requires a block on a leg that has none.
///
/// Kinds without block legs never fail. Findings follow the element order of
/// the layout, and unnamed elements are skipped.
#[must_use]
pub fn check_unassigned_blocks(layout: &LayoutGraph) -> Vec<Finding> {
    debug!(
        "checking {} elements for unassigned blocks",
        layout.element_count()
    );

    let findings: Vec<Finding> = layout
        .elements()
        .filter_map(|(id, element)| {
            let legs = element.unassigned_required_legs();
            if legs.is_empty() {
                return None;
            }
            if !element.has_name() {
                trace!("skipping unnamed element {id} with unassigned legs {legs:?}");
                return None;
            }
            Some(Finding {
                kind: FindingKind::UnassignedBlockTrack,
                name: element.name().to_string(),
                elements: BTreeSet::from([element.name().to_string()]),
                detail: Detail::UnassignedLegs(legs),
            })
        })
        .collect();

    debug!("found {} tracks with unassigned blocks", findings.len());
    findings
}
