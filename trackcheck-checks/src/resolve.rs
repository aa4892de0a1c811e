use std::collections::BTreeSet;

use trackcheck_core::{ElementId, LayoutGraph, TrackElement};

/// Maps element names back to the elements of a layout, in layout order.
///
/// Names with no matching element are ignored, so a finding produced before
/// the layout changed resolves to whatever of it still exists.
#[must_use]
pub fn resolve_elements<'a>(
    layout: &'a LayoutGraph,
    names: &BTreeSet<String>,
) -> Vec<(ElementId, &'a TrackElement)> {
    layout
        .elements()
        .filter(|(_, element)| element.has_name() && names.contains(element.name()))
        .collect()
}
