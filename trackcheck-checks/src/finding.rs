use std::collections::BTreeSet;

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

/// The condition a finding reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum FindingKind {
    /// An element with at least one free connection point.
    UnconnectedTrack,
    /// An element with at least one required block leg left unassigned.
    UnassignedBlockTrack,
    /// A block whose members form more than one connected region.
    NonContiguousBlock,
}

/// Per-kind detail carried by a finding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum Detail {
    /// Indices of the connection points that join no connection.
    FreePoints(Vec<usize>),
    /// Indices of the required block legs with no block.
    UnassignedLegs(Vec<usize>),
    /// Named members of each connected region, canonical region first.
    ///
    /// A region made only of unnamed elements appears as an empty set.
    Components(Vec<BTreeSet<String>>),
}

/// One reported defect.
///
/// Findings own their data and refer to elements by name only, so they stay
/// valid after the layout changes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct Finding {
    pub kind: FindingKind,
    /// The element name, or the block name for block findings.
    pub name: String,
    /// Names of the elements to highlight when this finding is selected.
    pub elements: BTreeSet<String>,
    pub detail: Detail,
}

impl Finding {
    /// Returns the number of connected regions for block findings.
    #[must_use]
    pub fn component_count(&self) -> Option<usize> {
        match &self.detail {
            Detail::Components(components) => Some(components.len()),
            _ => None,
        }
    }

    /// Returns the named members outside the canonical region.
    ///
    /// Empty for findings that are not about blocks.
    #[must_use]
    pub fn stray_elements(&self) -> BTreeSet<String> {
        match &self.detail {
            Detail::Components(components) => {
                components.iter().skip(1).flatten().cloned().collect()
            }
            _ => BTreeSet::new(),
        }
    }
}
