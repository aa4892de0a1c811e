#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

/// Which members a non-contiguous block finding lists for highlighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum BlockHighlight {
    /// Every named member of the block, across all regions.
    #[default]
    AllMembers,
    /// Only the named members outside the canonical (largest) region.
    StrayComponents,
}

/// Configuration for the layout checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct Config {
    pub block_highlight: BlockHighlight,
}

impl Config {
    /// Returns `self` with the given block highlight, keeping other fields unchanged.
    #[must_use]
    pub fn with_block_highlight(self, block_highlight: BlockHighlight) -> Self {
        Self { block_highlight }
    }
}
