//! Structural-health checks for model-railroad track layouts.
//!
//! Each check is a read-only pass over a [`LayoutGraph`] snapshot and returns
//! owned [`Finding`]s that name elements and blocks rather than borrowing
//! them:
//!
//! - [`check_unconnected_tracks`]: elements with free connection points.
//! - [`check_unassigned_blocks`]: elements missing a required block.
//! - [`check_non_contiguous_blocks`]: blocks split into several regions.
//!
//! [`FindingSet`] orders a check's findings for presentation and re-applies
//! the caller's previous [`Selection`].
//!
//! [`LayoutGraph`]: trackcheck_core::LayoutGraph

mod config;
mod contiguity;
mod finding;
mod finding_set;
mod resolve;
mod unassigned;
mod unconnected;

pub use config::{BlockHighlight, Config};
pub use contiguity::{check_non_contiguous_blocks, check_non_contiguous_blocks_with};
pub use finding::{Detail, Finding, FindingKind};
pub use finding_set::{Entry, FindingSet, Selection, bare_name, display_key};
pub use resolve::resolve_elements;
pub use unassigned::check_unassigned_blocks;
pub use unconnected::check_unconnected_tracks;
