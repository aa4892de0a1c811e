//! Track graph model for checking model-railroad layouts.
//!
//! A [`LayoutGraph`] holds [`TrackElement`]s joined by connections at their
//! connection points. Each element's [`ElementKind`] fixes how many points it
//! has and which groups of points carry a block name.

mod element;
mod error;
mod graph;
mod kind;

pub use element::TrackElement;
pub use error::LayoutError;
pub use graph::{Connection, ElementId, Endpoint, LayoutGraph};
pub use kind::{BlockLeg, CrossoverType, ElementKind, KindDescriptor, SlipType, TurnoutHand};
