use thiserror::Error;

use crate::ElementId;

/// Errors that may occur while building or editing a [`LayoutGraph`].
///
/// [`LayoutGraph`]: crate::LayoutGraph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Another element already uses this name.
    #[error("an element named `{0}` already exists")]
    DuplicateName(String),

    /// No element carries this name.
    #[error("no element named `{0}`")]
    UnknownName(String),

    /// The id does not refer to an element in this graph.
    #[error("element {0} is not part of the layout")]
    UnknownElement(ElementId),

    /// The element has fewer connection points than requested.
    #[error("element {element} has no connection point {point} (it has {count})")]
    PointOutOfRange {
        element: ElementId,
        point: usize,
        count: usize,
    },

    /// The connection point is already joined to another point.
    ///
    /// A connection point belongs to at most one connection.
    #[error("connection point {point} of element {element} is already connected")]
    PointOccupied { element: ElementId, point: usize },

    /// Both ends of the requested connection are the same point.
    #[error("cannot connect point {point} of element {element} to itself")]
    SelfConnection { element: ElementId, point: usize },

    /// The element's kind has fewer block legs than requested.
    #[error("element `{name}` has no block leg {leg} (it has {count})")]
    LegOutOfRange {
        name: String,
        leg: usize,
        count: usize,
    },

    /// A custom kind's descriptor is inconsistent.
    #[error("element `{name}` has an invalid kind: {reason}")]
    InvalidKind { name: String, reason: &'static str },
}
