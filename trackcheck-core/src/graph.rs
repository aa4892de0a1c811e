use std::{collections::HashMap, fmt};

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};

use crate::{LayoutError, TrackElement};

/// Identifies an element within one [`LayoutGraph`].
///
/// Ids stay valid when other elements are removed. The id of a removed
/// element may be reused by a later insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(NodeIndex);

impl ElementId {
    /// Returns the raw index of this id.
    #[must_use]
    pub fn index(self) -> usize {
        self.0.index()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0.index())
    }
}

/// One connection point of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint {
    pub element: ElementId,
    pub point: usize,
}

impl Endpoint {
    #[must_use]
    pub fn new(element: ElementId, point: usize) -> Self {
        Self { element, point }
    }
}

impl From<(ElementId, usize)> for Endpoint {
    fn from((element, point): (ElementId, usize)) -> Self {
        Self { element, point }
    }
}

/// An undirected connection joining two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub a: Endpoint,
    pub b: Endpoint,
}

impl Connection {
    /// Returns the endpoint opposite `endpoint`, if it is one of the two ends.
    #[must_use]
    pub fn other(&self, endpoint: Endpoint) -> Option<Endpoint> {
        if self.a == endpoint {
            Some(self.b)
        } else if self.b == endpoint {
            Some(self.a)
        } else {
            None
        }
    }
}

/// A track layout: elements joined by connections at their connection points.
///
/// Every named element is indexed by name, and every connected point is
/// indexed by endpoint, so a point can never join more than one connection
/// and a name can never be used twice.
#[derive(Debug)]
pub struct LayoutGraph {
    graph: StableUnGraph<TrackElement, Connection>,
    node_map: HashMap<String, NodeIndex>,
    occupied: HashMap<Endpoint, EdgeIndex>,
}

impl LayoutGraph {
    /// Creates an empty layout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: StableUnGraph::default(),
            node_map: HashMap::new(),
            occupied: HashMap::new(),
        }
    }

    /// Adds an element and returns its id.
    ///
    /// Unnamed elements are accepted but cannot be found by name.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::DuplicateName`] if a named element with the same
    /// name already exists, or [`LayoutError::InvalidKind`] if the element's
    /// kind descriptor is inconsistent.
    pub fn add_element(&mut self, element: TrackElement) -> Result<ElementId, LayoutError> {
        element
            .kind()
            .descriptor()
            .validate()
            .map_err(|reason| LayoutError::InvalidKind {
                name: element.name().to_string(),
                reason,
            })?;
        if element.has_name() && self.node_map.contains_key(element.name()) {
            return Err(LayoutError::DuplicateName(element.name().to_string()));
        }

        let name = element.has_name().then(|| element.name().to_string());
        let index = self.graph.add_node(element);
        if let Some(name) = name {
            self.node_map.insert(name, index);
        }

        Ok(ElementId(index))
    }

    /// Removes an element and every connection touching it.
    pub fn remove_element(&mut self, id: ElementId) -> Option<TrackElement> {
        let count = self.element(id)?.connection_point_count();
        for point in 0..count {
            if let Some(other) = self.connection_at((id, point)) {
                self.occupied.remove(&Endpoint::new(id, point));
                self.occupied.remove(&other);
            }
        }

        let element = self.graph.remove_node(id.0)?;
        if element.has_name() {
            self.node_map.remove(element.name());
        }
        Some(element)
    }

    /// Connects two free connection points.
    ///
    /// Both endpoints may belong to the same element, as long as they are
    /// different points.
    ///
    /// # Errors
    ///
    /// Returns an error if either element is unknown, either point is out of
    /// range or already connected, or both endpoints are the same point.
    pub fn connect<A, B>(&mut self, a: A, b: B) -> Result<(), LayoutError>
    where
        A: Into<Endpoint>,
        B: Into<Endpoint>,
    {
        let a = a.into();
        let b = b.into();

        self.check_free(a)?;
        self.check_free(b)?;
        if a == b {
            return Err(LayoutError::SelfConnection {
                element: a.element,
                point: a.point,
            });
        }

        let edge = self
            .graph
            .add_edge(a.element.0, b.element.0, Connection { a, b });
        self.occupied.insert(a, edge);
        self.occupied.insert(b, edge);

        Ok(())
    }

    /// Connects two free connection points given by element name and point.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownName`] if either name is not in the layout,
    /// and otherwise the same errors as [`LayoutGraph::connect`].
    pub fn connect_by_name(
        &mut self,
        a: (&str, usize),
        b: (&str, usize),
    ) -> Result<(), LayoutError> {
        let a = Endpoint::new(self.require(a.0)?, a.1);
        let b = Endpoint::new(self.require(b.0)?, b.1);
        self.connect(a, b)
    }

    /// Removes the connection at an endpoint and returns the opposite end.
    pub fn disconnect(&mut self, endpoint: impl Into<Endpoint>) -> Option<Endpoint> {
        let endpoint = endpoint.into();
        let edge = self.occupied.remove(&endpoint)?;
        let connection = self.graph.remove_edge(edge)?;
        let other = connection.other(endpoint)?;
        self.occupied.remove(&other);
        Some(other)
    }

    /// Returns the element with the given id.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&TrackElement> {
        self.graph.node_weight(id.0)
    }

    /// Assigns or clears the block of one leg of an element.
    ///
    /// This is the only in-place edit the layout allows, so names and
    /// connection points stay consistent with the indexes.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownElement`] if the id is not in the layout,
    /// or [`LayoutError::LegOutOfRange`] if the element has no such leg.
    pub fn assign_block(
        &mut self,
        id: ElementId,
        leg: usize,
        block: Option<String>,
    ) -> Result<(), LayoutError> {
        self.graph
            .node_weight_mut(id.0)
            .ok_or(LayoutError::UnknownElement(id))?
            .assign_block(leg, block)
    }

    /// Looks up a named element.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.node_map.get(name).copied().map(ElementId)
    }

    /// Returns an iterator over all elements in index order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &TrackElement)> {
        self.graph
            .node_indices()
            .map(|index| (ElementId(index), &self.graph[index]))
    }

    /// Returns an iterator over all connections.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.graph
            .edge_indices()
            .filter_map(|edge| self.graph.edge_weight(edge))
    }

    /// Returns the endpoint joined to `endpoint`, if it is connected.
    #[must_use]
    pub fn connection_at(&self, endpoint: impl Into<Endpoint>) -> Option<Endpoint> {
        let endpoint = endpoint.into();
        let edge = self.occupied.get(&endpoint)?;
        self.graph.edge_weight(*edge)?.other(endpoint)
    }

    /// Returns the connection points of an element that join no connection.
    ///
    /// Unknown ids have no points and therefore no free points.
    #[must_use]
    pub fn free_points(&self, id: ElementId) -> Vec<usize> {
        let count = self
            .element(id)
            .map_or(0, TrackElement::connection_point_count);
        (0..count)
            .filter(|&point| !self.occupied.contains_key(&Endpoint::new(id, point)))
            .collect()
    }

    /// Returns the number of elements in the layout.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of connections in the layout.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if the layout has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    fn require(&self, name: &str) -> Result<ElementId, LayoutError> {
        self.find(name)
            .ok_or_else(|| LayoutError::UnknownName(name.to_string()))
    }

    /// Ensures an endpoint names an existing, unconnected point.
    fn check_free(&self, endpoint: Endpoint) -> Result<(), LayoutError> {
        let element = self
            .element(endpoint.element)
            .ok_or(LayoutError::UnknownElement(endpoint.element))?;

        let count = element.connection_point_count();
        if endpoint.point >= count {
            return Err(LayoutError::PointOutOfRange {
                element: endpoint.element,
                point: endpoint.point,
                count,
            });
        }

        if self.occupied.contains_key(&endpoint) {
            return Err(LayoutError::PointOccupied {
                element: endpoint.element,
                point: endpoint.point,
            });
        }

        Ok(())
    }
}

impl Default for LayoutGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use itertools::Itertools;

    use crate::{BlockLeg, ElementKind, KindDescriptor, TurnoutHand};

    fn segment(name: &str) -> TrackElement {
        TrackElement::new(name, ElementKind::TrackSegment)
    }

    #[test]
    fn adding_elements_and_connections() -> Result<(), LayoutError> {
        let mut layout = LayoutGraph::new();

        let t1 = layout.add_element(segment("T1"))?;
        let t2 = layout.add_element(segment("T2"))?;
        let to = layout.add_element(TrackElement::new(
            "TO1",
            ElementKind::Turnout(TurnoutHand::LeftHand),
        ))?;

        layout.connect((t1, 1), (to, 0))?;
        layout.connect_by_name(("TO1", 1), ("T2", 0))?;

        assert_eq!(layout.element_count(), 3);
        assert_eq!(layout.connection_count(), 2);
        assert_eq!(layout.find("T2"), Some(t2));
        assert_eq!(layout.connection_at((to, 1)), Some(Endpoint::new(t2, 0)));
        assert_eq!(layout.connection_at((t2, 0)), Some(Endpoint::new(to, 1)));
        assert_eq!(layout.free_points(to), vec![2]);
        assert_eq!(layout.free_points(t1), vec![0]);

        Ok(())
    }

    #[test]
    fn elements_iterate_in_insertion_order() -> Result<(), LayoutError> {
        let mut layout = LayoutGraph::new();
        for name in ["C", "A", "B"] {
            layout.add_element(segment(name))?;
        }

        let names = layout.elements().map(|(_, e)| e.name()).collect_vec();
        assert_eq!(names, vec!["C", "A", "B"]);

        Ok(())
    }

    #[test]
    fn duplicate_names_are_rejected() -> Result<(), LayoutError> {
        let mut layout = LayoutGraph::new();
        layout.add_element(segment("T1"))?;

        assert_eq!(
            layout.add_element(segment("T1")),
            Err(LayoutError::DuplicateName("T1".to_string()))
        );

        // Unnamed elements never collide.
        layout.add_element(segment(""))?;
        layout.add_element(segment(""))?;
        assert_eq!(layout.element_count(), 3);

        Ok(())
    }

    #[test]
    fn a_point_joins_at_most_one_connection() -> Result<(), LayoutError> {
        let mut layout = LayoutGraph::new();
        let t1 = layout.add_element(segment("T1"))?;
        let t2 = layout.add_element(segment("T2"))?;
        let t3 = layout.add_element(segment("T3"))?;

        layout.connect((t1, 1), (t2, 0))?;

        assert_eq!(
            layout.connect((t3, 0), (t2, 0)),
            Err(LayoutError::PointOccupied {
                element: t2,
                point: 0
            })
        );
        assert_eq!(
            layout.connect((t3, 0), (t3, 0)),
            Err(LayoutError::SelfConnection {
                element: t3,
                point: 0
            })
        );
        assert_eq!(
            layout.connect((t3, 2), (t2, 1)),
            Err(LayoutError::PointOutOfRange {
                element: t3,
                point: 2,
                count: 2
            })
        );
        assert_eq!(
            layout.connect_by_name(("T9", 0), ("T2", 1)),
            Err(LayoutError::UnknownName("T9".to_string()))
        );
        assert_eq!(layout.connection_count(), 1);

        Ok(())
    }

    #[test]
    fn disconnect_frees_both_ends() -> Result<(), LayoutError> {
        let mut layout = LayoutGraph::new();
        let t1 = layout.add_element(segment("T1"))?;
        let t2 = layout.add_element(segment("T2"))?;
        layout.connect((t1, 1), (t2, 0))?;

        assert_eq!(layout.disconnect((t2, 0)), Some(Endpoint::new(t1, 1)));
        assert_eq!(layout.disconnect((t2, 0)), None);
        assert_eq!(layout.free_points(t1), vec![0, 1]);
        assert_eq!(layout.free_points(t2), vec![0, 1]);
        assert_eq!(layout.connection_count(), 0);

        // The freed points can be reused.
        layout.connect((t2, 0), (t1, 1))?;
        assert_eq!(layout.connection_count(), 1);

        Ok(())
    }

    #[test]
    fn removing_an_element_frees_its_neighbours() -> Result<(), LayoutError> {
        let mut layout = LayoutGraph::new();
        let t1 = layout.add_element(segment("T1"))?;
        let t2 = layout.add_element(segment("T2"))?;
        let t3 = layout.add_element(segment("T3"))?;
        layout.connect((t1, 1), (t2, 0))?;
        layout.connect((t2, 1), (t3, 0))?;

        let removed = layout.remove_element(t2);

        assert_eq!(removed.map(|e| e.name().to_string()), Some("T2".to_string()));
        assert_eq!(layout.find("T2"), None);
        assert_eq!(layout.element(t3).map(TrackElement::name), Some("T3"));
        assert_eq!(layout.free_points(t1), vec![0, 1]);
        assert_eq!(layout.free_points(t3), vec![0, 1]);
        assert_eq!(layout.connection_count(), 0);

        Ok(())
    }

    #[test]
    fn an_element_may_loop_onto_itself() -> Result<(), LayoutError> {
        let mut layout = LayoutGraph::new();
        let t1 = layout.add_element(segment("T1"))?;

        layout.connect((t1, 0), (t1, 1))?;

        assert!(layout.free_points(t1).is_empty());
        assert_eq!(layout.connection_at((t1, 0)), Some(Endpoint::new(t1, 1)));

        Ok(())
    }

    #[test]
    fn assigning_blocks_keeps_names_and_points() -> Result<(), LayoutError> {
        let mut layout = LayoutGraph::new();
        let t1 = layout.add_element(segment("T1"))?;
        let t2 = layout.add_element(segment("T2").with_block("X"))?;
        layout.connect((t1, 1), (t2, 0))?;

        layout.assign_block(t1, 0, Some("X".to_string()))?;
        layout.assign_block(t2, 0, None)?;

        assert_eq!(layout.element(t1).and_then(|e| e.block_at_point(1)), Some("X"));
        assert_eq!(layout.element(t2).and_then(|e| e.block_at_point(0)), None);
        assert_eq!(layout.find("T1"), Some(t1));
        assert_eq!(layout.find("T2"), Some(t2));
        assert_eq!(
            layout.element(t1).map(TrackElement::kind),
            Some(&ElementKind::TrackSegment)
        );
        assert_eq!(layout.connection_at((t1, 1)), Some(Endpoint::new(t2, 0)));

        // Names only enter the layout through `add_element`.
        layout.remove_element(t2);
        assert_eq!(
            layout.assign_block(t2, 0, Some("X".to_string())),
            Err(LayoutError::UnknownElement(t2))
        );
        assert_eq!(
            layout.assign_block(t1, 1, Some("X".to_string())),
            Err(LayoutError::LegOutOfRange {
                name: "T1".to_string(),
                leg: 1,
                count: 1
            })
        );
        let again = layout.add_element(segment("T1"));
        assert_eq!(again, Err(LayoutError::DuplicateName("T1".to_string())));

        let names = layout.elements().map(|(_, e)| e.name()).collect_vec();
        assert_eq!(names, vec!["T1"]);

        Ok(())
    }

    #[test]
    fn inconsistent_custom_kinds_are_rejected() {
        let mut layout = LayoutGraph::new();
        let shared = KindDescriptor::new(
            3,
            vec![
                BlockLeg::new("main", [0, 1], true),
                BlockLeg::new("siding", [1, 2], true),
            ],
        );

        let result = layout.add_element(TrackElement::new("W1", ElementKind::Custom(shared)));

        assert!(matches!(result, Err(LayoutError::InvalidKind { ref name, .. }) if name == "W1"));
        assert!(layout.is_empty());
        assert_eq!(layout.find("W1"), None);
    }

    #[test]
    fn ids_display_their_index() -> Result<(), LayoutError> {
        let mut layout = LayoutGraph::new();
        let t1 = layout.add_element(segment("T1"))?;
        let t2 = layout.add_element(segment("T2"))?;

        assert_eq!((t1.index(), t2.index()), (0, 1));
        assert_eq!(t2.to_string(), "#1");
        assert_eq!(
            LayoutError::UnknownElement(t2).to_string(),
            "element #1 is not part of the layout"
        );

        Ok(())
    }
}
