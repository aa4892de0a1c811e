use std::collections::BTreeSet;

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::{ElementKind, LayoutError};

/// A node in the layout graph.
///
/// An element owns its name, its kind, and one optional block name per block
/// leg of that kind. Connections live in the [`LayoutGraph`], not here.
///
/// A blank name marks the element as unnamed. Unnamed elements still take
/// part in connectivity but can never be reported by name.
///
/// [`LayoutGraph`]: crate::LayoutGraph
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct TrackElement {
    name: String,
    kind: ElementKind,
    blocks: Vec<Option<String>>,
}

impl TrackElement {
    /// Creates an element with every block leg unassigned.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        let legs = kind.descriptor().block_legs.len();
        Self {
            name: name.into(),
            kind,
            blocks: vec![None; legs],
        }
    }

    /// Returns `self` with every block leg assigned to `block`.
    #[must_use]
    pub fn with_block(mut self, block: impl Into<String>) -> Self {
        let block = normalize(block.into());
        self.blocks.iter_mut().for_each(|slot| slot.clone_from(&block));
        self
    }

    /// Returns `self` with a single block leg assigned to `block`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::LegOutOfRange`] if the kind has no such leg.
    pub fn with_leg_block(
        mut self,
        leg: usize,
        block: impl Into<String>,
    ) -> Result<Self, LayoutError> {
        self.assign_block(leg, Some(block.into()))?;
        Ok(self)
    }

    /// Assigns or clears the block of one leg.
    ///
    /// A blank block name clears the assignment.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::LegOutOfRange`] if the kind has no such leg.
    pub fn assign_block(&mut self, leg: usize, block: Option<String>) -> Result<(), LayoutError> {
        let count = self.blocks.len();
        let slot = self.blocks.get_mut(leg).ok_or_else(|| LayoutError::LegOutOfRange {
            name: self.name.clone(),
            leg,
            count,
        })?;
        *slot = block.and_then(normalize);
        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` unless the name is empty or only whitespace.
    #[must_use]
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    #[must_use]
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    #[must_use]
    pub fn connection_point_count(&self) -> usize {
        self.kind.connection_point_count()
    }

    /// Returns the block assigned to a leg, if any.
    #[must_use]
    pub fn block_at_leg(&self, leg: usize) -> Option<&str> {
        self.blocks.get(leg)?.as_deref()
    }

    /// Returns the block carried at a connection point, if any.
    #[must_use]
    pub fn block_at_point(&self, point: usize) -> Option<&str> {
        let leg = self.kind.descriptor().leg_for_point(point)?;
        self.block_at_leg(leg)
    }

    /// Returns the distinct block names on this element, in leg order.
    pub fn block_names(&self) -> impl Iterator<Item = &str> {
        let mut seen = BTreeSet::new();
        self.blocks
            .iter()
            .flatten()
            .map(String::as_str)
            .filter(move |block| seen.insert(*block))
    }

    /// Returns the required legs that have no block assigned.
    #[must_use]
    pub fn unassigned_required_legs(&self) -> Vec<usize> {
        self.kind
            .descriptor()
            .block_legs
            .iter()
            .enumerate()
            .filter(|(leg, descriptor)| descriptor.required && self.block_at_leg(*leg).is_none())
            .map(|(leg, _)| leg)
            .collect()
    }
}

/// Maps blank block names to `None`.
fn normalize(block: String) -> Option<String> {
    if block.trim().is_empty() { None } else { Some(block) }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{BlockLeg, CrossoverType, KindDescriptor, TurnoutHand};

    #[test]
    fn new_element_has_no_blocks() {
        let turnout = TrackElement::new("TO1", ElementKind::Turnout(TurnoutHand::RightHand));

        assert_eq!(turnout.block_names().count(), 0);
        assert_eq!(turnout.unassigned_required_legs(), vec![0]);
        assert_eq!(turnout.block_at_point(2), None);
    }

    #[test]
    fn with_block_fills_every_leg() {
        let crossover =
            TrackElement::new("X1", ElementKind::Crossover(CrossoverType::Double)).with_block("B7");

        for point in 0..4 {
            assert_eq!(crossover.block_at_point(point), Some("B7"));
        }
        assert_eq!(crossover.block_names().collect::<Vec<_>>(), vec!["B7"]);
        assert!(crossover.unassigned_required_legs().is_empty());
    }

    #[test]
    fn block_names_are_distinct_in_leg_order() -> Result<(), LayoutError> {
        let crossover = TrackElement::new("X2", ElementKind::Crossover(CrossoverType::LeftHand))
            .with_leg_block(0, "North")?
            .with_leg_block(1, "South")?
            .with_leg_block(2, "North")?;

        assert_eq!(
            crossover.block_names().collect::<Vec<_>>(),
            vec!["North", "South"]
        );
        assert_eq!(crossover.unassigned_required_legs(), vec![3]);
        Ok(())
    }

    #[test]
    fn blank_block_clears_assignment() -> Result<(), LayoutError> {
        let mut segment = TrackElement::new("T1", ElementKind::TrackSegment).with_block("B1");
        segment.assign_block(0, Some("  ".to_string()))?;

        assert_eq!(segment.block_at_leg(0), None);
        assert_eq!(segment.unassigned_required_legs(), vec![0]);
        Ok(())
    }

    #[test]
    fn leg_out_of_range() {
        let mut anchor = TrackElement::new("A1", ElementKind::Anchor);

        assert_eq!(
            anchor.assign_block(0, Some("B1".to_string())),
            Err(LayoutError::LegOutOfRange {
                name: "A1".to_string(),
                leg: 0,
                count: 0,
            })
        );
    }

    #[test]
    fn optional_legs_never_count_as_unassigned() -> Result<(), LayoutError> {
        let kind = ElementKind::Custom(KindDescriptor::new(
            3,
            vec![
                BlockLeg::new("main", [0, 1], true),
                BlockLeg::new("siding", [2], false),
            ],
        ));
        let element = TrackElement::new("C1", kind).with_block("Main");
        let mut partial = element.clone();
        partial.assign_block(1, None)?;

        assert!(element.unassigned_required_legs().is_empty());
        assert!(partial.unassigned_required_legs().is_empty());
        assert_eq!(partial.block_at_point(2), None);
        Ok(())
    }

    #[test]
    fn names() {
        assert!(TrackElement::new("T1", ElementKind::TrackSegment).has_name());
        assert!(!TrackElement::new("", ElementKind::TrackSegment).has_name());
        assert!(!TrackElement::new(" \t", ElementKind::TrackSegment).has_name());
    }
}
