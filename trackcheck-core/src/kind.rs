use std::{borrow::Cow, collections::BTreeSet};

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

/// Labels for the connection points of fixed-arity kinds.
const POINT_LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// The family a track element belongs to.
///
/// Each kind decides how many connection points an element has and which
/// groups of those points carry a block assignment. Checkers never match on
/// the kind directly; they consult its [`KindDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum ElementKind {
    /// A plain piece of track joining two points.
    TrackSegment,
    /// A joint between two segments. Carries no block of its own; the blocks
    /// on either side meet through it.
    Anchor,
    /// The end of a line. Carries no block.
    EndBumper,
    /// A link to a neighbouring panel. Carries no block.
    EdgeConnector,
    /// A three-ended turnout.
    Turnout(TurnoutHand),
    /// A four-ended crossover with a block per end.
    Crossover(CrossoverType),
    /// A four-ended slip switch.
    Slip(SlipType),
    /// Two tracks crossing at grade, each with its own block.
    LevelCrossing,
    /// A turntable with one connection point per ray track.
    Turntable { rays: usize },
    /// A caller-defined kind.
    Custom(KindDescriptor),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum TurnoutHand {
    RightHand,
    LeftHand,
    Wye,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum CrossoverType {
    Double,
    RightHand,
    LeftHand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum SlipType {
    Single,
    Double,
}

/// A group of connection points that share one block assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct BlockLeg {
    pub label: String,
    pub points: Vec<usize>,
    pub required: bool,
}

impl BlockLeg {
    #[must_use]
    pub fn new(label: impl Into<String>, points: impl Into<Vec<usize>>, required: bool) -> Self {
        Self {
            label: label.into(),
            points: points.into(),
            required,
        }
    }

    /// Returns `true` if this leg covers the given connection point.
    #[must_use]
    pub fn covers(&self, point: usize) -> bool {
        self.points.contains(&point)
    }
}

/// Arity and block layout of an element kind.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct KindDescriptor {
    pub connection_point_count: usize,
    pub block_legs: Vec<BlockLeg>,
}

impl KindDescriptor {
    #[must_use]
    pub fn new(connection_point_count: usize, block_legs: Vec<BlockLeg>) -> Self {
        Self {
            connection_point_count,
            block_legs,
        }
    }

    /// A descriptor whose points all share a single required block.
    #[must_use]
    pub fn single_block(connection_point_count: usize) -> Self {
        let points: Vec<usize> = (0..connection_point_count).collect();
        Self::new(
            connection_point_count,
            vec![BlockLeg::new("block", points, true)],
        )
    }

    /// A descriptor with connection points but no block-bearing legs.
    #[must_use]
    pub fn blockless(connection_point_count: usize) -> Self {
        Self::new(connection_point_count, Vec::new())
    }

    /// Returns the index of the first leg covering `point`, if any.
    #[must_use]
    pub fn leg_for_point(&self, point: usize) -> Option<usize> {
        self.block_legs.iter().position(|leg| leg.covers(point))
    }

    /// Returns the connection points that must carry a block assignment.
    #[must_use]
    pub fn required_block_points(&self) -> BTreeSet<usize> {
        self.block_legs
            .iter()
            .filter(|leg| leg.required)
            .flat_map(|leg| leg.points.iter().copied())
            .collect()
    }

    /// Returns `true` if no leg of this kind carries a block.
    ///
    /// Blockless elements are transparent to contiguity: neighbours in the
    /// same block touch through them.
    #[must_use]
    pub fn is_blockless(&self) -> bool {
        self.block_legs.is_empty()
    }

    /// Checks that every leg covers existing points and no point is shared.
    ///
    /// # Errors
    ///
    /// Returns a static message describing the first problem found.
    pub fn validate(&self) -> Result<(), &'static str> {
        let mut seen = BTreeSet::new();
        for point in self.block_legs.iter().flat_map(|leg| leg.points.iter()) {
            if *point >= self.connection_point_count {
                return Err("a block leg covers a connection point the kind does not have");
            }
            if !seen.insert(*point) {
                return Err("a connection point is covered by more than one block leg");
            }
        }
        Ok(())
    }
}

impl ElementKind {
    /// Returns the descriptor for this kind.
    ///
    /// Built-in kinds produce an owned descriptor; custom kinds lend theirs.
    #[must_use]
    pub fn descriptor(&self) -> Cow<'_, KindDescriptor> {
        let descriptor = match self {
            Self::TrackSegment => KindDescriptor::single_block(2),
            Self::Anchor => KindDescriptor::blockless(2),
            Self::EndBumper | Self::EdgeConnector => KindDescriptor::blockless(1),
            Self::Turnout(_) => KindDescriptor::single_block(3),
            Self::Crossover(_) => KindDescriptor::new(
                4,
                (0..4)
                    .map(|point| BlockLeg::new(POINT_LABELS[point], [point], true))
                    .collect(),
            ),
            Self::Slip(_) => KindDescriptor::single_block(4),
            Self::LevelCrossing => KindDescriptor::new(
                4,
                vec![
                    BlockLeg::new("AC", [0, 2], true),
                    BlockLeg::new("BD", [1, 3], true),
                ],
            ),
            Self::Turntable { rays } => KindDescriptor::single_block(*rays),
            Self::Custom(descriptor) => return Cow::Borrowed(descriptor),
        };
        Cow::Owned(descriptor)
    }

    /// Returns the number of connection points of this kind.
    #[must_use]
    pub fn connection_point_count(&self) -> usize {
        match self {
            Self::TrackSegment | Self::Anchor => 2,
            Self::EndBumper | Self::EdgeConnector => 1,
            Self::Turnout(_) => 3,
            Self::Crossover(_) | Self::Slip(_) | Self::LevelCrossing => 4,
            Self::Turntable { rays } => *rays,
            Self::Custom(descriptor) => descriptor.connection_point_count,
        }
    }

    /// Returns a human-readable label for a connection point.
    ///
    /// Turntable rays are labelled `ray N`; everything else uses `A` to `D`
    /// and falls back to the bare index.
    #[must_use]
    pub fn point_label(&self, point: usize) -> String {
        match self {
            Self::Turntable { .. } => format!("ray {point}"),
            _ => POINT_LABELS
                .get(point)
                .map_or_else(|| point.to_string(), |label| (*label).to_string()),
        }
    }
}
