use trackcheck_core::{ElementId, ElementKind, LayoutError, LayoutGraph, TrackElement, TurnoutHand};

/// A plain segment in the given block.
#[must_use]
pub fn segment(name: &str, block: &str) -> TrackElement {
    TrackElement::new(name, ElementKind::TrackSegment).with_block(block)
}

/// Adds segments in a line, joining each one's `B` end to the next one's `A` end.
///
/// # Errors
///
/// Returns an error if a name is already used in `layout`.
pub fn line(
    layout: &mut LayoutGraph,
    segments: &[(&str, &str)],
) -> Result<Vec<ElementId>, LayoutError> {
    let ids = segments
        .iter()
        .map(|(name, block)| layout.add_element(segment(name, block)))
        .collect::<Result<Vec<_>, _>>()?;

    for pair in ids.windows(2) {
        layout.connect((pair[0], 1), (pair[1], 0))?;
    }

    Ok(ids)
}

/// A small, defect-free yard.
///
/// ```text
///  EB_W ── T1 ── TO1 ── T2 ── XING ── T3 ── EB_E        (Main)
///                  \           │
///                   S1 ── S2   B1 / B2 ── bumpers      (Siding, Branch)
///                          \
///                           EB_S
/// ```
///
/// The turnout, the main segments and the `A`/`C` leg of the level crossing
/// are in `Main`. The crossing's `B`/`D` leg and the two branch segments are
/// in `Branch`. The siding is its own block. Every point is connected.
///
/// # Errors
///
/// Never fails for a fresh layout; errors are propagated for uniformity.
pub fn yard() -> Result<LayoutGraph, LayoutError> {
    let mut layout = LayoutGraph::new();

    for name in ["EB_W", "EB_E", "EB_S", "EB_N", "EB_X"] {
        layout.add_element(TrackElement::new(name, ElementKind::EndBumper))?;
    }
    for (name, block) in [
        ("T1", "Main"),
        ("T2", "Main"),
        ("T3", "Main"),
        ("S1", "Siding"),
        ("S2", "Siding"),
        ("B1", "Branch"),
        ("B2", "Branch"),
    ] {
        layout.add_element(segment(name, block))?;
    }
    layout.add_element(
        TrackElement::new("TO1", ElementKind::Turnout(TurnoutHand::RightHand)).with_block("Main"),
    )?;
    layout.add_element(
        TrackElement::new("XING", ElementKind::LevelCrossing)
            .with_leg_block(0, "Main")?
            .with_leg_block(1, "Branch")?,
    )?;

    for (a, b) in [
        (("EB_W", 0), ("T1", 0)),
        (("T1", 1), ("TO1", 0)),
        (("TO1", 1), ("T2", 0)),
        (("T2", 1), ("XING", 0)),
        (("XING", 2), ("T3", 0)),
        (("T3", 1), ("EB_E", 0)),
        (("TO1", 2), ("S1", 0)),
        (("S1", 1), ("S2", 0)),
        (("S2", 1), ("EB_S", 0)),
        (("XING", 1), ("B1", 1)),
        (("B1", 0), ("EB_N", 0)),
        (("XING", 3), ("B2", 0)),
        (("B2", 1), ("EB_X", 0)),
    ] {
        layout.connect_by_name(a, b)?;
    }

    Ok(layout)
}
