use std::{
    cmp::Reverse,
    collections::{BTreeMap, BTreeSet, HashMap, hash_map::Entry},
};

use log::{debug, trace};
use petgraph::unionfind::UnionFind;
use trackcheck_core::{Connection, ElementId, Endpoint, LayoutGraph};

use crate::{BlockHighlight, Config, Detail, Finding, FindingKind};

/// Finds blocks whose members do not form a single connected region.
///
/// Uses the default [`Config`]. See [`check_non_contiguous_blocks_with`].
#[must_use]
pub fn check_non_contiguous_blocks(layout: &LayoutGraph) -> Vec<Finding> {
    check_non_contiguous_blocks_with(layout, &Config::default())
}

/// Finds blocks whose members do not form a single connected region.
///
/// Two members of a block are adjacent when a connection joins them and the
/// block is carried at both joined points. Elements that merely touch a
/// block from a different block do not bridge it. Blockless elements such
/// as anchors are transparent: members reached across a chain of them are
/// adjacent when they carry the same block at the points they reach.
///
/// Works in one pass over the whole layout: every `(element, block)` pair is
/// a union-find vertex, each same-block connection unions two vertices, and
/// the regions of a block are the distinct roots among its vertices.
/// Findings are sorted by block name.
#[must_use]
pub fn check_non_contiguous_blocks_with(layout: &LayoutGraph, config: &Config) -> Vec<Finding> {
    debug!(
        "checking {} elements and {} connections for non-contiguous blocks",
        layout.element_count(),
        layout.connection_count()
    );

    let index = BlockIndex::build(layout);
    let mut regions = UnionFind::new(index.owners.len());
    for connection in layout.connections() {
        if let Some((a, b)) = index.same_block_vertices(layout, connection) {
            regions.union(a, b);
        }
    }
    index.join_through_blockless(layout, &mut regions);

    let findings: Vec<Finding> = index
        .blocks
        .iter()
        .filter_map(|(&block, vertices)| {
            let components = index.components(&regions, vertices);
            trace!("block `{block}` has {} region(s)", components.len());
            (components.len() > 1).then(|| block_finding(block, components, config))
        })
        .collect();

    debug!("found {} non-contiguous blocks", findings.len());
    findings
}

/// Union-find vertices for every `(element, block)` pair in a layout.
///
/// An element carrying the same block on several legs is a single vertex.
struct BlockIndex<'a> {
    vertices: HashMap<(ElementId, &'a str), usize>,
    /// Element name of each vertex, `None` when the element is unnamed.
    owners: Vec<Option<&'a str>>,
    /// Vertices of each block, keyed in sorted order.
    blocks: BTreeMap<&'a str, Vec<usize>>,
}

impl<'a> BlockIndex<'a> {
    fn build(layout: &'a LayoutGraph) -> Self {
        let mut index = Self {
            vertices: HashMap::new(),
            owners: Vec::new(),
            blocks: BTreeMap::new(),
        };

        for (id, element) in layout.elements() {
            let owner = element.has_name().then(|| element.name());
            for block in element.block_names() {
                let vertex = index.owners.len();
                index.owners.push(owner);
                index.vertices.insert((id, block), vertex);
                index.blocks.entry(block).or_default().push(vertex);
            }
        }

        index
    }

    /// Returns the block carried at an endpoint and its vertex.
    fn vertex_at(&self, layout: &'a LayoutGraph, endpoint: Endpoint) -> Option<(&'a str, usize)> {
        let block = layout
            .element(endpoint.element)?
            .block_at_point(endpoint.point)?;
        let vertex = self.vertices.get(&(endpoint.element, block))?;
        Some((block, *vertex))
    }

    /// Returns the two vertices a connection joins, if both ends carry the
    /// same block.
    fn same_block_vertices(
        &self,
        layout: &'a LayoutGraph,
        connection: &Connection,
    ) -> Option<(usize, usize)> {
        let (block_a, a) = self.vertex_at(layout, connection.a)?;
        let (block_b, b) = self.vertex_at(layout, connection.b)?;
        (block_a == block_b).then_some((a, b))
    }

    /// Unions same-block vertices that reach one cluster of connected
    /// blockless elements.
    fn join_through_blockless(&self, layout: &'a LayoutGraph, regions: &mut UnionFind<usize>) {
        let joints: HashMap<ElementId, usize> = layout
            .elements()
            .filter(|(_, element)| element.kind().descriptor().is_blockless())
            .enumerate()
            .map(|(joint, (id, _))| (id, joint))
            .collect();
        if joints.is_empty() {
            return;
        }

        let mut clusters = UnionFind::new(joints.len());
        for connection in layout.connections() {
            let a = joints.get(&connection.a.element);
            let b = joints.get(&connection.b.element);
            if let (Some(&a), Some(&b)) = (a, b) {
                clusters.union(a, b);
            }
        }

        let mut reached: HashMap<(usize, &'a str), usize> = HashMap::new();
        for connection in layout.connections() {
            let ends = [(connection.a, connection.b), (connection.b, connection.a)];
            for (joint_end, track_end) in ends {
                let Some(&joint) = joints.get(&joint_end.element) else {
                    continue;
                };
                let Some((block, vertex)) = self.vertex_at(layout, track_end) else {
                    continue;
                };
                match reached.entry((clusters.find(joint), block)) {
                    Entry::Occupied(first) => {
                        regions.union(*first.get(), vertex);
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(vertex);
                    }
                }
            }
        }
    }

    /// Groups a block's vertices into regions of named members.
    ///
    /// Larger regions come first; ties are broken by the smallest name.
    fn components(
        &self,
        regions: &UnionFind<usize>,
        vertices: &[usize],
    ) -> Vec<BTreeSet<String>> {
        let mut by_root: HashMap<usize, BTreeSet<String>> = HashMap::new();
        for &vertex in vertices {
            let members = by_root.entry(regions.find(vertex)).or_default();
            if let Some(name) = self.owners[vertex] {
                members.insert(name.to_string());
            }
        }

        let mut components: Vec<BTreeSet<String>> = by_root.into_values().collect();
        components.sort_by(|a, b| {
            (Reverse(a.len()), a.first()).cmp(&(Reverse(b.len()), b.first()))
        });
        components
    }
}

fn block_finding(block: &str, components: Vec<BTreeSet<String>>, config: &Config) -> Finding {
    let elements = match config.block_highlight {
        BlockHighlight::AllMembers => components.iter().flatten().cloned().collect(),
        BlockHighlight::StrayComponents => components.iter().skip(1).flatten().cloned().collect(),
    };

    Finding {
        kind: FindingKind::NonContiguousBlock,
        name: block.to_string(),
        elements,
        detail: Detail::Components(components),
    }
}
