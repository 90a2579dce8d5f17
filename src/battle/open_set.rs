//! Search nodes and the A* open set
//!
//! Path nodes live in an index-addressed arena with integer parent links.
//! The open set pairs a binary heap with a key -> node map so membership and
//! "is the new route cheaper" checks never scan the heap.

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::battle::hex::{AxialCoord, HexKey};

pub type NodeIndex = usize;

/// One search record
#[derive(Debug, Clone, PartialEq)]
pub struct PathNode {
    pub coord: AxialCoord,
    pub g: f32,
    pub h: f32,
    pub f: f32,
    pub parent: Option<NodeIndex>,
}

impl PathNode {
    pub fn new(coord: AxialCoord, g: f32, h: f32, parent: Option<NodeIndex>) -> Self {
        Self {
            coord,
            g,
            h,
            f: g + h,
            parent,
        }
    }
}

/// Arena of path nodes for a single search
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<PathNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: PathNode) -> NodeIndex {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn get(&self, index: NodeIndex) -> Option<&PathNode> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk parent links back to the root, returned root-first
    pub fn reconstruct(&self, index: NodeIndex) -> Vec<AxialCoord> {
        let mut path = Vec::new();
        let mut current = Some(index);
        while let Some(i) = current {
            let Some(node) = self.nodes.get(i) else {
                break;
            };
            path.push(node.coord);
            current = node.parent;
        }
        path.reverse();
        path
    }
}

/// Heap entry for the open set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    f: OrderedFloat<f32>,
    coord: AxialCoord,
    node: NodeIndex,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap: lowest f, then lowest q, then lowest r
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.coord.q.cmp(&self.coord.q))
            .then_with(|| other.coord.r.cmp(&self.coord.r))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-ordered open set over path nodes with keyed membership.
///
/// Ordering is fixed rather than caller-supplied: lowest f, then lowest q,
/// then lowest r, then earliest insertion. This is the search's tie-break.
///
/// Superseded heap entries are skipped lazily on `pop`; only the entry
/// registered in `live` for a key is ever returned.
#[derive(Debug, Default)]
pub struct OpenSet {
    heap: BinaryHeap<OpenEntry>,
    live: AHashMap<HexKey, NodeIndex>,
}

impl OpenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: HexKey) -> bool {
        self.live.contains_key(&key)
    }

    /// Node currently open at `key`, if any
    pub fn get(&self, key: HexKey) -> Option<NodeIndex> {
        self.live.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Open `node`, or replace the open entry at the same position when the
    /// new g is strictly lower. Returns the node index when it was accepted.
    pub fn push_or_improve(&mut self, arena: &mut NodeArena, node: PathNode) -> Option<NodeIndex> {
        let key = node.coord.key();
        if let Some(existing) = self.live.get(&key).and_then(|&i| arena.get(i)) {
            if existing.g <= node.g {
                return None;
            }
        }

        let entry = OpenEntry {
            f: OrderedFloat(node.f),
            coord: node.coord,
            node: 0,
        };
        let index = arena.push(node);
        self.live.insert(key, index);
        self.heap.push(OpenEntry { node: index, ..entry });
        Some(index)
    }

    /// Remove and return the lowest-ordered open node
    pub fn pop(&mut self) -> Option<NodeIndex> {
        while let Some(entry) = self.heap.pop() {
            let key = entry.coord.key();
            if self.live.get(&key) == Some(&entry.node) {
                self.live.remove(&key);
                return Some(entry.node);
            }
        }
        None
    }
}
