//! Geometry resolution for split trees.
//!
//! Turns a [`LayoutNode`] tree plus a page area into absolute bounds for every
//! leaf and split. Each split hands `ratio` of its extent along its axis to
//! the first child and the rest to the second; the cross extent is inherited
//! unchanged. Leaves take whatever their parent hands down.
//!
//! A split's rectangle is recovered as the union of its children's leaf
//! rectangles, so the tree never stores derived geometry.
//!
//! Arithmetic is plain `f64` with no intermediate rounding. A zero-sized page
//! yields zero-area rectangles rather than an error.
//!
//! Complexity:
//! - Time: `O(node_count)` (single DFS over the tree)
//! - Space: `O(node_count)` (output vectors and leaf index)

use folio_core::geometry::{Bounds, SplitAxis};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::node::{ComponentKind, LayoutNode, NodeId, Ratio};

/// Solved rectangle for one leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafBounds {
    pub id: NodeId,
    pub bounds: Bounds,
    pub component: Option<ComponentKind>,
    /// Number of split ancestors.
    pub depth: usize,
}

/// Solved rectangle for one split, used to place its divider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitBounds {
    pub id: NodeId,
    pub axis: SplitAxis,
    pub ratio: Ratio,
    pub bounds: Bounds,
    pub depth: usize,
    /// First leaf under this split; renderers key divider handles on it.
    pub anchor: NodeId,
}

impl SplitBounds {
    /// Divider strip of `thickness` centred on the boundary between children.
    #[must_use]
    pub fn divider(&self, thickness: f64) -> Bounds {
        let half = thickness / 2.0;
        let b = self.bounds;
        match self.axis {
            SplitAxis::Horizontal => {
                let line = b.left + b.width * self.ratio.get();
                Bounds::new(line - half, b.top, thickness, b.height)
            }
            SplitAxis::Vertical => {
                let line = b.top + b.height * self.ratio.get();
                Bounds::new(b.left, line - half, b.width, thickness)
            }
        }
    }
}

/// Resolved geometry of a whole page.
#[derive(Debug, Clone, Default)]
pub struct PageGeometry {
    area: Bounds,
    leaves: Vec<LeafBounds>,
    splits: Vec<SplitBounds>,
    leaf_index: FxHashMap<NodeId, usize>,
}

impl PageGeometry {
    /// Page area the tree was resolved into.
    #[must_use]
    pub const fn area(&self) -> Bounds {
        self.area
    }

    /// Leaf rectangles in traversal order.
    #[must_use]
    pub fn leaves(&self) -> &[LeafBounds] {
        &self.leaves
    }

    /// Split rectangles in pre-order (parents before children).
    #[must_use]
    pub fn splits(&self) -> &[SplitBounds] {
        &self.splits
    }

    /// Lookup a leaf by id.
    #[must_use]
    pub fn leaf(&self, id: NodeId) -> Option<&LeafBounds> {
        self.leaf_index.get(&id).map(|&idx| &self.leaves[idx])
    }

    /// Lookup a split by id.
    #[must_use]
    pub fn split(&self, id: NodeId) -> Option<&SplitBounds> {
        self.splits.iter().find(|split| split.id == id)
    }
}

impl PartialEq for PageGeometry {
    fn eq(&self, other: &Self) -> bool {
        self.area == other.area && self.leaves == other.leaves && self.splits == other.splits
    }
}

/// Resolve `tree` into absolute bounds inside `area`.
#[must_use]
pub fn resolve(tree: &LayoutNode, area: Bounds) -> PageGeometry {
    let mut geometry = PageGeometry {
        area,
        ..PageGeometry::default()
    };
    resolve_node(tree, area, 0, &mut geometry);
    geometry.leaf_index = geometry
        .leaves
        .iter()
        .enumerate()
        .map(|(idx, leaf)| (leaf.id, idx))
        .collect();
    geometry
}

/// Returns the union of the leaf rectangles below `node`.
fn resolve_node(node: &LayoutNode, area: Bounds, depth: usize, out: &mut PageGeometry) -> Bounds {
    let split = match node {
        LayoutNode::Leaf(leaf) => {
            out.leaves.push(LeafBounds {
                id: leaf.id,
                bounds: area,
                component: leaf.component.clone(),
                depth,
            });
            return area;
        }
        LayoutNode::Split(split) => split,
    };

    // Reserve the slot so splits stay in pre-order; bounds are filled in
    // once both children are resolved.
    let slot = out.splits.len();
    out.splits.push(SplitBounds {
        id: split.id,
        axis: split.axis,
        ratio: split.ratio,
        bounds: area,
        depth,
        anchor: node.first_leaf_id(),
    });

    let (first_area, second_area) = area.split(split.axis, split.ratio.get());
    let first = resolve_node(&split.first, first_area, depth + 1, out);
    let second = resolve_node(&split.second, second_area, depth + 1, out);
    let bounds = first.union(&second);
    out.splits[slot].bounds = bounds;
    bounds
}
