//! Pure tree mutations with structural sharing.
//!
//! Every function takes a root `Arc<LayoutNode>` and returns a root. When the
//! request cannot apply (unknown id, wrong node kind, nothing to change) the
//! input `Arc` itself is returned, so callers can detect no-ops with
//! [`Arc::ptr_eq`]. Otherwise only the ancestors of the changed node are
//! rebuilt; all other subtrees are shared with the input tree.

use std::sync::Arc;

use folio_core::geometry::Edge;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::node::{ComponentKind, LayoutNode, Leaf, NodeId, Ratio, Split};

/// Deterministic allocator for node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIdAllocator {
    next: NodeId,
}

impl NodeIdAllocator {
    /// Start allocating from a known id.
    #[must_use]
    pub const fn with_next(next: NodeId) -> Self {
        Self { next }
    }

    /// Allocator that continues after the largest id in `tree`.
    pub fn after(tree: &LayoutNode) -> Result<Self, LayoutError> {
        Ok(Self {
            next: tree.max_id().checked_next()?,
        })
    }

    /// Peek at the next id without consuming.
    #[must_use]
    pub const fn peek(&self) -> NodeId {
        self.next
    }

    /// Allocate the next id and advance.
    pub fn allocate(&mut self) -> Result<NodeId, LayoutError> {
        let current = self.next;
        self.next = self.next.checked_next()?;
        Ok(current)
    }
}

/// Replace the node with `id` by whatever `replace` returns.
///
/// Descends into the first child before the second; once a replacement
/// bubbles up it is spliced in and the search stops, so at most one
/// root-to-node path is rebuilt. Returns `None` if `id` is absent or
/// `replace` declined.
pub fn replace_node_by_id<F>(
    root: &Arc<LayoutNode>,
    id: NodeId,
    mut replace: F,
) -> Option<Arc<LayoutNode>>
where
    F: FnMut(&Arc<LayoutNode>) -> Option<Arc<LayoutNode>>,
{
    replace_in(root, id, &mut replace)
}

fn replace_in<F>(node: &Arc<LayoutNode>, id: NodeId, replace: &mut F) -> Option<Arc<LayoutNode>>
where
    F: FnMut(&Arc<LayoutNode>) -> Option<Arc<LayoutNode>>,
{
    if node.id() == id {
        return replace(node);
    }
    let LayoutNode::Split(split) = node.as_ref() else {
        return None;
    };
    if let Some(first) = replace_in(&split.first, id, replace) {
        return Some(Arc::new(LayoutNode::Split(Split {
            first,
            second: Arc::clone(&split.second),
            ..split.clone()
        })));
    }
    let second = replace_in(&split.second, id, replace)?;
    Some(Arc::new(LayoutNode::Split(Split {
        first: Arc::clone(&split.first),
        second,
        ..split.clone()
    })))
}

/// Insert `component` beside node `target` on `edge`.
///
/// An empty placeholder leaf is filled in place, keeping its id, with no
/// split introduced. Any other target is wrapped in a new split at `ratio`
/// together with a fresh leaf: `Top`/`Bottom` split vertically,
/// `Left`/`Right` horizontally, and `Bottom`/`Right` put the new leaf second.
///
/// Unknown `target` returns the input unchanged. Ids are drawn from `ids`
/// only when a split is actually created.
pub fn split_node(
    tree: &Arc<LayoutNode>,
    target: NodeId,
    edge: Edge,
    component: &ComponentKind,
    ratio: Ratio,
    ids: &mut NodeIdAllocator,
) -> Result<Arc<LayoutNode>, LayoutError> {
    let mut failure = None;
    let replaced = replace_node_by_id(tree, target, |node| {
        if let LayoutNode::Leaf(leaf) = node.as_ref()
            && leaf.is_placeholder()
        {
            return Some(Arc::new(LayoutNode::leaf(leaf.id, Some(component.clone()))));
        }
        match wrap_with_new_leaf(node, edge, component, ratio, ids) {
            Ok(split) => Some(split),
            Err(err) => {
                failure = Some(err);
                None
            }
        }
    });
    if let Some(err) = failure {
        return Err(err);
    }
    Ok(replaced.unwrap_or_else(|| Arc::clone(tree)))
}

fn wrap_with_new_leaf(
    existing: &Arc<LayoutNode>,
    edge: Edge,
    component: &ComponentKind,
    ratio: Ratio,
    ids: &mut NodeIdAllocator,
) -> Result<Arc<LayoutNode>, LayoutError> {
    let leaf_id = ids.allocate()?;
    let split_id = ids.allocate()?;
    let incoming = Arc::new(LayoutNode::leaf(leaf_id, Some(component.clone())));
    let (first, second) = if edge.is_after() {
        (Arc::clone(existing), incoming)
    } else {
        (incoming, Arc::clone(existing))
    };
    Ok(Arc::new(LayoutNode::split(
        split_id,
        edge.axis(),
        ratio,
        first,
        second,
    )))
}

/// Set the ratio of split `split_id`, clamped into range.
///
/// Unknown ids, leaves, non-finite ratios and unchanged ratios all return
/// the input tree itself.
#[must_use]
pub fn resize_split(tree: &Arc<LayoutNode>, split_id: NodeId, ratio: f64) -> Arc<LayoutNode> {
    let Some(ratio) = Ratio::new(ratio) else {
        return Arc::clone(tree);
    };
    replace_node_by_id(tree, split_id, |node| {
        let split = node.as_split()?;
        if split.ratio == ratio {
            return None;
        }
        Some(Arc::new(LayoutNode::Split(Split {
            ratio,
            ..split.clone()
        })))
    })
    .unwrap_or_else(|| Arc::clone(tree))
}

/// Replace the component of leaf `leaf_id`; `None` turns it back into a
/// placeholder.
#[must_use]
pub fn set_component(
    tree: &Arc<LayoutNode>,
    leaf_id: NodeId,
    component: Option<ComponentKind>,
) -> Arc<LayoutNode> {
    replace_node_by_id(tree, leaf_id, |node| {
        let leaf = node.as_leaf()?;
        if leaf.component == component {
            return None;
        }
        Some(Arc::new(LayoutNode::Leaf(Leaf {
            id: leaf.id,
            component: component.clone(),
        })))
    })
    .unwrap_or_else(|| Arc::clone(tree))
}

/// Remove node `node_id` and promote its sibling into the parent's place.
///
/// The root cannot be removed; a page always keeps a tree.
#[must_use]
pub fn remove_node(tree: &Arc<LayoutNode>, node_id: NodeId) -> Arc<LayoutNode> {
    let Some(parent) = tree.parent_of(node_id) else {
        return Arc::clone(tree);
    };
    let parent_id = parent.id;
    replace_node_by_id(tree, parent_id, |node| {
        node.as_split()?.sibling_of(node_id).map(Arc::clone)
    })
    .unwrap_or_else(|| Arc::clone(tree))
}

/// Exchange the children of split `split_id`.
///
/// The ratio is mirrored so each child keeps its extent and only the order
/// changes.
#[must_use]
pub fn swap_children(tree: &Arc<LayoutNode>, split_id: NodeId) -> Arc<LayoutNode> {
    replace_node_by_id(tree, split_id, |node| {
        let split = node.as_split()?;
        Some(Arc::new(LayoutNode::Split(Split {
            id: split.id,
            axis: split.axis,
            ratio: split.ratio.mirrored(),
            first: Arc::clone(&split.second),
            second: Arc::clone(&split.first),
        })))
    })
    .unwrap_or_else(|| Arc::clone(tree))
}
