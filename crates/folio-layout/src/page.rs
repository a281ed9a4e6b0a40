//! Page facade over a layout tree.
//!
//! A [`PageLayout`] bundles a tree with its page size and a node id
//! allocator. It is a persistent value: every mutating method returns a new
//! page and leaves `self` untouched. Resolved geometry is computed on first
//! use and memoized for the lifetime of that page value; a mutated page
//! starts with an empty cache, while a no-op returns a clone that keeps it.

use std::fmt;
use std::sync::{Arc, OnceLock};

use folio_core::geometry::{Bounds, Edge, Point};
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace, warn};

use crate::error::LayoutError;
use crate::heuristic::{closest_edge, ratio_at_pointer};
use crate::mutate::{self, NodeIdAllocator};
use crate::node::{ComponentKind, LayoutNode, NodeId, Ratio};
use crate::resolve::{LeafBounds, PageGeometry, resolve};

/// Stable identifier for a page within a sheet.
///
/// `0` is reserved/invalid so ids are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(u64);

impl PageId {
    /// Lowest valid page id.
    pub const MIN: Self = Self(1);

    /// Create a new page id, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, LayoutError> {
        if raw == 0 {
            return Err(LayoutError::ZeroPageId);
        }
        Ok(Self(raw))
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the next id, or an error on overflow.
    pub fn checked_next(self) -> Result<Self, LayoutError> {
        let Some(next) = self.0.checked_add(1) else {
            return Err(LayoutError::PageIdOverflow { current: self });
        };
        Self::new(next)
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page: size, layout tree and lazily resolved geometry.
#[derive(Debug, Clone)]
pub struct PageLayout {
    id: PageId,
    width: u32,
    height: u32,
    tree: Arc<LayoutNode>,
    ids: NodeIdAllocator,
    geometry: OnceLock<Arc<PageGeometry>>,
}

impl PartialEq for PageLayout {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.width == other.width
            && self.height == other.height
            && self.ids == other.ids
            && self.tree == other.tree
    }
}

impl PageLayout {
    /// Fresh page: a single empty leaf covering `width` x `height`.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_id(PageId::MIN, width, height)
    }

    /// Fresh page with an explicit id.
    #[must_use]
    pub fn with_id(id: PageId, width: u32, height: u32) -> Self {
        let root = NodeId::MIN;
        Self::from_parts(
            id,
            width,
            height,
            Arc::new(LayoutNode::placeholder(root)),
            NodeIdAllocator::with_next(root.checked_next().unwrap_or(root)),
        )
    }

    pub(crate) fn from_parts(
        id: PageId,
        width: u32,
        height: u32,
        tree: Arc<LayoutNode>,
        ids: NodeIdAllocator,
    ) -> Self {
        Self {
            id,
            width,
            height,
            tree,
            ids,
            geometry: OnceLock::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> PageId {
        self.id
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Root of the layout tree.
    #[must_use]
    pub fn tree(&self) -> &Arc<LayoutNode> {
        &self.tree
    }

    /// Id the next created node will receive.
    #[must_use]
    pub const fn next_id(&self) -> NodeId {
        self.ids.peek()
    }

    /// Whole page rectangle, origin at the top-left corner.
    #[must_use]
    pub fn area(&self) -> Bounds {
        Bounds::from_size(f64::from(self.width), f64::from(self.height))
    }

    /// Whether the page is still a single empty leaf.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.tree.is_fresh()
    }

    /// Whether [`layout`](Self::layout) has already been computed.
    #[must_use]
    pub fn is_layout_cached(&self) -> bool {
        self.geometry.get().is_some()
    }

    /// Resolved geometry, computed on first call.
    pub fn layout(&self) -> &PageGeometry {
        self.geometry.get_or_init(|| {
            let span = debug_span!(
                "folio.resolve",
                page_id = self.id.get(),
                width = self.width,
                height = self.height,
                leaves = tracing::field::Empty,
                splits = tracing::field::Empty,
            );
            let _guard = span.enter();
            let geometry = resolve(&self.tree, self.area());
            span.record("leaves", geometry.leaves().len());
            span.record("splits", geometry.splits().len());
            Arc::new(geometry)
        })
    }

    /// Resolved rectangles of every leaf, in traversal order.
    pub fn leaves(&self) -> &[LeafBounds] {
        self.layout().leaves()
    }

    /// Bounds of node `id`, leaf or split.
    pub fn bounds_of(&self, id: NodeId) -> Option<Bounds> {
        let geometry = self.layout();
        geometry
            .leaf(id)
            .map(|leaf| leaf.bounds)
            .or_else(|| geometry.split(id).map(|split| split.bounds))
    }

    /// Leaf containing `(x, y)`.
    ///
    /// Edges count as inside. When several leaves contain the point (shared
    /// edges) the deepest wins, then the first in traversal order.
    pub fn node_id_at(&self, x: f64, y: f64) -> Option<NodeId> {
        let point = Point::new(x, y);
        let mut best: Option<&LeafBounds> = None;
        for leaf in self.layout().leaves() {
            if leaf.bounds.contains(point) && best.is_none_or(|found| leaf.depth > found.depth) {
                best = Some(leaf);
            }
        }
        best.map(|leaf| leaf.id)
    }

    /// Edge of leaf `node_id` nearest to `(x, y)`; `None` for unknown ids and
    /// splits.
    pub fn closest_edge(&self, node_id: NodeId, x: f64, y: f64) -> Option<Edge> {
        let leaf = self.layout().leaf(node_id)?;
        Some(closest_edge(Point::new(x, y), &leaf.bounds))
    }

    /// Ratio split `split_id` would take if its divider were dragged to
    /// `(x, y)`.
    pub fn split_ratio_at(&self, split_id: NodeId, x: f64, y: f64) -> Option<Ratio> {
        let split = self.layout().split(split_id)?;
        ratio_at_pointer(&split.bounds, split.axis, Point::new(x, y))
    }

    /// Insert `component` beside `target` on `edge` at an even ratio.
    #[must_use]
    pub fn split_node(
        &self,
        target: NodeId,
        edge: Edge,
        component: impl Into<ComponentKind>,
    ) -> Self {
        self.split_node_with_ratio(target, edge, component, Ratio::HALF)
    }

    /// Insert `component` beside `target` on `edge`; a new split gives the
    /// first child `ratio`.
    #[must_use]
    pub fn split_node_with_ratio(
        &self,
        target: NodeId,
        edge: Edge,
        component: impl Into<ComponentKind>,
        ratio: Ratio,
    ) -> Self {
        let component = component.into();
        let mut ids = self.ids.clone();
        match mutate::split_node(&self.tree, target, edge, &component, ratio, &mut ids) {
            Ok(tree) if Arc::ptr_eq(&tree, &self.tree) => {
                self.unchanged("split_node", target, "not_found")
            }
            Ok(tree) => {
                debug!(
                    op = "split_node",
                    page_id = self.id.get(),
                    node_id = target.get(),
                    edge = edge.as_str(),
                    component = component.as_str(),
                    ratio = ratio.get(),
                    leaves = tree.leaf_count(),
                    "layout updated"
                );
                Self::from_parts(self.id, self.width, self.height, tree, ids)
            }
            Err(err) => {
                warn!(
                    op = "split_node",
                    page_id = self.id.get(),
                    node_id = target.get(),
                    error = %err,
                    "layout update failed"
                );
                self.clone()
            }
        }
    }

    /// Drop `component` onto node `node_id` at `pointer`: the nearest edge of
    /// the node decides where it goes.
    #[must_use]
    pub fn drop_component(
        &self,
        node_id: NodeId,
        pointer: Point,
        component: impl Into<ComponentKind>,
    ) -> Self {
        self.drop_component_with_ratio(node_id, pointer, component, Ratio::HALF)
    }

    /// [`drop_component`](Self::drop_component) with an explicit initial
    /// ratio for the new split.
    #[must_use]
    pub fn drop_component_with_ratio(
        &self,
        node_id: NodeId,
        pointer: Point,
        component: impl Into<ComponentKind>,
        ratio: Ratio,
    ) -> Self {
        let Some(edge) = self.closest_edge(node_id, pointer.x, pointer.y) else {
            let reason = self.miss_reason(node_id, true);
            return self.unchanged("drop_component", node_id, reason);
        };
        self.split_node_with_ratio(node_id, edge, component, ratio)
    }

    /// Set the ratio of split `split_id`, clamped to `[0.1, 0.9]`.
    #[must_use]
    pub fn resize_split(&self, split_id: NodeId, ratio: f64) -> Self {
        let tree = mutate::resize_split(&self.tree, split_id, ratio);
        if Arc::ptr_eq(&tree, &self.tree) {
            let reason = if !ratio.is_finite() {
                "invalid_ratio"
            } else {
                self.miss_reason(split_id, false)
            };
            return self.unchanged("resize_split", split_id, reason);
        }
        debug!(
            op = "resize_split",
            page_id = self.id.get(),
            node_id = split_id.get(),
            ratio,
            "layout updated"
        );
        self.with_tree(tree)
    }

    /// Assign or clear the component of leaf `leaf_id`.
    #[must_use]
    pub fn set_component(&self, leaf_id: NodeId, component: Option<ComponentKind>) -> Self {
        let tree = mutate::set_component(&self.tree, leaf_id, component);
        if Arc::ptr_eq(&tree, &self.tree) {
            let reason = self.miss_reason(leaf_id, true);
            return self.unchanged("set_component", leaf_id, reason);
        }
        debug!(
            op = "set_component",
            page_id = self.id.get(),
            node_id = leaf_id.get(),
            "layout updated"
        );
        self.with_tree(tree)
    }

    /// Remove node `node_id`; its sibling takes over the parent's region.
    #[must_use]
    pub fn remove_node(&self, node_id: NodeId) -> Self {
        let tree = mutate::remove_node(&self.tree, node_id);
        if Arc::ptr_eq(&tree, &self.tree) {
            let reason = if self.tree.id() == node_id {
                "root"
            } else {
                "not_found"
            };
            return self.unchanged("remove_node", node_id, reason);
        }
        debug!(
            op = "remove_node",
            page_id = self.id.get(),
            node_id = node_id.get(),
            leaves = tree.leaf_count(),
            "layout updated"
        );
        self.with_tree(tree)
    }

    /// Swap the children of split `split_id`, keeping their extents.
    #[must_use]
    pub fn swap_children(&self, split_id: NodeId) -> Self {
        let tree = mutate::swap_children(&self.tree, split_id);
        if Arc::ptr_eq(&tree, &self.tree) {
            let reason = self.miss_reason(split_id, false);
            return self.unchanged("swap_children", split_id, reason);
        }
        debug!(
            op = "swap_children",
            page_id = self.id.get(),
            node_id = split_id.get(),
            "layout updated"
        );
        self.with_tree(tree)
    }

    /// Same tree on a page of a different size.
    #[must_use]
    pub fn resize_page(&self, width: u32, height: u32) -> Self {
        if width == self.width && height == self.height {
            trace!(
                op = "resize_page",
                page_id = self.id.get(),
                reason = "unchanged",
                "layout update skipped"
            );
            return self.clone();
        }
        debug!(
            op = "resize_page",
            page_id = self.id.get(),
            width,
            height,
            "layout updated"
        );
        Self::from_parts(
            self.id,
            width,
            height,
            Arc::clone(&self.tree),
            self.ids.clone(),
        )
    }

    /// Fresh page with the same id and size.
    #[must_use]
    pub fn cleared(&self) -> Self {
        debug!(op = "reset_page", page_id = self.id.get(), "layout updated");
        Self::with_id(self.id, self.width, self.height)
    }

    fn with_tree(&self, tree: Arc<LayoutNode>) -> Self {
        Self::from_parts(self.id, self.width, self.height, tree, self.ids.clone())
    }

    pub(crate) const fn allocator(&self) -> &NodeIdAllocator {
        &self.ids
    }

    fn miss_reason(&self, id: NodeId, wants_leaf: bool) -> &'static str {
        match self.tree.find_by_id(id) {
            None => "not_found",
            Some(node) if node.is_leaf() != wants_leaf => {
                if wants_leaf { "not_a_leaf" } else { "not_a_split" }
            }
            Some(_) => "unchanged",
        }
    }

    fn unchanged(&self, op: &'static str, node_id: NodeId, reason: &'static str) -> Self {
        trace!(
            op,
            page_id = self.id.get(),
            node_id = node_id.get(),
            reason,
            "layout update skipped"
        );
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{MAX_RATIO, MIN_RATIO};
    use folio_core::geometry::SplitAxis;

    fn id(raw: u64) -> NodeId {
        NodeId::new(raw).expect("test id must be non-zero")
    }

    /// abilities | skills on a letter page.
    fn two_column() -> PageLayout {
        PageLayout::new(816, 1056)
            .split_node(id(1), Edge::Right, "abilities")
            .split_node(id(1), Edge::Right, "skills")
    }

    #[test]
    fn page_id_rejects_zero() {
        assert_eq!(PageId::new(0), Err(LayoutError::ZeroPageId));
        let last = PageId::new(u64::MAX).expect("non-zero");
        assert_eq!(
            last.checked_next(),
            Err(LayoutError::PageIdOverflow { current: last })
        );
    }

    #[test]
    fn fresh_page_is_one_empty_leaf() {
        let page = PageLayout::new(816, 1056);
        assert!(page.is_fresh());
        assert_eq!(page.next_id(), id(2));
        let leaves = page.leaves();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].bounds, Bounds::from_size(816.0, 1056.0));
        assert_eq!(leaves[0].component, None);
    }

    #[test]
    fn first_drop_fills_then_split_divides() {
        let filled = PageLayout::new(816, 1056).split_node(id(1), Edge::Right, "abilities");
        assert_eq!(filled.tree().leaf_count(), 1);
        assert_eq!(filled.next_id(), id(2));

        let page = filled.split_node(id(1), Edge::Right, "skills");
        let split = page.tree().as_split().expect("root split");
        assert_eq!(split.axis, SplitAxis::Horizontal);
        assert_eq!(split.ratio, Ratio::HALF);
        let kinds: Vec<&str> = page
            .leaves()
            .iter()
            .filter_map(|leaf| leaf.component.as_ref().map(ComponentKind::as_str))
            .collect();
        assert_eq!(kinds, vec!["abilities", "skills"]);
        for leaf in page.leaves() {
            assert_eq!(leaf.bounds.width, 408.0);
            assert_eq!(leaf.bounds.height, 1056.0);
        }
    }

    #[test]
    fn layout_is_memoized_and_mutation_clears_it() {
        let page = two_column();
        assert!(!page.is_layout_cached());
        let first: *const PageGeometry = page.layout();
        assert!(page.is_layout_cached());
        let second: *const PageGeometry = page.layout();
        assert_eq!(first, second);

        let root = page.tree().id();
        let resized = page.resize_split(root, 0.25);
        assert!(!resized.is_layout_cached());
        assert!(page.is_layout_cached(), "old value keeps its cache");
        assert_eq!(resized.leaves()[0].bounds.width, 204.0);
        assert_eq!(page.leaves()[0].bounds.width, 408.0);
    }

    #[test]
    fn noops_keep_cache_and_value() {
        let page = two_column();
        let _ = page.layout();
        let root = page.tree().id();
        for same in [
            page.resize_split(id(99), 0.3),
            page.resize_split(id(1), 0.3),
            page.resize_split(root, 0.5),
            page.resize_split(root, f64::NAN),
            page.split_node(id(99), Edge::Top, "x"),
            page.set_component(root, None),
            page.remove_node(root),
            page.swap_children(id(1)),
            page.resize_page(816, 1056),
        ] {
            assert_eq!(same, page);
            assert!(same.is_layout_cached());
            assert!(Arc::ptr_eq(same.tree(), page.tree()));
        }
    }

    #[test]
    fn resize_split_clamps() {
        let page = two_column();
        let root = page.tree().id();
        let wide = page.resize_split(root, 1.5);
        assert_eq!(wide.tree().as_split().map(|s| s.ratio.get()), Some(MAX_RATIO));
        let narrow = page.resize_split(root, -1.0);
        assert_eq!(narrow.tree().as_split().map(|s| s.ratio.get()), Some(MIN_RATIO));
    }

    #[test]
    fn node_id_at_prefers_deepest_then_first() {
        let page = two_column().split_node(id(2), Edge::Bottom, "notes");
        // Right column now holds skills over notes.
        assert_eq!(page.node_id_at(100.0, 500.0), Some(id(1)));
        assert_eq!(page.node_id_at(600.0, 100.0), Some(id(2)));
        assert_eq!(page.node_id_at(600.0, 900.0), Some(id(4)));
        // On the shared vertical divider both sides have different depths.
        assert_eq!(page.node_id_at(408.0, 100.0), Some(id(2)));
        // Same depth on both sides of the horizontal divider: first wins.
        assert_eq!(page.node_id_at(600.0, 528.0), Some(id(2)));
        assert_eq!(page.node_id_at(-1.0, 0.0), None);
        assert_eq!(page.node_id_at(0.0, 1056.0), Some(id(1)));
    }

    #[test]
    fn closest_edge_uses_resolved_bounds() {
        let page = two_column();
        assert_eq!(page.closest_edge(id(2), 810.0, 528.0), Some(Edge::Right));
        assert_eq!(page.closest_edge(id(2), 412.0, 528.0), Some(Edge::Left));
        assert_eq!(page.closest_edge(id(1), 204.0, 1000.0), Some(Edge::Bottom));
        assert_eq!(page.closest_edge(id(42), 0.0, 0.0), None);
        let root = page.tree().id();
        assert_eq!(page.closest_edge(root, 408.0, 2.0), None);
    }

    #[test]
    fn drop_component_splits_at_nearest_edge() {
        let page = two_column().drop_component(id(2), Point::new(612.0, 1050.0), "notes");
        let inner = page
            .tree()
            .find_by_id(id(5))
            .and_then(LayoutNode::as_split)
            .expect("new split around skills");
        assert_eq!(inner.axis, SplitAxis::Vertical);
        assert_eq!(inner.first.id(), id(2));
        assert_eq!(inner.second.id(), id(4));

        let missed = page.drop_component(id(42), Point::new(0.0, 0.0), "x");
        assert_eq!(missed, page);
    }

    #[test]
    fn drop_on_split_is_ignored() {
        let page = two_column();
        let root = page.tree().id();
        let dropped = page.drop_component(root, Point::new(408.0, 2.0), "notes");
        assert!(Arc::ptr_eq(dropped.tree(), page.tree()));
        assert_eq!(dropped.leaves().len(), 2);
    }

    #[test]
    fn split_ratio_at_follows_pointer() {
        let page = two_column();
        let root = page.tree().id();
        assert_eq!(
            page.split_ratio_at(root, 204.0, 10.0).map(Ratio::get),
            Some(0.25)
        );
        assert_eq!(
            page.split_ratio_at(root, 5000.0, 10.0).map(Ratio::get),
            Some(MAX_RATIO)
        );
        assert_eq!(page.split_ratio_at(id(1), 0.0, 0.0), None);
    }

    #[test]
    fn remove_and_swap_round_out_editing() {
        let page = two_column();
        let removed = page.remove_node(id(1));
        assert_eq!(removed.tree().leaf_count(), 1);
        assert_eq!(removed.leaves()[0].bounds, Bounds::from_size(816.0, 1056.0));

        let root = page.tree().id();
        let swapped = page.resize_split(root, 0.25).swap_children(root);
        let first = &swapped.leaves()[0];
        assert_eq!(first.id, id(2));
        assert_eq!(first.bounds.width, 612.0);
    }

    #[test]
    fn resize_page_rescales_geometry() {
        let page = two_column().resize_page(400, 300);
        assert_eq!(page.area(), Bounds::from_size(400.0, 300.0));
        assert_eq!(page.leaves()[1].bounds, Bounds::new(200.0, 0.0, 200.0, 300.0));
    }

    #[test]
    fn cleared_page_keeps_id_and_size() {
        let page = PageLayout::with_id(PageId::new(7).expect("non-zero"), 500, 700)
            .split_node(id(1), Edge::Left, "a")
            .split_node(id(1), Edge::Left, "b");
        let cleared = page.cleared();
        assert!(cleared.is_fresh());
        assert_eq!(cleared.id().get(), 7);
        assert_eq!((cleared.width(), cleared.height()), (500, 700));
    }
}
