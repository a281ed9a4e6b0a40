//! Persistent binary split tree.
//!
//! A page is partitioned by a strictly binary tree of [`LayoutNode`]s. Splits
//! hold their children behind [`Arc`], so a mutation rebuilds only the path
//! from the root to the changed node and every other subtree is shared by
//! reference with the previous version (see [`crate::mutate`]).
//!
//! Invariants, upheld by construction:
//!
//! - Node ids are unique within one tree.
//! - A split has exactly two children (the type has no other shape).
//! - Every ratio lies in `[MIN_RATIO, MAX_RATIO]` ([`Ratio`] clamps).
//! - A tree that is a single empty leaf is the canonical fresh page.
//!
//! This module is read-only; all mutation lives in [`crate::mutate`].

use std::fmt;
use std::sync::Arc;

use folio_core::geometry::SplitAxis;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Smallest share a split may give its first child.
pub const MIN_RATIO: f64 = 0.1;

/// Largest share a split may give its first child.
pub const MAX_RATIO: f64 = 0.9;

/// Ratio used for newly created splits.
pub const DEFAULT_RATIO: f64 = 0.5;

/// Stable identifier for layout nodes.
///
/// `0` is reserved/invalid so ids are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Lowest valid node id.
    pub const MIN: Self = Self(1);

    /// Create a new node id, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, LayoutError> {
        if raw == 0 {
            return Err(LayoutError::ZeroNodeId);
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
            return Err(LayoutError::NodeIdOverflow { current: self });
        };
        Self::new(next)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of the component placed in a leaf.
///
/// The engine never interprets it; the rendering layer validates kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentKind(String);

impl ComponentKind {
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

impl From<String> for ComponentKind {
    fn from(kind: String) -> Self {
        Self(kind)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Share of a split's extent given to its first child.
///
/// Always within `[MIN_RATIO, MAX_RATIO]`: out-of-range inputs are clamped,
/// never rejected. Non-finite inputs are not ratios at all.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Ratio(f64);

impl Ratio {
    /// The even split used for new splits.
    pub const HALF: Self = Self(DEFAULT_RATIO);

    /// Clamp `value` into range. Returns `None` for NaN or infinities.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Some(Self(value.clamp(MIN_RATIO, MAX_RATIO)))
    }

    /// Raw fraction.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Share of the second child.
    #[must_use]
    pub fn complement(self) -> f64 {
        1.0 - self.0
    }

    /// The ratio that gives the same extents with children swapped.
    #[must_use]
    pub fn mirrored(self) -> Self {
        Self((1.0 - self.0).clamp(MIN_RATIO, MAX_RATIO))
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Self::HALF
    }
}

impl TryFrom<f64> for Ratio {
    type Error = LayoutError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(LayoutError::InvalidRatio { value })
    }
}

impl From<Ratio> for f64 {
    fn from(ratio: Ratio) -> Self {
        ratio.0
    }
}

/// Unpartitioned region holding at most one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    pub id: NodeId,
    /// `None` marks an unfilled placeholder.
    #[serde(default)]
    pub component: Option<ComponentKind>,
}

impl Leaf {
    /// Whether this leaf is an unfilled placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.component.is_none()
    }
}

/// Region divided in two along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub id: NodeId,
    pub axis: SplitAxis,
    pub ratio: Ratio,
    /// Left child for horizontal splits, top child for vertical ones.
    pub first: Arc<LayoutNode>,
    pub second: Arc<LayoutNode>,
}

impl Split {
    /// The child that is not `child_id`, if `child_id` is a direct child.
    #[must_use]
    pub fn sibling_of(&self, child_id: NodeId) -> Option<&Arc<LayoutNode>> {
        if self.first.id() == child_id {
            Some(&self.second)
        } else if self.second.id() == child_id {
            Some(&self.first)
        } else {
            None
        }
    }
}

/// Node payload variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutNode {
    Leaf(Leaf),
    Split(Split),
}

impl LayoutNode {
    /// Build a leaf.
    #[must_use]
    pub fn leaf(id: NodeId, component: Option<ComponentKind>) -> Self {
        Self::Leaf(Leaf { id, component })
    }

    /// Build an unfilled placeholder leaf.
    #[must_use]
    pub fn placeholder(id: NodeId) -> Self {
        Self::leaf(id, None)
    }

    /// Build a split over two children.
    #[must_use]
    pub fn split(
        id: NodeId,
        axis: SplitAxis,
        ratio: Ratio,
        first: impl Into<Arc<LayoutNode>>,
        second: impl Into<Arc<LayoutNode>>,
    ) -> Self {
        Self::Split(Split {
            id,
            axis,
            ratio,
            first: first.into(),
            second: second.into(),
        })
    }

    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::Leaf(leaf) => leaf.id,
            Self::Split(split) => split.id,
        }
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    #[must_use]
    pub const fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Split(_) => None,
        }
    }

    #[must_use]
    pub const fn as_split(&self) -> Option<&Split> {
        match self {
            Self::Split(split) => Some(split),
            Self::Leaf(_) => None,
        }
    }

    /// Whether this tree is the canonical fresh page: one empty leaf.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Leaf(leaf) if leaf.is_placeholder())
    }

    /// Depth-first search, first child before second. Ids are unique, so the
    /// first match is the only one.
    #[must_use]
    pub fn find_by_id(&self, id: NodeId) -> Option<&LayoutNode> {
        if self.id() == id {
            return Some(self);
        }
        match self {
            Self::Leaf(_) => None,
            Self::Split(split) => split
                .first
                .find_by_id(id)
                .or_else(|| split.second.find_by_id(id)),
        }
    }

    /// Id of the leaf reached by always descending into the first child.
    #[must_use]
    pub fn first_leaf_id(&self) -> NodeId {
        let mut node = self;
        loop {
            match node {
                Self::Leaf(leaf) => return leaf.id,
                Self::Split(split) => node = split.first.as_ref(),
            }
        }
    }

    /// The split whose direct child has `id`.
    #[must_use]
    pub fn parent_of(&self, id: NodeId) -> Option<&Split> {
        let Self::Split(split) = self else {
            return None;
        };
        if split.sibling_of(id).is_some() {
            return Some(split);
        }
        split
            .first
            .parent_of(id)
            .or_else(|| split.second.parent_of(id))
    }

    /// Number of split ancestors of node `id`.
    #[must_use]
    pub fn depth_of(&self, id: NodeId) -> Option<usize> {
        self.walk()
            .find(|(_, node)| node.id() == id)
            .map(|(depth, _)| depth)
    }

    /// Pre-order traversal yielding `(depth, node)`, first child before second.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }

    /// Leaves in traversal order.
    pub fn leaves(&self) -> impl Iterator<Item = &Leaf> + '_ {
        self.walk().filter_map(|(_, node)| node.as_leaf())
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    #[must_use]
    pub fn split_count(&self) -> usize {
        self.walk().filter(|(_, node)| !node.is_leaf()).count()
    }

    /// Largest id in the tree.
    #[must_use]
    pub fn max_id(&self) -> NodeId {
        self.walk()
            .map(|(_, node)| node.id())
            .max()
            .unwrap_or(NodeId::MIN)
    }
}

/// Pre-order iterator over a layout tree.
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    stack: Vec<(usize, &'a LayoutNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a LayoutNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        if let LayoutNode::Split(split) = node {
            self.stack.push((depth + 1, split.second.as_ref()));
            self.stack.push((depth + 1, split.first.as_ref()));
        }
        Some((depth, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> NodeId {
        NodeId::new(raw).expect("test id must be non-zero")
    }

    fn leaf(raw: u64, kind: &str) -> LayoutNode {
        LayoutNode::leaf(id(raw), Some(ComponentKind::from(kind)))
    }

    /// ```text
    /// 5: H 0.5
    /// ├── 1 "abilities"
    /// └── 4: V 0.3
    ///     ├── 2 "skills"
    ///     └── 3 "notes"
    /// ```
    fn nested() -> LayoutNode {
        let inner = LayoutNode::split(
            id(4),
            SplitAxis::Vertical,
            Ratio::new(0.3).expect("finite"),
            leaf(2, "skills"),
            leaf(3, "notes"),
        );
        LayoutNode::split(
            id(5),
            SplitAxis::Horizontal,
            Ratio::HALF,
            leaf(1, "abilities"),
            inner,
        )
    }

    #[test]
    fn node_id_rejects_zero() {
        assert_eq!(NodeId::new(0), Err(LayoutError::ZeroNodeId));
        assert_eq!(NodeId::MIN.get(), 1);
    }

    #[test]
    fn node_id_overflow_is_reported() {
        let last = id(u64::MAX);
        assert_eq!(
            last.checked_next(),
            Err(LayoutError::NodeIdOverflow { current: last })
        );
    }

    #[test]
    fn ratio_clamps_silently() {
        assert_eq!(Ratio::new(1.5).map(Ratio::get), Some(MAX_RATIO));
        assert_eq!(Ratio::new(-1.0).map(Ratio::get), Some(MIN_RATIO));
        assert_eq!(Ratio::new(0.42).map(Ratio::get), Some(0.42));
        assert_eq!(Ratio::new(f64::NAN), None);
        assert_eq!(Ratio::new(f64::INFINITY), None);
    }

    #[test]
    fn ratio_mirror_round_trips() {
        let ratio = Ratio::new(0.3).expect("finite");
        assert!((ratio.mirrored().get() - 0.7).abs() < 1e-12);
        assert!((ratio.mirrored().mirrored().get() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn find_by_id_searches_first_child_first() {
        let tree = nested();
        assert_eq!(tree.find_by_id(id(5)).map(LayoutNode::id), Some(id(5)));
        assert_eq!(tree.find_by_id(id(3)).map(LayoutNode::id), Some(id(3)));
        assert!(tree.find_by_id(id(99)).is_none());
    }

    #[test]
    fn first_leaf_descends_first_children() {
        let tree = nested();
        assert_eq!(tree.first_leaf_id(), id(1));
        let inner = tree.find_by_id(id(4)).expect("inner split");
        assert_eq!(inner.first_leaf_id(), id(2));
    }

    #[test]
    fn walk_is_preorder_with_depths() {
        let tree = nested();
        let order: Vec<(usize, u64)> = tree
            .walk()
            .map(|(depth, node)| (depth, node.id().get()))
            .collect();
        assert_eq!(order, vec![(0, 5), (1, 1), (1, 4), (2, 2), (2, 3)]);
    }

    #[test]
    fn counts_and_max_id() {
        let tree = nested();
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.split_count(), 2);
        assert_eq!(tree.max_id(), id(5));
        let kinds: Vec<&str> = tree
            .leaves()
            .filter_map(|leaf| leaf.component.as_ref().map(ComponentKind::as_str))
            .collect();
        assert_eq!(kinds, vec!["abilities", "skills", "notes"]);
    }

    #[test]
    fn parent_and_depth_lookup() {
        let tree = nested();
        assert_eq!(tree.parent_of(id(3)).map(|s| s.id), Some(id(4)));
        assert_eq!(tree.parent_of(id(4)).map(|s| s.id), Some(id(5)));
        assert!(tree.parent_of(id(5)).is_none());
        assert_eq!(tree.depth_of(id(3)), Some(2));
        assert_eq!(tree.depth_of(id(5)), Some(0));
        assert_eq!(tree.depth_of(id(42)), None);
    }

    #[test]
    fn fresh_state_is_single_empty_leaf() {
        assert!(LayoutNode::placeholder(id(1)).is_fresh());
        assert!(!leaf(1, "skills").is_fresh());
        assert!(!nested().is_fresh());
    }

    #[test]
    fn serde_shape_is_tagged() {
        let json = serde_json::to_value(nested()).expect("serialize");
        assert_eq!(json["type"], "split");
        assert_eq!(json["axis"], "horizontal");
        assert_eq!(json["ratio"], 0.5);
        assert_eq!(json["first"]["type"], "leaf");
        assert_eq!(json["first"]["component"], "abilities");
    }

    #[test]
    fn serde_clamps_ratio_on_load() {
        let json = r#"{"type":"split","id":3,"axis":"vertical","ratio":1.7,
            "first":{"type":"leaf","id":1},"second":{"type":"leaf","id":2}}"#;
        let node: LayoutNode = serde_json::from_str(json).expect("valid node");
        let split = node.as_split().expect("split");
        assert_eq!(split.ratio.get(), MAX_RATIO);
        assert!(split.first.is_fresh());
    }
}
