#![forbid(unsafe_code)]

//! Page layout trees for folio.
//!
//! A page is partitioned by a persistent binary tree: leaves hold at most one
//! component, splits divide their region in two along one axis at a clamped
//! ratio. On top of the tree this crate provides:
//!
//! - [`resolve`](resolve::resolve): proportional geometry for every leaf and
//!   split.
//! - [`mutate`]: structural-sharing edits (split, resize, remove, swap).
//! - [`heuristic`]: the nearest-edge rule that places drops, and the divider
//!   drag mapping.
//! - [`PageLayout`] / [`SheetLayout`]: persistent facades with a geometry
//!   cache, snapshots and a [`LayoutPolicy`].
//!
//! # Example
//!
//! ```
//! use folio_core::geometry::Edge;
//! use folio_layout::{NodeId, PageLayout};
//!
//! let root = NodeId::MIN;
//! let page = PageLayout::new(816, 1056)
//!     .split_node(root, Edge::Right, "abilities")
//!     .split_node(root, Edge::Right, "skills");
//! let widths: Vec<f64> = page.leaves().iter().map(|leaf| leaf.bounds.width).collect();
//! assert_eq!(widths, vec![408.0, 408.0]);
//! ```
//!
//! Interaction-time misses (stale ids, resizing a leaf, ratios out of range)
//! never fail: they return the input unchanged or clamp. Errors are reserved
//! for malformed snapshots and exhausted id spaces.

pub mod error;
pub mod heuristic;
pub mod mutate;
pub mod node;
pub mod page;
pub mod policy;
pub mod resolve;
pub mod sheet;
pub mod snapshot;

pub use error::LayoutError;
pub use heuristic::{SplitPlacement, closest_edge, ratio_at_pointer, split_placement};
pub use mutate::NodeIdAllocator;
pub use node::{
    ComponentKind, DEFAULT_RATIO, LayoutNode, Leaf, MAX_RATIO, MIN_RATIO, NodeId, Ratio, Split,
};
pub use page::{PageId, PageLayout};
pub use policy::{LayoutPolicy, PolicyConfigError};
pub use resolve::{LeafBounds, PageGeometry, SplitBounds, resolve};
pub use sheet::{Divider, SheetLayout};
pub use snapshot::{PAGE_CONFIG_SCHEMA_VERSION, PageConfig, SheetConfig};
