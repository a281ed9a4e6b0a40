//! Pointer heuristics for drops and divider drags.
//!
//! A drop over a region inserts the new component beside the edge whose
//! midpoint is nearest to the pointer. Distance is compared squared, and
//! exact ties resolve in [`Edge::ALL`] order (`Top`, `Bottom`, `Left`,
//! `Right`) so the outcome never depends on iteration incidentals.

use folio_core::geometry::{Bounds, Edge, Point, SplitAxis};

use crate::node::Ratio;

/// Where a dropped component goes relative to the hovered region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPlacement {
    pub edge: Edge,
    pub axis: SplitAxis,
    /// New content becomes the second child (right/bottom).
    pub is_after: bool,
}

impl SplitPlacement {
    #[must_use]
    pub const fn from_edge(edge: Edge) -> Self {
        Self {
            edge,
            axis: edge.axis(),
            is_after: edge.is_after(),
        }
    }
}

/// Edge of `bounds` whose midpoint is closest to `pointer`.
#[must_use]
pub fn closest_edge(pointer: Point, bounds: &Bounds) -> Edge {
    let mut best = Edge::Top;
    let mut best_distance = f64::INFINITY;
    for edge in Edge::ALL {
        let distance = bounds.edge_midpoint(edge).distance_squared(pointer);
        if distance < best_distance {
            best = edge;
            best_distance = distance;
        }
    }
    best
}

/// Full placement for a drop at `pointer` over `bounds`.
#[must_use]
pub fn split_placement(pointer: Point, bounds: &Bounds) -> SplitPlacement {
    SplitPlacement::from_edge(closest_edge(pointer, bounds))
}

/// Ratio implied by dragging a split's divider to `pointer`.
///
/// `None` when the split has no extent along `axis`.
#[must_use]
pub fn ratio_at_pointer(bounds: &Bounds, axis: SplitAxis, pointer: Point) -> Option<Ratio> {
    let extent = axis.extent(bounds);
    if extent <= 0.0 {
        return None;
    }
    Ratio::new((axis.coordinate(pointer) - axis.origin(bounds)) / extent)
}
