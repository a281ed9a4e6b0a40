#![forbid(unsafe_code)]

//! Core: geometry primitives shared by the folio layout engine.
//!
//! # Role in folio
//! `folio-core` is the leaf of the dependency graph. It owns the rectangle,
//! point, edge and axis types that the layout tree, its geometry resolver and
//! the pointer heuristics all speak in. It has no knowledge of trees or pages.

pub mod geometry;

pub use geometry::{Bounds, Edge, Point, SplitAxis};
