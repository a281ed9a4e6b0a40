#![forbid(unsafe_code)]

//! folio public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports the geometry and layout types from the internal crates and
//! offers a lightweight prelude for day-to-day usage.
//!
//! ```
//! use folio::prelude::*;
//!
//! let mut sheet = SheetLayout::default();
//! let page_id = sheet.pages()[0].id();
//! sheet.drop_component(page_id, NodeId::MIN, Point::new(0.0, 0.0), "abilities");
//! sheet.drop_component(page_id, NodeId::MIN, Point::new(815.0, 500.0), "skills");
//! let page = sheet.page_by_id(page_id).expect("page exists");
//! assert_eq!(page.leaves().len(), 2);
//! ```

use std::fmt;

// --- Geometry re-exports ---------------------------------------------------

pub use folio_core::geometry::{Bounds, Edge, Point, SplitAxis};

// --- Layout re-exports -----------------------------------------------------

pub use folio_layout::{
    ComponentKind, Divider, LayoutNode, LayoutPolicy, LeafBounds, NodeId, PageConfig,
    PageGeometry, PageId, PageLayout, Ratio, SheetConfig, SheetLayout, SplitBounds,
    SplitPlacement,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for folio callers.
#[derive(Debug)]
pub enum Error {
    /// Malformed snapshot or exhausted id space.
    Layout(folio_layout::LayoutError),
    /// Policy file could not be read, parsed or validated.
    Config(folio_layout::PolicyConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layout(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Layout(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<folio_layout::LayoutError> for Error {
    fn from(err: folio_layout::LayoutError) -> Self {
        Self::Layout(err)
    }
}

impl From<folio_layout::PolicyConfigError> for Error {
    fn from(err: folio_layout::PolicyConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for folio APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Restore a sheet from its snapshot with `policy`.
pub fn load_sheet(config: SheetConfig, policy: LayoutPolicy) -> Result<SheetLayout> {
    let policy = policy.validated()?;
    Ok(SheetLayout::from_config(config, policy)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Bounds, ComponentKind, Edge, Error, LayoutPolicy, NodeId, PageId, PageLayout, Point,
        Result, SheetLayout, SplitAxis,
    };

    pub use crate::{core, layout};
}

pub use folio_core as core;
pub use folio_layout as layout;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_sheet_reports_both_error_kinds() {
        let sheet = SheetLayout::default();

        let bad_policy = LayoutPolicy {
            page_width: 0,
            ..LayoutPolicy::default()
        };
        let err = load_sheet(sheet.to_config(), bad_policy).expect_err("invalid policy");
        assert!(matches!(err, Error::Config(_)));

        let mut config = sheet.to_config();
        config.pages.clear();
        let err = load_sheet(config, LayoutPolicy::default()).expect_err("empty sheet");
        assert!(matches!(
            err,
            Error::Layout(folio_layout::LayoutError::EmptySheet)
        ));
        assert_eq!(err.to_string(), "sheet must contain at least one page");
    }

    #[test]
    fn load_sheet_round_trips_through_json() {
        let mut sheet = SheetLayout::default();
        let page_id = sheet.pages()[0].id();
        sheet.drop_component(page_id, NodeId::MIN, Point::new(0.0, 0.0), "abilities");
        let json = serde_json::to_string(&sheet.to_config()).expect("serialize");
        let config: SheetConfig = serde_json::from_str(&json).expect("deserialize");
        let restored = load_sheet(config, LayoutPolicy::default()).expect("valid");
        assert_eq!(restored, sheet);
    }
}
