//! Errors for layout construction.
//!
//! Interaction-time misses (stale ids, out-of-range ratios, resizing a leaf)
//! are never errors: the operations return their input unchanged. The
//! variants here cover malformed snapshots and exhausted id spaces, which
//! indicate a caller bug.

use std::fmt;

use crate::node::NodeId;
use crate::page::PageId;
use crate::snapshot::PAGE_CONFIG_SCHEMA_VERSION;

/// Validation errors for layout construction.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    ZeroNodeId,
    ZeroPageId,
    UnsupportedSchemaVersion { version: u16 },
    DuplicateNodeId { node_id: NodeId },
    DuplicatePageId { page_id: PageId },
    InvalidRatio { value: f64 },
    NodeIdOverflow { current: NodeId },
    PageIdOverflow { current: PageId },
    EmptySheet,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroNodeId => write!(f, "layout node id 0 is invalid"),
            Self::ZeroPageId => write!(f, "page id 0 is invalid"),
            Self::UnsupportedSchemaVersion { version } => write!(
                f,
                "unsupported layout schema version {version} (expected {})",
                PAGE_CONFIG_SCHEMA_VERSION
            ),
            Self::DuplicateNodeId { node_id } => {
                write!(f, "duplicate layout node id {}", node_id.get())
            }
            Self::DuplicatePageId { page_id } => write!(f, "duplicate page id {}", page_id.get()),
            Self::InvalidRatio { value } => {
                write!(f, "split ratio {value} is not a finite number")
            }
            Self::NodeIdOverflow { current } => {
                write!(f, "layout node id overflow after {}", current.get())
            }
            Self::PageIdOverflow { current } => {
                write!(f, "page id overflow after {}", current.get())
            }
            Self::EmptySheet => write!(f, "sheet must contain at least one page"),
        }
    }
}

impl std::error::Error for LayoutError {}
