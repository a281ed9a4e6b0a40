//! Serializable page and sheet snapshots.
//!
//! A snapshot is a structural copy of the tree plus enough bookkeeping to
//! resume id allocation. Loading validates ids and the schema version; ratios
//! are clamped by [`Ratio`](crate::node::Ratio) during deserialization.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::mutate::NodeIdAllocator;
use crate::node::{LayoutNode, NodeId};
use crate::page::{PageId, PageLayout};

/// Current page snapshot schema version.
pub const PAGE_CONFIG_SCHEMA_VERSION: u16 = 1;

const fn default_schema_version() -> u16 {
    PAGE_CONFIG_SCHEMA_VERSION
}

/// Serializable form of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    pub id: PageId,
    pub width: u32,
    pub height: u32,
    /// Next node id to allocate. Derived from the tree when absent or stale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_id: Option<NodeId>,
    pub tree: LayoutNode,
}

impl PageConfig {
    /// Check the snapshot and return the allocator a restored page resumes
    /// with.
    pub fn validate(&self) -> Result<NodeIdAllocator, LayoutError> {
        if self.schema_version != PAGE_CONFIG_SCHEMA_VERSION {
            return Err(LayoutError::UnsupportedSchemaVersion {
                version: self.schema_version,
            });
        }
        if self.id.get() == 0 {
            return Err(LayoutError::ZeroPageId);
        }
        let mut seen = FxHashSet::default();
        for (_, node) in self.tree.walk() {
            let node_id = node.id();
            if node_id.get() == 0 {
                return Err(LayoutError::ZeroNodeId);
            }
            if !seen.insert(node_id) {
                return Err(LayoutError::DuplicateNodeId { node_id });
            }
        }
        let floor = NodeIdAllocator::after(&self.tree)?;
        Ok(match self.next_id {
            Some(next) if next > floor.peek() => NodeIdAllocator::with_next(next),
            _ => floor,
        })
    }
}

/// Serializable form of a whole sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    /// Next page id to allocate. Derived from the pages when absent or stale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_id: Option<PageId>,
    pub pages: Vec<PageConfig>,
}

impl SheetConfig {
    /// Check every page plus sheet-level constraints and return the page id
    /// a restored sheet allocates next.
    pub fn validate(&self) -> Result<PageId, LayoutError> {
        if self.schema_version != PAGE_CONFIG_SCHEMA_VERSION {
            return Err(LayoutError::UnsupportedSchemaVersion {
                version: self.schema_version,
            });
        }
        if self.pages.is_empty() {
            return Err(LayoutError::EmptySheet);
        }
        let mut seen = FxHashSet::default();
        let mut max_page = PageId::MIN;
        for page in &self.pages {
            if !seen.insert(page.id) {
                return Err(LayoutError::DuplicatePageId { page_id: page.id });
            }
            page.validate()?;
            max_page = max_page.max(page.id);
        }
        let floor = max_page.checked_next()?;
        Ok(match self.next_page_id {
            Some(next) if next > floor => next,
            _ => floor,
        })
    }
}

impl PageLayout {
    /// Export to snapshot form. Subtrees are shared, not deep-copied.
    #[must_use]
    pub fn to_config(&self) -> PageConfig {
        PageConfig {
            schema_version: PAGE_CONFIG_SCHEMA_VERSION,
            id: self.id(),
            width: self.width(),
            height: self.height(),
            next_id: Some(self.allocator().peek()),
            tree: self.tree().as_ref().clone(),
        }
    }

    /// Construct and validate from a snapshot, preserving every node id.
    pub fn from_config(config: PageConfig) -> Result<Self, LayoutError> {
        let ids = config.validate()?;
        Ok(Self::from_parts(
            config.id,
            config.width,
            config.height,
            Arc::new(config.tree),
            ids,
        ))
    }
}
