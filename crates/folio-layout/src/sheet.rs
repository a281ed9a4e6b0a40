//! Ordered pages sharing one [`LayoutPolicy`].
//!
//! A sheet always holds at least one page. Pages are persistent values, so
//! cloning a sheet is a cheap snapshot (trees are shared by reference).

use folio_core::geometry::{Bounds, Point, SplitAxis};
use tracing::{debug, trace};

use crate::error::LayoutError;
use crate::node::{ComponentKind, NodeId};
use crate::page::{PageId, PageLayout};
use crate::policy::LayoutPolicy;
use crate::snapshot::{PAGE_CONFIG_SCHEMA_VERSION, SheetConfig};

/// Resolved divider strip of one split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Divider {
    pub split_id: NodeId,
    /// First leaf under the split.
    pub anchor: NodeId,
    pub axis: SplitAxis,
    pub bounds: Bounds,
}

/// Paginated layout: one tree per page.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    policy: LayoutPolicy,
    pages: Vec<PageLayout>,
    next_page_id: PageId,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::new(LayoutPolicy::default())
    }
}

impl SheetLayout {
    /// Sheet with one fresh page sized by `policy`.
    #[must_use]
    pub fn new(policy: LayoutPolicy) -> Self {
        let first = PageLayout::with_id(PageId::MIN, policy.page_width, policy.page_height);
        Self {
            policy,
            pages: vec![first],
            next_page_id: PageId::MIN.checked_next().unwrap_or(PageId::MIN),
        }
    }

    #[must_use]
    pub const fn policy(&self) -> &LayoutPolicy {
        &self.policy
    }

    #[must_use]
    pub fn pages(&self) -> &[PageLayout] {
        &self.pages
    }

    #[must_use]
    pub fn page(&self, index: usize) -> Option<&PageLayout> {
        self.pages.get(index)
    }

    #[must_use]
    pub fn page_by_id(&self, id: PageId) -> Option<&PageLayout> {
        self.pages.iter().find(|page| page.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always `false`; kept for symmetry with [`len`](Self::len).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Append a fresh page sized by the policy.
    pub fn push_page(&mut self) -> Result<PageId, LayoutError> {
        let id = self.next_page_id;
        self.next_page_id = id.checked_next()?;
        self.pages.push(PageLayout::with_id(
            id,
            self.policy.page_width,
            self.policy.page_height,
        ));
        debug!(
            op = "push_page",
            page_id = id.get(),
            pages = self.pages.len(),
            "sheet updated"
        );
        Ok(id)
    }

    /// Remove page `id`. The last remaining page is never removed.
    pub fn remove_page(&mut self, id: PageId) -> Option<PageLayout> {
        let Some(index) = self.index_of(id) else {
            trace!(
                op = "remove_page",
                page_id = id.get(),
                reason = "not_found",
                "sheet update skipped"
            );
            return None;
        };
        if self.pages.len() == 1 {
            trace!(
                op = "remove_page",
                page_id = id.get(),
                reason = "last_page",
                "sheet update skipped"
            );
            return None;
        }
        let removed = self.pages.remove(index);
        debug!(
            op = "remove_page",
            page_id = id.get(),
            pages = self.pages.len(),
            "sheet updated"
        );
        Some(removed)
    }

    /// Replace page `id` with `update(&page)`. Returns whether a page was
    /// replaced; an update that changes the page id is discarded.
    pub fn update_page<F>(&mut self, id: PageId, update: F) -> bool
    where
        F: FnOnce(&PageLayout) -> PageLayout,
    {
        let Some(index) = self.index_of(id) else {
            trace!(
                op = "update_page",
                page_id = id.get(),
                reason = "not_found",
                "sheet update skipped"
            );
            return false;
        };
        let next = update(&self.pages[index]);
        if next.id() != id {
            trace!(
                op = "update_page",
                page_id = id.get(),
                reason = "id_changed",
                "sheet update skipped"
            );
            return false;
        }
        self.pages[index] = next;
        true
    }

    /// Clear page `id` back to a single empty leaf.
    pub fn reset_page(&mut self, id: PageId) -> bool {
        self.update_page(id, PageLayout::cleared)
    }

    /// Drop `component` onto node `node_id` of page `page_id`, using the
    /// policy's split ratio.
    pub fn drop_component(
        &mut self,
        page_id: PageId,
        node_id: NodeId,
        pointer: Point,
        component: impl Into<ComponentKind>,
    ) -> bool {
        let ratio = self.policy.split_ratio();
        self.update_page(page_id, |page| {
            page.drop_component_with_ratio(node_id, pointer, component, ratio)
        })
    }

    /// Divider strips of page `id`, parents before children.
    #[must_use]
    pub fn dividers(&self, id: PageId) -> Option<Vec<Divider>> {
        let page = self.page_by_id(id)?;
        let thickness = self.policy.divider_thickness;
        Some(
            page.layout()
                .splits()
                .iter()
                .map(|split| Divider {
                    split_id: split.id,
                    anchor: split.anchor,
                    axis: split.axis,
                    bounds: split.divider(thickness),
                })
                .collect(),
        )
    }

    /// Export every page in order.
    #[must_use]
    pub fn to_config(&self) -> SheetConfig {
        SheetConfig {
            schema_version: PAGE_CONFIG_SCHEMA_VERSION,
            next_page_id: Some(self.next_page_id),
            pages: self.pages.iter().map(PageLayout::to_config).collect(),
        }
    }

    /// Restore a sheet, validating every page.
    pub fn from_config(config: SheetConfig, policy: LayoutPolicy) -> Result<Self, LayoutError> {
        let next_page_id = config.validate()?;
        let pages = config
            .pages
            .into_iter()
            .map(PageLayout::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            policy,
            pages,
            next_page_id,
        })
    }

    fn index_of(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|page| page.id() == id)
    }
}
