//! Item-to-page partitioning.

use std::ops::Range;

use trellis_core::Signal;

use crate::error::{Error, Result};
use crate::layout::GridPlan;
use crate::types::Point;

/// Payload of [`Paginator::pages_changed`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagesChanged {
    /// The new page count.
    pub total_pages: usize,
    /// Pixel height one page's rows now consume, including padding.
    pub used_height: f32,
}

/// Partitions a linear item sequence into fixed-capacity pages.
///
/// The paginator owns no items; it maps item indices to pages, rows, and
/// pixel positions from the current [`GridPlan`] and item count. Positions
/// are given in scroll coordinates where page `n` starts at
/// `n * page_height` and each page's content block is vertically centered
/// in its leftover space.
///
/// [`recompute`](Self::recompute) emits [`pages_changed`](Self::pages_changed)
/// whenever the page count or the consumed page height differs from the
/// previous layout, so dependents know to re-derive cached page offsets.
#[derive(Debug, Default)]
pub struct Paginator {
    plan: GridPlan,
    page_height: f32,
    item_count: usize,
    total_pages: usize,
    space_between_pages: f32,
    pages_changed: Signal<PagesChanged>,
}

impl Paginator {
    /// Create a paginator with no layout and no items.
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derive the page partition from a new plan and item count.
    ///
    /// Emits [`pages_changed`](Self::pages_changed) if the page count or the
    /// consumed page height changed.
    pub fn recompute(&mut self, plan: GridPlan, page_height: f32, item_count: usize) {
        let total_pages = if plan.per_page_capacity() == 0 {
            0
        } else {
            item_count.div_ceil(plan.columns).div_ceil(plan.rows_per_page)
        };
        let changed =
            total_pages != self.total_pages || plan.used_height != self.plan.used_height;

        self.plan = plan;
        self.page_height = page_height;
        self.item_count = item_count;
        self.total_pages = total_pages;
        self.space_between_pages = (page_height - plan.used_height).max(0.0);

        if changed {
            tracing::debug!(
                target: "trellis::page",
                total_pages,
                used_height = plan.used_height,
                "page partition changed"
            );
            self.pages_changed.emit(PagesChanged {
                total_pages,
                used_height: plan.used_height,
            });
        }
    }

    /// Emitted when the page count or per-page consumed height changes.
    pub fn pages_changed(&self) -> &Signal<PagesChanged> {
        &self.pages_changed
    }

    /// The plan the current partition was derived from.
    pub fn plan(&self) -> &GridPlan {
        &self.plan
    }

    /// Number of pages in the current partition.
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Number of items in the current partition.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Viewport height one page occupies in scroll coordinates.
    pub fn page_height(&self) -> f32 {
        self.page_height
    }

    /// Leftover vertical space on a page after its rows are laid out.
    pub fn space_between_pages(&self) -> f32 {
        self.space_between_pages
    }

    /// Items one full page holds.
    pub fn per_page_capacity(&self) -> usize {
        self.plan.per_page_capacity()
    }

    fn check_page(&self, page: usize) -> Result<()> {
        if page >= self.total_pages {
            return Err(Error::page_out_of_range(page, self.total_pages));
        }
        Ok(())
    }

    /// The page holding the item at `index`.
    pub fn page_of_item(&self, index: usize) -> Result<usize> {
        if index >= self.item_count {
            return Err(Error::item_out_of_range(index, self.item_count));
        }
        let capacity = self.per_page_capacity();
        if capacity == 0 {
            // Items exist but no page can hold any of them.
            return Err(Error::page_out_of_range(0, 0));
        }
        Ok(index / capacity)
    }

    /// Item indices belonging to `page`, in order.
    ///
    /// The last page may be partially filled.
    pub fn items_of_page(&self, page: usize) -> Result<Range<usize>> {
        self.check_page(page)?;
        let capacity = self.per_page_capacity();
        let start = page * capacity;
        let end = (start + capacity).min(self.item_count);
        Ok(start..end)
    }

    /// Item indices of `page` grouped by row, top to bottom.
    ///
    /// The last row of the last page may be partially filled.
    pub fn rows_of_page(&self, page: usize) -> Result<Vec<Range<usize>>> {
        let items = self.items_of_page(page)?;
        let columns = self.plan.columns;
        let mut rows = Vec::with_capacity(self.plan.rows_per_page);
        let mut start = items.start;
        while start < items.end {
            let end = (start + columns).min(items.end);
            rows.push(start..end);
            start = end;
        }
        Ok(rows)
    }

    /// Split a page's items into the rows above `row` and the rows from
    /// `row` down.
    ///
    /// Used to displace the lower rows when an overlay needs room below a
    /// given row. A split row at or past the page's last row yields an
    /// empty second range.
    pub fn split_at_row(&self, page: usize, row: usize) -> Result<(Range<usize>, Range<usize>)> {
        let items = self.items_of_page(page)?;
        let split = (items.start + row * self.plan.columns).min(items.end);
        Ok((items.start..split, split..items.end))
    }

    /// Top-left corner of the cell at (`row`, `column`) on `page`, in scroll
    /// coordinates.
    ///
    /// Only the page index is validated; row and column are plain grid
    /// coordinates and the affine math extends past the filled cells.
    pub fn cell_origin(&self, page: usize, row: usize, column: usize) -> Result<Point> {
        self.check_page(page)?;
        let geometry = &self.plan.geometry;
        let x = geometry.padding.left + column as f32 * geometry.horizontal_stride();
        let y = page as f32 * self.page_height
            + self.space_between_pages / 2.0
            + geometry.padding.top
            + row as f32 * geometry.vertical_stride();
        Ok(Point::new(x, y))
    }

    /// Top-left corner of the first item of `page`, in scroll coordinates.
    pub fn page_position(&self, page: usize) -> Result<Point> {
        self.cell_origin(page, 0, 0)
    }
}

static_assertions::assert_impl_all!(Paginator: Send, Sync);
