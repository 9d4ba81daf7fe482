//! Grid cell metrics and fit queries.

use crate::layout::{
    DEFAULT_ITEM_SIZE, DEFAULT_MIN_COLUMNS, DEFAULT_MIN_ROWS, DEFAULT_SPACING, Padding,
};
use crate::types::Size;

/// Immutable cell metrics for a grid.
///
/// A geometry describes how large items are, how far apart they sit, and how
/// much padding surrounds them. The fit queries derive column and row counts
/// from these metrics; they never mutate the geometry, so every answer is a
/// pure function of the metrics and the queried extent.
///
/// Column and row counts follow one rule: a cell is admitted while the space
/// consumed so far plus one more item still fits, where only the gaps
/// *between* cells cost spacing. The trailing cell needs no spacing after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    /// Width of one item cell.
    pub item_width: f32,
    /// Height of one item cell.
    pub item_height: f32,
    /// Gap between adjacent cells, both axes.
    pub spacing: f32,
    /// Padding between the content and the grid edges.
    pub padding: Padding,
    /// Cap on columns regardless of available width.
    pub column_limit: Option<usize>,
    /// Cap on rows regardless of available height.
    pub row_limit: Option<usize>,
    /// Columns the adaptive sizer must make fit.
    pub min_columns: usize,
    /// Rows the adaptive sizer must make fit.
    pub min_rows: usize,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            item_width: DEFAULT_ITEM_SIZE,
            item_height: DEFAULT_ITEM_SIZE,
            spacing: DEFAULT_SPACING,
            padding: Padding::ZERO,
            column_limit: None,
            row_limit: None,
            min_columns: DEFAULT_MIN_COLUMNS,
            min_rows: DEFAULT_MIN_ROWS,
        }
    }
}

impl GridGeometry {
    /// Create a geometry with the given item size and defaults for the rest.
    pub fn new(item_width: f32, item_height: f32) -> Self {
        Self {
            item_width,
            item_height,
            ..Default::default()
        }
    }

    /// Set the item size.
    pub fn with_item_size(mut self, width: f32, height: f32) -> Self {
        self.item_width = width;
        self.item_height = height;
        self
    }

    /// Set the cell spacing.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the edge padding.
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Cap the column count.
    pub fn with_column_limit(mut self, limit: Option<usize>) -> Self {
        self.column_limit = limit;
        self
    }

    /// Cap the row count.
    pub fn with_row_limit(mut self, limit: Option<usize>) -> Self {
        self.row_limit = limit;
        self
    }

    /// Set the minimum column and row counts the sizer guarantees.
    pub fn with_minimums(mut self, min_columns: usize, min_rows: usize) -> Self {
        self.min_columns = min_columns;
        self.min_rows = min_rows;
        self
    }

    /// The size of one item cell.
    #[inline]
    pub fn cell_size(&self) -> Size {
        Size::new(self.item_width, self.item_height)
    }

    /// Distance between the left edges of adjacent columns.
    #[inline]
    pub fn horizontal_stride(&self) -> f32 {
        self.item_width + self.spacing
    }

    /// Distance between the top edges of adjacent rows.
    #[inline]
    pub fn vertical_stride(&self) -> f32 {
        self.item_height + self.spacing
    }

    /// How many columns fit the given width, and the width they consume.
    ///
    /// Columns are admitted greedily while another item fits, honoring
    /// [`column_limit`](Self::column_limit). The consumed width includes the
    /// edge padding. Returns `(0, 0.0)` when not even one column fits.
    pub fn columns_for_width(&self, width: f32) -> (usize, f32) {
        let mut columns = 0usize;
        let mut used = self.padding.horizontal();

        while used + self.item_width <= width {
            if self.column_limit.is_some_and(|limit| columns >= limit) {
                break;
            }
            used += self.item_width + self.spacing;
            columns += 1;
        }

        if columns == 0 {
            (0, 0.0)
        } else {
            // Drop the spacing accounted after the last column.
            (columns, used - self.spacing)
        }
    }

    /// How many rows fit the given height, honoring [`row_limit`](Self::row_limit).
    ///
    /// Returns `0` when not even one row fits.
    pub fn rows_for_height(&self, height: f32) -> usize {
        let content = height - self.padding.vertical();
        if content < self.item_height {
            return 0;
        }

        let stride = self.vertical_stride();
        let mut rows = (content / stride).floor() as usize;
        // The trailing row needs no spacing after it, so one more row fits
        // whenever the leftover is at least an item tall.
        if content - rows as f32 * stride >= self.item_height {
            rows += 1;
        }

        if let Some(limit) = self.row_limit {
            rows = rows.min(limit);
        }
        rows
    }

    /// The width `columns` columns consume, including padding.
    ///
    /// Returns `0.0` for zero columns.
    pub fn used_width_for_columns(&self, columns: usize) -> f32 {
        if columns == 0 {
            return 0.0;
        }
        self.padding.horizontal()
            + columns as f32 * self.item_width
            + (columns - 1) as f32 * self.spacing
    }

    /// The height `rows` rows consume, including padding.
    ///
    /// Returns `0.0` for zero rows.
    pub fn used_height_for_rows(&self, rows: usize) -> f32 {
        if rows == 0 {
            return 0.0;
        }
        self.padding.vertical()
            + rows as f32 * self.item_height
            + (rows - 1) as f32 * self.spacing
    }
}
