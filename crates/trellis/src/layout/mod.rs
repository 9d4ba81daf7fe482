//! Grid layout subsystem.
//!
//! This module answers the geometric questions the rest of the engine is
//! built on: how many columns fit a width, how many rows fit a height, and
//! what item size and spacing to use for a given viewport.
//!
//! - [`GridGeometry`] - immutable cell metrics and the fit queries
//! - [`AdaptiveSizer`] - derives a geometry that fills an available area
//! - [`GridPlan`] - the resolved layout for one viewport size
//!
//! Layout here is a pure computation: the same inputs always produce the
//! same plan, and nothing in this module holds mutable state between calls.

mod adaptive;
mod geometry;

pub use adaptive::AdaptiveSizer;
pub use geometry::GridGeometry;

use serde::{Deserialize, Serialize};

use crate::types::Size;

/// Padding between the grid's content and its edges.
///
/// # Related
///
/// - [`GridGeometry`] - Counts padding when fitting columns and rows
/// - [`AdaptiveSizer`] - May replace padding in surrounding-spacing mode
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    /// Left padding.
    pub left: f32,
    /// Top padding.
    pub top: f32,
    /// Right padding.
    pub right: f32,
    /// Bottom padding.
    pub bottom: f32,
}

impl Padding {
    /// No padding on any side.
    pub const ZERO: Self = Self {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    /// Create new padding.
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create uniform padding (same value on all sides).
    pub const fn uniform(padding: f32) -> Self {
        Self::new(padding, padding, padding, padding)
    }

    /// Create symmetric padding (same horizontal and vertical).
    pub const fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self::new(horizontal, vertical, horizontal, vertical)
    }

    /// Total horizontal padding (left + right).
    #[inline]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Total vertical padding (top + bottom).
    #[inline]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Default spacing between grid cells.
pub const DEFAULT_SPACING: f32 = 6.0;

/// Default edge length for grid items.
pub const DEFAULT_ITEM_SIZE: f32 = 96.0;

/// Hard floor for item shrinking; items never go below this edge length.
pub const MIN_ITEM_SIZE: f32 = 16.0;

/// Default minimum number of columns the sizer guarantees.
pub const DEFAULT_MIN_COLUMNS: usize = 4;

/// Default minimum number of rows the sizer guarantees.
pub const DEFAULT_MIN_ROWS: usize = 4;

/// The resolved layout for one viewport size.
///
/// A plan is a value, not a stateful object: recomputing it for the same
/// sizer and viewport yields an identical plan. The default plan has zero
/// columns and rows, standing in for "no viewport measured yet".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GridPlan {
    /// The adapted cell metrics used by this plan.
    pub geometry: GridGeometry,
    /// Columns that fit the viewport width.
    pub columns: usize,
    /// Rows that fit one page of viewport height.
    pub rows_per_page: usize,
    /// Width consumed by `columns`, including padding.
    pub used_width: f32,
    /// Height consumed by `rows_per_page`, including padding.
    pub used_height: f32,
}

impl GridPlan {
    /// The number of items one page can hold.
    #[inline]
    pub fn per_page_capacity(&self) -> usize {
        self.columns * self.rows_per_page
    }
}

/// Compute the layout plan for a viewport.
///
/// The sizer first adapts its base geometry to the available area (possibly
/// shrinking items and recomputing spacing), then the adapted geometry is
/// asked how many columns and rows actually fit.
pub fn plan_grid(sizer: &AdaptiveSizer, available: Size) -> GridPlan {
    let geometry = sizer.fit_into(available);
    let (columns, used_width) = geometry.columns_for_width(available.width);
    let rows_per_page = geometry.rows_for_height(available.height);
    let used_height = geometry.used_height_for_rows(rows_per_page);

    GridPlan {
        geometry,
        columns,
        rows_per_page,
        used_width,
        used_height,
    }
}
