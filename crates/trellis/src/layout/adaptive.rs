//! Responsive item sizing and spacing.

use crate::layout::{GridGeometry, MIN_ITEM_SIZE, Padding};
use crate::types::Size;

/// Derives a [`GridGeometry`] that fills an available area.
///
/// The sizer owns an immutable base geometry - nominal item size, base
/// spacing, minimum column and row counts - and adapts a copy of it to each
/// viewport it is asked about:
///
/// 1. Spacing stretches to distribute the area left over after the minimum
///    grid, clamped between the base spacing and the smaller item edge.
/// 2. If the minimum grid does not fit even at base spacing, items shrink
///    uniformly on both axes until it does, never below the size floor.
/// 3. In surrounding mode the computed spacing is also applied as edge
///    padding on all four sides.
///
/// [`fit_into`](Self::fit_into) reads only the base, so repeated calls with
/// the same viewport always return the same geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveSizer {
    base: GridGeometry,
    size_floor: f32,
    surround_with_spacing: bool,
}

impl AdaptiveSizer {
    /// Create a sizer over the given base geometry.
    pub fn new(base: GridGeometry) -> Self {
        Self {
            base,
            size_floor: MIN_ITEM_SIZE,
            surround_with_spacing: false,
        }
    }

    /// Set the smallest edge length items may shrink to.
    pub fn with_size_floor(mut self, floor: f32) -> Self {
        self.size_floor = floor;
        self
    }

    /// Also pad the grid edges with the computed spacing.
    pub fn with_surrounding_spacing(mut self, surround: bool) -> Self {
        self.surround_with_spacing = surround;
        self
    }

    /// The base geometry this sizer adapts.
    pub fn base(&self) -> &GridGeometry {
        &self.base
    }

    /// Adapt the base geometry to the available area.
    ///
    /// The result is a pure function of this sizer and `available`; feeding
    /// a viewport twice yields identical geometry. When even the size floor
    /// cannot make the minimum grid fit, the floored geometry is returned
    /// and the caller sees fewer columns or rows than the minimums ask for.
    pub fn fit_into(&self, available: Size) -> GridGeometry {
        let mut geometry = self.base;
        geometry.spacing = self.spacing_for(available, geometry.item_width, geometry.item_height);
        if self.surround_with_spacing {
            geometry.padding = Padding::uniform(geometry.spacing);
        }

        if self.minimums_fit(&geometry, available) {
            return geometry;
        }

        // Shrink both edges by the per-cell share of the worse overshoot.
        let min_columns = geometry.min_columns.max(1);
        let min_rows = geometry.min_rows.max(1);
        let over_width = geometry.used_width_for_columns(min_columns) - available.width;
        let over_height = geometry.used_height_for_rows(min_rows) - available.height;
        let (overshoot, cells) = if over_width >= over_height {
            (over_width, min_columns)
        } else {
            (over_height, min_rows)
        };
        let shrink = (overshoot / cells as f32).ceil();

        geometry.item_width = (self.base.item_width - shrink).max(self.size_floor);
        geometry.item_height = (self.base.item_height - shrink).max(self.size_floor);
        tracing::trace!(
            target: "trellis::layout",
            shrink,
            item_width = geometry.item_width,
            item_height = geometry.item_height,
            "shrinking grid items to fit minimum grid"
        );

        geometry.spacing = self.spacing_for(available, geometry.item_width, geometry.item_height);
        if self.surround_with_spacing {
            geometry.padding = Padding::uniform(geometry.spacing);
        }
        geometry
    }

    /// Spacing that distributes the leftover around the minimum grid.
    ///
    /// Leftover is measured against the minimum cell counts on each axis and
    /// divided across the gaps: between cells only, or between and around
    /// them in surrounding mode. The smaller share wins, floored to whole
    /// pixels and clamped between the base spacing and the smaller item edge.
    fn spacing_for(&self, available: Size, item_width: f32, item_height: f32) -> f32 {
        let min_columns = self.base.min_columns.max(1);
        let min_rows = self.base.min_rows.max(1);
        let max_spacing = item_width.min(item_height);

        let empty_width = available.width - min_columns as f32 * item_width;
        let empty_height = available.height - min_rows as f32 * item_height;

        let column_share = Self::gap_share(empty_width, min_columns, self.surround_with_spacing);
        let row_share = Self::gap_share(empty_height, min_rows, self.surround_with_spacing);
        let candidate = column_share.min(row_share).floor();

        let min_spacing = self.base.spacing.min(max_spacing);
        candidate.clamp(min_spacing, max_spacing)
    }

    /// Split leftover space across the gaps on one axis.
    fn gap_share(empty: f32, cells: usize, surround: bool) -> f32 {
        if surround {
            empty / (cells + 1) as f32
        } else if cells > 1 {
            empty / (cells - 1) as f32
        } else {
            // A single cell has no inner gap; the whole leftover is offered.
            empty
        }
    }

    /// Whether the minimum grid fits the area with the given geometry.
    fn minimums_fit(&self, geometry: &GridGeometry, available: Size) -> bool {
        let (columns, _) = geometry.columns_for_width(available.width);
        let rows = geometry.rows_for_height(available.height);
        columns >= geometry.min_columns && rows >= geometry.min_rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_geometry() -> GridGeometry {
        GridGeometry::default()
            .with_item_size(96.0, 96.0)
            .with_spacing(8.0)
            .with_minimums(4, 4)
    }

    #[test]
    fn test_wide_area_keeps_item_size() {
        let sizer = AdaptiveSizer::new(base_geometry());
        let geometry = sizer.fit_into(Size::new(500.0, 500.0));

        assert_eq!(geometry.item_width, 96.0);
        assert_eq!(geometry.item_height, 96.0);

        let (columns, _) = geometry.columns_for_width(500.0);
        assert_eq!(columns, 4);
        assert_eq!(geometry.rows_for_height(500.0), 4);
    }

    #[test]
    fn test_wide_area_stretches_spacing() {
        // Leftover 500 - 4*96 = 116 split across 3 inner gaps.
        let sizer = AdaptiveSizer::new(base_geometry());
        let geometry = sizer.fit_into(Size::new(500.0, 500.0));
        assert_eq!(geometry.spacing, 38.0);
        // Spacing stretch never disturbs padding outside surrounding mode.
        assert_eq!(geometry.padding, Padding::ZERO);
    }

    #[test]
    fn test_tight_area_shrinks_items() {
        let sizer = AdaptiveSizer::new(base_geometry());
        let geometry = sizer.fit_into(Size::new(300.0, 300.0));

        // Overshoot 4*96 + 3*8 - 300 = 108, split across 4 cells: 27 off.
        assert_eq!(geometry.item_width, 69.0);
        assert_eq!(geometry.item_height, 69.0);
        assert!(geometry.item_width < 96.0);
        assert!(geometry.item_width >= MIN_ITEM_SIZE);

        // The minimum grid fits after shrinking.
        let (columns, used) = geometry.columns_for_width(300.0);
        assert_eq!(columns, 4);
        assert_eq!(used, 300.0);
        assert_eq!(geometry.rows_for_height(300.0), 4);
    }

    #[test]
    fn test_shrink_stops_at_floor() {
        let sizer = AdaptiveSizer::new(base_geometry());
        let geometry = sizer.fit_into(Size::new(50.0, 50.0));

        assert_eq!(geometry.item_width, MIN_ITEM_SIZE);
        assert_eq!(geometry.item_height, MIN_ITEM_SIZE);

        // Degraded: fewer than min_columns fit, but the answer stays sane.
        let (columns, _) = geometry.columns_for_width(50.0);
        assert!(columns < 4);
        assert!(columns > 0);
    }

    #[test]
    fn test_fit_into_is_idempotent() {
        let sizer = AdaptiveSizer::new(base_geometry());
        for extent in [50.0, 300.0, 500.0, 1200.0] {
            let available = Size::new(extent, extent);
            assert_eq!(sizer.fit_into(available), sizer.fit_into(available));
        }
    }

    #[test]
    fn test_surrounding_mode_pads_edges() {
        let sizer = AdaptiveSizer::new(base_geometry()).with_surrounding_spacing(true);
        let geometry = sizer.fit_into(Size::new(500.0, 500.0));

        // Leftover 116 split across 5 gaps (around and between 4 cells).
        assert_eq!(geometry.spacing, 23.0);
        assert_eq!(geometry.padding, Padding::uniform(23.0));

        // Padding plus 4 items plus 3 gaps still fits: 46+384+69 = 499.
        let (columns, used) = geometry.columns_for_width(500.0);
        assert_eq!(columns, 4);
        assert_eq!(used, 499.0);
    }

    #[test]
    fn test_single_cell_minimum_offers_whole_leftover() {
        let geometry = GridGeometry::default()
            .with_item_size(96.0, 96.0)
            .with_spacing(8.0)
            .with_minimums(1, 1);
        let sizer = AdaptiveSizer::new(geometry);
        let adapted = sizer.fit_into(Size::new(300.0, 300.0));

        // Leftover 204 exceeds the item edge, so the clamp wins.
        assert_eq!(adapted.spacing, 96.0);
    }

    #[test]
    fn test_custom_floor() {
        let sizer = AdaptiveSizer::new(base_geometry()).with_size_floor(32.0);
        let geometry = sizer.fit_into(Size::new(50.0, 50.0));
        assert_eq!(geometry.item_width, 32.0);
    }
}
