//! Grid view facade.
//!
//! [`GridView`] ties the pieces together for a host-side view controller:
//! the item [`Catalog`], the adaptive layout, the [`Paginator`], and the
//! [`PageNavigator`] behind one object with the operations a host calls in
//! response to user input and resize events.
//!
//! The view never measures itself. The host reports viewport sizes through
//! [`calculate_responsive_grid`](GridView::calculate_responsive_grid) from
//! its layout pass, and item mutations only mark the layout dirty; the
//! host drains that with [`flush_layout`](GridView::flush_layout) on the
//! next redraw tick, so mutating a dozen items costs one recomputation and
//! nothing relayouts from inside an allocation callback.

use std::ops::Range;
use std::time::Instant;

use trellis_core::{PerfSpan, Signal};

use crate::config::GridConfig;
use crate::error::Result;
use crate::layout::{AdaptiveSizer, GridPlan, plan_grid};
use crate::model::{Catalog, CatalogItem, NameCollator};
use crate::overlay::{OverlayGate, OverlayHold};
use crate::page::{Navigation, PageNavigator, Paginator};
use crate::types::{Point, Size};

/// Space cleared below a grid row for an overlay.
///
/// Returned by [`GridView::make_room_for_overlay`]. Holding the clearance
/// keeps the overlay gate open, which suppresses page navigation; dropping
/// it releases the gate and lets the displaced items move back.
#[derive(Debug)]
pub struct OverlayClearance {
    /// Keeps the overlay gate open while held.
    pub hold: OverlayHold,
    /// Items that shift down to clear the space.
    pub displaced: Range<usize>,
    /// Vertical distance the displaced items move.
    pub offset: f32,
}

/// Paged, responsive item grid.
///
/// One instance owns the geometry state for one viewport. All methods run
/// synchronously on the host's thread; nothing here spawns or blocks.
#[derive(Debug)]
pub struct GridView<T> {
    config: GridConfig,
    sizer: AdaptiveSizer,
    catalog: Catalog<T>,
    paginator: Paginator,
    navigator: PageNavigator,
    overlay: OverlayGate,
    plan: GridPlan,
    last_size: Option<Size>,
    layout_pending: bool,
    /// Page metrics last pushed into the navigator.
    page_metrics: (usize, f32),
    layout_changed: Signal<GridPlan>,
}

impl<T: CatalogItem> GridView<T> {
    /// Create a view from a validated configuration, collating item names
    /// in the system locale.
    pub fn new(config: GridConfig) -> Result<Self> {
        Self::with_collator(config, NameCollator::new())
    }

    /// Create a view with an explicit name collator.
    pub fn with_collator(config: GridConfig, collator: NameCollator) -> Result<Self> {
        config.validate()?;
        let overlay = OverlayGate::new();
        let sizer = config.sizer();
        let navigator = PageNavigator::new(&config, overlay.clone());
        Ok(Self {
            config,
            sizer,
            catalog: Catalog::with_collator(collator),
            paginator: Paginator::new(),
            navigator,
            overlay,
            plan: GridPlan::default(),
            last_size: None,
            layout_pending: false,
            page_metrics: (0, 0.0),
            layout_changed: Signal::new(),
        })
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Register an item, rejecting duplicate identifiers.
    ///
    /// A successful add marks the layout dirty; call
    /// [`load_grid`](Self::load_grid) after a batch to re-sort the display
    /// order.
    pub fn add_item(&mut self, item: T) -> bool {
        let added = self.catalog.add(item);
        if added {
            self.request_layout();
        }
        added
    }

    /// Remove the item with the given identifier, if present.
    pub fn remove_item(&mut self, id: &str) -> Option<T> {
        let removed = self.catalog.remove(id);
        if removed.is_some() {
            self.request_layout();
        }
        removed
    }

    /// Drop every item.
    pub fn remove_all(&mut self) {
        self.catalog.clear();
        self.request_layout();
    }

    /// Sort the display order and re-derive the page partition.
    ///
    /// Run once after a batch of adds or removes, not per item.
    pub fn load_grid(&mut self) {
        self.catalog.materialize();
        if let Some(size) = self.last_size {
            self.repartition(size.height);
        } else {
            self.layout_pending = true;
        }
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    /// Whether the view holds no items.
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// The item at a display-order position.
    pub fn item_at(&self, position: usize) -> Option<&T> {
        self.catalog.item_at(position)
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &Catalog<T> {
        &self.catalog
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Resolve the layout for a viewport, called from the host's layout
    /// pass.
    ///
    /// Deterministic and idempotent: the same viewport size always yields
    /// the same plan, and [`layout_changed`](Self::layout_changed) fires
    /// only when the plan actually differs from the previous one.
    pub fn calculate_responsive_grid(&mut self, width: f32, height: f32) -> GridPlan {
        let _span = PerfSpan::new("calculate_responsive_grid");
        let available = Size::new(width, height);
        self.last_size = Some(available);
        self.layout_pending = false;

        let plan = plan_grid(&self.sizer, available);
        let plan_changed = plan != self.plan;
        self.plan = plan;
        self.repartition(available.height);
        if plan_changed {
            self.layout_changed.emit(plan);
        }
        plan
    }

    /// Mark the layout dirty without recomputing anything.
    pub fn request_layout(&mut self) {
        self.layout_pending = true;
    }

    /// Whether a layout request is waiting for the next flush.
    pub fn needs_layout(&self) -> bool {
        self.layout_pending
    }

    /// Recompute a dirty layout at the last known viewport size.
    ///
    /// Coalesces any number of [`request_layout`](Self::request_layout)
    /// calls into one recomputation; intended to run once per redraw tick.
    /// Returns `None` when the layout is clean or no viewport has been
    /// measured yet (the request then stays pending).
    pub fn flush_layout(&mut self) -> Option<GridPlan> {
        if !self.layout_pending {
            return None;
        }
        let size = self.last_size?;
        Some(self.calculate_responsive_grid(size.width, size.height))
    }

    /// The most recently resolved plan.
    pub fn plan(&self) -> &GridPlan {
        &self.plan
    }

    /// The viewport size from the last layout pass.
    pub fn last_size(&self) -> Option<Size> {
        self.last_size
    }

    /// Emitted with the new plan whenever a layout pass changes it.
    pub fn layout_changed(&self) -> &Signal<GridPlan> {
        &self.layout_changed
    }

    /// The configuration the view was built from.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    fn repartition(&mut self, page_height: f32) {
        self.paginator
            .recompute(self.plan, page_height, self.catalog.len());
        let metrics = (self.paginator.total_pages(), page_height);
        if metrics != self.page_metrics {
            self.page_metrics = metrics;
            self.navigator.set_page_metrics(metrics.0, metrics.1);
        }
    }

    // =========================================================================
    // Pages and Navigation
    // =========================================================================

    /// Number of pages at the current layout.
    pub fn n_pages(&self) -> usize {
        self.paginator.total_pages()
    }

    /// Top-left position of a page's first item, in scroll coordinates.
    pub fn page_position(&self, page: usize) -> Result<Point> {
        self.paginator.page_position(page)
    }

    /// Item indices belonging to a page.
    pub fn items_of_page(&self, page: usize) -> Result<Range<usize>> {
        self.paginator.items_of_page(page)
    }

    /// The page currently shown or being moved to.
    pub fn current_page(&self) -> usize {
        self.navigator.current_page()
    }

    /// Move to a page, animated.
    ///
    /// Ignored while an overlay is open or a drag is active; fails fast on
    /// an out-of-range index.
    pub fn go_to_page(&mut self, page: usize, now: Instant) -> Result<Navigation> {
        self.navigator.go_to_page(page, now)
    }

    /// Move by a signed number of pages, as wheel input does.
    pub fn step_page(&mut self, delta: i32, now: Instant) -> Navigation {
        self.navigator.step(delta, now)
    }

    /// The pagination state.
    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    /// The navigation state machine.
    pub fn navigator(&self) -> &PageNavigator {
        &self.navigator
    }

    /// Mutable access for drag gestures and offset queries.
    pub fn navigator_mut(&mut self) -> &mut PageNavigator {
        &mut self.navigator
    }

    // =========================================================================
    // Overlays
    // =========================================================================

    /// The shared overlay gate, for host-side popups.
    pub fn overlay(&self) -> OverlayGate {
        self.overlay.clone()
    }

    /// Clear vertical space below a row for an overlay.
    ///
    /// Returns which items must shift down by `height` to make room under
    /// `below_row` on `page`. Navigation stays suppressed until the
    /// returned clearance is dropped.
    pub fn make_room_for_overlay(
        &self,
        page: usize,
        below_row: usize,
        height: f32,
    ) -> Result<OverlayClearance> {
        let (_, displaced) = self.paginator.split_at_row(page, below_row + 1)?;
        Ok(OverlayClearance {
            hold: self.overlay.hold(),
            displaced,
            offset: height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug)]
    struct App {
        id: String,
        name: String,
    }

    impl App {
        fn new(id: &str, name: &str) -> Self {
            Self {
                id: id.to_string(),
                name: name.to_string(),
            }
        }
    }

    impl CatalogItem for App {
        fn id(&self) -> &str {
            &self.id
        }

        fn display_name(&self) -> &str {
            &self.name
        }
    }

    fn config() -> GridConfig {
        GridConfig {
            item_width: 96.0,
            item_height: 96.0,
            base_spacing: 8.0,
            ..GridConfig::default()
        }
    }

    fn view() -> GridView<App> {
        GridView::with_collator(config(), NameCollator::with_locale("en-US")).unwrap()
    }

    fn view_with_items(count: usize) -> GridView<App> {
        let mut view = view();
        for index in 0..count {
            view.add_item(App::new(&format!("app-{index}"), &format!("App {index:03}")));
        }
        view.load_grid();
        view
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = GridConfig {
            min_columns: 0,
            ..GridConfig::default()
        };
        assert!(GridView::<App>::new(bad).is_err());
    }

    #[test]
    fn test_duplicate_add_reports_noop() {
        let mut view = view();
        assert!(view.add_item(App::new("term", "Terminal")));
        assert!(!view.add_item(App::new("term", "Terminal Clone")));
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_measure_partitions_items_into_pages() {
        let mut view = view_with_items(37);
        let plan = view.calculate_responsive_grid(500.0, 500.0);

        // At 96 px items the adaptive pass widens spacing to 38, which
        // fits a 4x4 grid into 500x500.
        assert_eq!(plan.columns, 4);
        assert_eq!(plan.rows_per_page, 4);
        assert_eq!(plan.geometry.spacing, 38.0);

        assert_eq!(view.n_pages(), 3);
        assert_eq!(view.items_of_page(2).unwrap(), 32..37);
    }

    #[test]
    fn test_display_order_after_load() {
        let mut view = view();
        view.add_item(App::new("zeta", "Zeta"));
        view.add_item(App::new("alpha-upper", "Alpha"));
        view.add_item(App::new("alpha-lower", "alpha"));
        view.load_grid();

        let names: Vec<&str> = (0..view.len())
            .filter_map(|position| view.item_at(position))
            .map(|app| app.name.as_str())
            .collect();
        assert_eq!(names, vec!["Alpha", "alpha", "Zeta"]);
    }

    #[test]
    fn test_layout_requests_coalesce() {
        let mut view = view();
        for index in 0..5 {
            view.add_item(App::new(&format!("a{index}"), "App"));
        }
        assert!(view.needs_layout());

        // No viewport yet: the request stays parked.
        assert!(view.flush_layout().is_none());
        assert!(view.needs_layout());

        view.calculate_responsive_grid(500.0, 500.0);
        assert!(!view.needs_layout());

        view.add_item(App::new("late", "Late"));
        view.add_item(App::new("later", "Later"));
        assert!(view.needs_layout());
        assert!(view.flush_layout().is_some());
        assert!(view.flush_layout().is_none());
    }

    #[test]
    fn test_layout_changed_only_on_difference() {
        let mut view = view_with_items(10);
        let plans = Arc::new(Mutex::new(Vec::new()));
        let plans_clone = plans.clone();
        view.layout_changed().connect(move |plan: &GridPlan| {
            plans_clone.lock().push(*plan);
        });

        view.calculate_responsive_grid(500.0, 500.0);
        view.calculate_responsive_grid(500.0, 500.0);
        assert_eq!(plans.lock().len(), 1);

        view.calculate_responsive_grid(300.0, 300.0);
        assert_eq!(plans.lock().len(), 2);
        // The tighter viewport forced an item shrink.
        assert_eq!(plans.lock()[1].geometry.item_width, 69.0);
    }

    #[test]
    fn test_open_overlay_suppresses_navigation() {
        let mut view = view_with_items(37);
        view.calculate_responsive_grid(500.0, 500.0);
        let now = Instant::now();

        let gate = view.overlay();
        let hold = gate.hold();
        assert_eq!(view.go_to_page(2, now).unwrap(), Navigation::Ignored);
        assert_eq!(view.current_page(), 0);

        drop(hold);
        assert_eq!(view.go_to_page(2, now).unwrap(), Navigation::Committed(2));
        assert_eq!(view.current_page(), 2);
    }

    #[test]
    fn test_make_room_for_overlay() {
        let mut view = view_with_items(37);
        view.calculate_responsive_grid(500.0, 500.0);

        let clearance = view.make_room_for_overlay(0, 1, 120.0).unwrap();
        assert_eq!(clearance.displaced, 8..16);
        assert_eq!(clearance.offset, 120.0);
        assert!(view.overlay().is_open());

        drop(clearance);
        assert!(!view.overlay().is_open());
    }

    #[test]
    fn test_remove_all_empties_pages() {
        let mut view = view_with_items(20);
        view.calculate_responsive_grid(500.0, 500.0);
        assert!(view.n_pages() > 0);

        view.remove_all();
        view.flush_layout();
        assert_eq!(view.n_pages(), 0);
        assert!(view.is_empty());
    }

    #[test]
    fn test_remove_item_marks_layout_dirty() {
        let mut view = view_with_items(3);
        view.calculate_responsive_grid(500.0, 500.0);

        assert!(view.remove_item("app-1").is_some());
        assert!(view.needs_layout());
        assert!(view.remove_item("app-1").is_none());
        view.flush_layout();
        assert_eq!(view.len(), 2);
    }
}
