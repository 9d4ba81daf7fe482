//! Page navigation state machine.

use std::time::{Duration, Instant};

use trellis_core::{Property, Signal};

use crate::animation::{Easing, Transition};
use crate::config::GridConfig;
use crate::error::{Error, Result};
use crate::overlay::OverlayGate;

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The view is moving to the given page.
    Committed(usize),
    /// The request changed nothing: an overlay is open, a drag is active,
    /// the movement would leave the page range, or a released drag snapped
    /// back to its origin page.
    Ignored,
}

/// Owns the current page index and drives transitions between pages.
///
/// The navigator never reads a clock of its own. Every method that touches
/// the animated scroll offset takes `now` from the host's frame clock, so
/// gesture handling and rendering agree on time and tests are fully
/// deterministic.
///
/// Requests are dropped rather than failed when the view cannot move: while
/// an overlay is open, while a drag gesture owns the offset, or when a step
/// runs past either end. Out-of-range page indices are programmer errors
/// and fail fast instead.
#[derive(Debug)]
pub struct PageNavigator {
    current_page: Property<usize>,
    total_pages: usize,
    page_height: f32,
    base_duration: Duration,
    min_flick_velocity: f32,
    drag_commit_fraction: f32,
    overlay: OverlayGate,
    /// Resting offset; authoritative whenever no transition is in flight.
    offset: f32,
    transition: Option<Transition>,
    dragging: bool,
    page_changed: Signal<usize>,
}

impl PageNavigator {
    /// Create a navigator over zero pages.
    ///
    /// Call [`set_page_metrics`](Self::set_page_metrics) once the paginator
    /// has derived a page count and height.
    pub fn new(config: &GridConfig, overlay: OverlayGate) -> Self {
        Self {
            current_page: Property::new(0),
            total_pages: 0,
            page_height: 0.0,
            base_duration: config.page_switch_duration(),
            min_flick_velocity: config.min_flick_velocity,
            drag_commit_fraction: config.drag_commit_fraction,
            overlay,
            offset: 0.0,
            transition: None,
            dragging: false,
            page_changed: Signal::new(),
        }
    }

    /// Adopt a new page count and page height.
    ///
    /// Any in-flight transition or drag is dropped, the current page is
    /// clamped into the new range, and the offset snaps to its anchor.
    /// Emits [`page_changed`](Self::page_changed) if clamping moved the
    /// current page.
    pub fn set_page_metrics(&mut self, total_pages: usize, page_height: f32) {
        self.total_pages = total_pages;
        self.page_height = page_height;
        self.transition = None;
        self.dragging = false;

        let clamped = self.current_page.get().min(total_pages.saturating_sub(1));
        self.offset = self.anchor(clamped);
        if self.current_page.set(clamped) {
            self.page_changed.emit(clamped);
        }
    }

    /// Emitted with the new page index whenever the current page changes.
    pub fn page_changed(&self) -> &Signal<usize> {
        &self.page_changed
    }

    /// The page the view is on or moving toward.
    pub fn current_page(&self) -> usize {
        self.current_page.get()
    }

    /// Number of pages navigation currently spans.
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Whether a drag gesture currently owns the offset.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// The scroll offset at `now`, following any in-flight transition.
    pub fn offset_at(&self, now: Instant) -> f32 {
        match &self.transition {
            Some(transition) => transition.sample(now),
            None => self.offset,
        }
    }

    /// Whether a page transition is still running at `now`.
    pub fn is_transitioning(&self, now: Instant) -> bool {
        self.transition
            .as_ref()
            .is_some_and(|transition| !transition.is_finished(now))
    }

    /// Scroll offset where `page` rests.
    pub fn anchor(&self, page: usize) -> f32 {
        page as f32 * self.page_height
    }

    /// Move to `page`, animated over the base duration.
    ///
    /// Fails fast on an out-of-range index. Returns [`Navigation::Ignored`]
    /// without touching any state while an overlay is open or a drag is
    /// active.
    pub fn go_to_page(&mut self, page: usize, now: Instant) -> Result<Navigation> {
        if page >= self.total_pages {
            return Err(Error::page_out_of_range(page, self.total_pages));
        }
        if self.overlay.is_open() || self.dragging {
            return Ok(Navigation::Ignored);
        }
        self.begin_transition(page, self.base_duration, now);
        Ok(Navigation::Committed(page))
    }

    /// Move by a signed number of pages, as wheel or keyboard input does.
    ///
    /// Steps that would leave the page range are ignored rather than
    /// clamped, so repeated scrolling at either end is quiet.
    pub fn step(&mut self, delta: i32, now: Instant) -> Navigation {
        let target = self.current_page.get() as i64 + i64::from(delta);
        if target < 0 || target >= self.total_pages as i64 {
            return Navigation::Ignored;
        }
        match self.go_to_page(target as usize, now) {
            Ok(outcome) => outcome,
            Err(_) => Navigation::Ignored,
        }
    }

    /// Start a drag gesture at `now`.
    ///
    /// Freezes any in-flight transition at its current sample and takes
    /// ownership of the offset. Returns `false` while an overlay is open,
    /// while another drag is active, or when there are no pages.
    pub fn begin_drag(&mut self, now: Instant) -> bool {
        if self.overlay.is_open() || self.dragging || self.total_pages == 0 {
            return false;
        }
        self.offset = self.offset_at(now);
        self.transition = None;
        self.dragging = true;
        true
    }

    /// Apply pointer movement to the dragged offset, one to one.
    ///
    /// The offset is clamped to the valid scroll range, so dragging past
    /// either end accumulates nothing.
    pub fn drag_by(&mut self, delta: f32) {
        if !self.dragging {
            return;
        }
        let max = self.anchor(self.total_pages.saturating_sub(1));
        self.offset = (self.offset + delta).clamp(0.0, max);
    }

    /// End a drag gesture with the release velocity in pixels per second.
    ///
    /// Commits to the adjacent page in the drag direction when the
    /// displacement from the current page's anchor exceeds the configured
    /// fraction of the page height, otherwise snaps back. The transition
    /// duration is `distance / max(|velocity|, min_flick_velocity)`, capped
    /// at the base duration.
    pub fn end_drag(&mut self, velocity: f32, now: Instant) -> Navigation {
        if !self.dragging {
            return Navigation::Ignored;
        }
        self.dragging = false;

        let current = self.current_page.get();
        let displacement = self.offset - self.anchor(current);
        let threshold = self.drag_commit_fraction * self.page_height;
        let target = if displacement > threshold && current + 1 < self.total_pages {
            current + 1
        } else if displacement < -threshold && current > 0 {
            current - 1
        } else {
            current
        };

        let duration = self.flick_duration(self.anchor(target), velocity);
        let committed = target != current;
        self.begin_transition(target, duration, now);
        if committed {
            Navigation::Committed(target)
        } else {
            Navigation::Ignored
        }
    }

    /// Abort a drag gesture, snapping back to the current page.
    ///
    /// Distinct from [`end_drag`](Self::end_drag): a cancelled gesture can
    /// never commit a page change, whatever its displacement.
    pub fn cancel_drag(&mut self, now: Instant) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.begin_transition(self.current_page.get(), self.base_duration, now);
    }

    /// The page whose anchor lies closest to `offset`.
    ///
    /// Walks pages in order and stops as soon as the distance stops
    /// shrinking, which finds the minimum because anchors are monotonic.
    pub fn nearest_page(&self, offset: f32) -> usize {
        if self.total_pages == 0 {
            return 0;
        }
        let mut nearest = 0;
        let mut best = (self.anchor(0) - offset).abs();
        for page in 1..self.total_pages {
            let distance = (self.anchor(page) - offset).abs();
            if distance >= best {
                break;
            }
            nearest = page;
            best = distance;
        }
        nearest
    }

    /// Replace any in-flight transition with one toward `page`.
    fn begin_transition(&mut self, page: usize, duration: Duration, now: Instant) {
        let from = self.offset_at(now);
        let to = self.anchor(page);
        self.transition = if (to - from).abs() < f32::EPSILON {
            None
        } else {
            Some(Transition::new(from, to, now, duration, Easing::EaseOutCubic))
        };
        self.offset = to;

        if self.current_page.set(page) {
            tracing::debug!(target: "trellis::page", page, "page committed");
            self.page_changed.emit(page);
        }
    }

    fn flick_duration(&self, target_anchor: f32, velocity: f32) -> Duration {
        let distance = (target_anchor - self.offset).abs();
        let speed = velocity.abs().max(self.min_flick_velocity);
        self.base_duration.min(Duration::from_secs_f32(distance / speed))
    }
}

static_assertions::assert_impl_all!(PageNavigator: Send, Sync);
