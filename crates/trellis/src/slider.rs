//! Slider value model.
//!
//! The interactive core of a slider widget with the painting stripped out:
//! an integer value in a range, single and page steps, wheel handling, and
//! the mapping from track positions to values during a thumb drag. The
//! host owns geometry and hit testing and reports gestures as distances
//! along the track axis.

use trellis_core::{Property, Signal};

/// Integer value constrained to a range, with slider gesture semantics.
///
/// # Signals
///
/// - `value_changed(i32)`: Emitted when the value changes (including during drag)
/// - `slider_pressed()`: Emitted when a thumb drag starts
/// - `slider_released()`: Emitted when a thumb drag ends
/// - `slider_moved(i32)`: Emitted with the candidate value while dragging
/// - `range_changed((i32, i32))`: Emitted when the range changes
///
/// # Example
///
/// ```
/// use trellis::slider::SliderModel;
///
/// let mut slider = SliderModel::new().with_range(0, 100).with_value(50);
/// slider.set_value(130);
/// assert_eq!(slider.value(), 100);
/// ```
#[derive(Debug)]
pub struct SliderModel {
    minimum: i32,
    maximum: i32,
    value: Property<i32>,
    single_step: i32,
    page_step: i32,

    /// Whether the thumb is currently being dragged.
    dragging: bool,
    /// Track position where the drag started.
    drag_start_pos: f32,
    /// Value when the drag started.
    drag_start_value: i32,
    /// Track length captured at drag start.
    drag_track_length: f32,

    /// Signal emitted when the value changes.
    pub value_changed: Signal<i32>,
    /// Signal emitted when a drag starts.
    pub slider_pressed: Signal<()>,
    /// Signal emitted when a drag ends.
    pub slider_released: Signal<()>,
    /// Signal emitted with the candidate value while dragging.
    pub slider_moved: Signal<i32>,
    /// Signal emitted when the range changes.
    pub range_changed: Signal<(i32, i32)>,
}

impl SliderModel {
    /// Create a slider over the default `0..=99` range.
    pub fn new() -> Self {
        Self {
            minimum: 0,
            maximum: 99,
            value: Property::new(0),
            single_step: 1,
            page_step: 10,
            dragging: false,
            drag_start_pos: 0.0,
            drag_start_value: 0,
            drag_track_length: 0.0,
            value_changed: Signal::new(),
            slider_pressed: Signal::new(),
            slider_released: Signal::new(),
            slider_moved: Signal::new(),
            range_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Value and Range
    // =========================================================================

    /// Get the current value.
    pub fn value(&self) -> i32 {
        self.value.get()
    }

    /// Set the current value.
    ///
    /// The value is clamped to the valid range [minimum, maximum].
    pub fn set_value(&mut self, value: i32) {
        let clamped = value.clamp(self.minimum, self.maximum);
        if self.value.set(clamped) {
            self.value_changed.emit(clamped);
        }
    }

    /// Set value using builder pattern.
    pub fn with_value(mut self, value: i32) -> Self {
        self.set_value(value);
        self
    }

    /// Get the minimum value.
    pub fn minimum(&self) -> i32 {
        self.minimum
    }

    /// Get the maximum value.
    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    /// Set the value range.
    ///
    /// A reversed range is normalized; the current value is clamped into
    /// the new range.
    pub fn set_range(&mut self, minimum: i32, maximum: i32) {
        let (min, max) = if minimum <= maximum {
            (minimum, maximum)
        } else {
            (maximum, minimum)
        };

        if self.minimum != min || self.maximum != max {
            self.minimum = min;
            self.maximum = max;
            let clamped = self.value.get().clamp(min, max);
            let value_changed = self.value.set(clamped);
            self.range_changed.emit((min, max));
            if value_changed {
                self.value_changed.emit(clamped);
            }
        }
    }

    /// Set range using builder pattern.
    pub fn with_range(mut self, minimum: i32, maximum: i32) -> Self {
        self.set_range(minimum, maximum);
        self
    }

    // =========================================================================
    // Step Sizes
    // =========================================================================

    /// Get the single step size.
    pub fn single_step(&self) -> i32 {
        self.single_step
    }

    /// Set the single step size.
    pub fn set_single_step(&mut self, step: i32) {
        self.single_step = step;
    }

    /// Set single step using builder pattern.
    pub fn with_single_step(mut self, step: i32) -> Self {
        self.single_step = step;
        self
    }

    /// Get the page step size.
    pub fn page_step(&self) -> i32 {
        self.page_step
    }

    /// Set the page step size.
    pub fn set_page_step(&mut self, step: i32) {
        self.page_step = step;
    }

    /// Set page step using builder pattern.
    pub fn with_page_step(mut self, step: i32) -> Self {
        self.page_step = step;
        self
    }

    /// Move by a signed number of single steps.
    pub fn step(&mut self, steps: i32) {
        self.set_value(self.value.get() + steps * self.single_step);
    }

    /// Move by a signed number of page steps.
    pub fn page(&mut self, pages: i32) {
        self.set_value(self.value.get() + pages * self.page_step);
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    /// Apply a wheel delta in 120-per-notch units.
    ///
    /// Returns `true` when the delta was consumed.
    pub fn wheel(&mut self, delta: f32) -> bool {
        if delta.abs() > 0.0 {
            let steps = (delta / 120.0).round() as i32;
            self.set_value(self.value.get() + steps * self.single_step);
            return true;
        }
        false
    }

    /// The value a clamped position ratio along the track maps to.
    ///
    /// Used for track clicks that jump straight to a position.
    pub fn value_at(&self, ratio: f32) -> i32 {
        let range = (self.maximum - self.minimum) as f32;
        if range <= 0.0 {
            return self.minimum;
        }
        self.minimum + (ratio.clamp(0.0, 1.0) * range).round() as i32
    }

    /// Whether the thumb is currently being dragged.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Start a thumb drag at a track position.
    ///
    /// Returns `false` when a drag is already active or the track has no
    /// extent.
    pub fn begin_drag(&mut self, position: f32, track_length: f32) -> bool {
        if self.dragging || track_length <= 0.0 {
            return false;
        }
        self.dragging = true;
        self.drag_start_pos = position;
        self.drag_start_value = self.value.get();
        self.drag_track_length = track_length;
        self.slider_pressed.emit(());
        true
    }

    /// Move the thumb drag to a new track position.
    ///
    /// The positional delta since drag start maps proportionally onto the
    /// value range. Emits `slider_moved` with the resulting value.
    pub fn drag_to(&mut self, position: f32) {
        if !self.dragging {
            return;
        }
        let range = (self.maximum - self.minimum) as f32;
        if range > 0.0 {
            let delta = position - self.drag_start_pos;
            let steps = (delta / self.drag_track_length * range).round() as i32;
            self.set_value(self.drag_start_value + steps);
        }
        self.slider_moved.emit(self.value.get());
    }

    /// End the thumb drag.
    pub fn end_drag(&mut self) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.slider_released.emit(());
    }
}

impl Default for SliderModel {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(SliderModel: Send, Sync);
