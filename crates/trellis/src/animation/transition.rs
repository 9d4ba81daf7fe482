//! A time-based interpolation between two scalar values.

use std::time::{Duration, Instant};

use crate::animation::{Easing, lerp_eased};

/// An in-flight interpolation from one value to another.
///
/// A transition is immutable once started. Its value at any moment is a pure
/// function of the timestamp passed to [`sample`](Self::sample), so callers
/// (and tests) control time explicitly; nothing here reads the wall clock.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use trellis::animation::{Easing, Transition};
///
/// let start = Instant::now();
/// let slide = Transition::new(0.0, 100.0, start, Duration::from_millis(200), Easing::Linear);
///
/// assert_eq!(slide.sample(start), 0.0);
/// assert_eq!(slide.sample(start + Duration::from_millis(100)), 50.0);
/// assert_eq!(slide.sample(start + Duration::from_millis(300)), 100.0);
/// assert!(slide.is_finished(start + Duration::from_millis(300)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
    easing: Easing,
}

impl Transition {
    /// Begin a transition at `started`.
    pub fn new(from: f32, to: f32, started: Instant, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            started,
            duration,
            easing,
        }
    }

    /// The value the transition starts from.
    pub fn origin(&self) -> f32 {
        self.from
    }

    /// The value the transition settles at.
    pub fn target(&self) -> f32 {
        self.to
    }

    /// The total duration of the transition.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Linear progress at `now`, clamped to `0.0..=1.0`.
    ///
    /// A zero-duration transition is complete immediately; a timestamp
    /// before the start samples at `0.0`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// The eased value at `now`.
    pub fn sample(&self, now: Instant) -> f32 {
        lerp_eased(self.easing, self.from, self.to, self.progress(now))
    }

    /// Whether the transition has run its full duration at `now`.
    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}
