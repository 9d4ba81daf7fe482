//! Easing functions for smooth animations.
//!
//! Easing functions map a linear progress value (0.0 to 1.0) to a transformed
//! value that creates smoother, more natural-looking motion.

/// Available easing functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation (no easing).
    #[default]
    Linear,
    /// Quadratic ease-in (starts slow, accelerates).
    EaseIn,
    /// Quadratic ease-out (starts fast, decelerates).
    EaseOut,
    /// Quadratic ease-in-out (smooth start and end).
    EaseInOut,
    /// Cubic ease-in (more pronounced than quadratic).
    EaseInCubic,
    /// Cubic ease-out (more pronounced than quadratic).
    EaseOutCubic,
}

impl Easing {
    /// Apply this easing to a progress value.
    ///
    /// The input is clamped to `0.0..=1.0` first.
    ///
    /// # Example
    ///
    /// ```
    /// use trellis::animation::Easing;
    ///
    /// // Linear: output equals input
    /// assert_eq!(Easing::Linear.apply(0.5), 0.5);
    ///
    /// // Ease-in: slower at start
    /// assert!(Easing::EaseIn.apply(0.5) < 0.5);
    ///
    /// // Ease-out: slower at end
    /// assert!(Easing::EaseOut.apply(0.5) > 0.5);
    /// ```
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Interpolate between two values using an easing function.
#[inline]
pub fn lerp_eased(easing: Easing, start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * easing.apply(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear() {
        assert_eq!(Easing::Linear.apply(0.0), 0.0);
        assert_eq!(Easing::Linear.apply(0.5), 0.5);
        assert_eq!(Easing::Linear.apply(1.0), 1.0);
    }

    #[test]
    fn test_ease_in() {
        assert_eq!(Easing::EaseIn.apply(0.0), 0.0);
        assert!(Easing::EaseIn.apply(0.5) < 0.5); // Slower at start
        assert_eq!(Easing::EaseIn.apply(1.0), 1.0);
    }

    #[test]
    fn test_ease_out() {
        assert_eq!(Easing::EaseOut.apply(0.0), 0.0);
        assert!(Easing::EaseOut.apply(0.5) > 0.5); // Faster at start
        assert_eq!(Easing::EaseOut.apply(1.0), 1.0);
    }

    #[test]
    fn test_ease_in_out() {
        assert_eq!(Easing::EaseInOut.apply(0.0), 0.0);
        assert_eq!(Easing::EaseInOut.apply(0.5), 0.5); // Midpoint unchanged
        assert_eq!(Easing::EaseInOut.apply(1.0), 1.0);
    }

    #[test]
    fn test_clamp() {
        // Values outside 0-1 should be clamped
        assert_eq!(Easing::Linear.apply(-0.5), 0.0);
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
    }

    #[test]
    fn test_cubic_more_pronounced() {
        // Cubic should be more pronounced than quadratic
        let quad_mid = Easing::EaseIn.apply(0.5);
        let cubic_mid = Easing::EaseInCubic.apply(0.5);
        assert!(cubic_mid < quad_mid); // Cubic is even slower at start
    }

    #[test]
    fn test_lerp_eased() {
        // Linear interpolation from 100 to 200
        assert_eq!(lerp_eased(Easing::Linear, 100.0, 200.0, 0.0), 100.0);
        assert_eq!(lerp_eased(Easing::Linear, 100.0, 200.0, 0.5), 150.0);
        assert_eq!(lerp_eased(Easing::Linear, 100.0, 200.0, 1.0), 200.0);
    }
}
