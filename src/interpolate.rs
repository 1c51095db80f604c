//! Value interpolation primitives and ramp shaping curves.
//!
//! `lerp` and `rlerp` map a normalized parameter to and from an arbitrary
//! range. Curves reshape the normalized parameter before it is mapped, and
//! are what [`ramp`](crate::generators::ramp) uses to bend its trajectory.

/// Maps `t` in `[0, 1]` onto the range `start..end`.
///
/// # Examples
///
/// ```
/// use riffle::lerp;
///
/// assert_eq!(lerp(0.0, 100.0, 0.25), 25.0);
/// assert_eq!(lerp(-1.0, 1.0, 0.5), 0.0);
/// ```
#[inline]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

/// Inverse of [`lerp`]: where `value` sits within `start..end`, as a fraction.
///
/// # Examples
///
/// ```
/// use riffle::rlerp;
///
/// assert_eq!(rlerp(-1.0, 1.0, 0.0), 0.5);
/// assert_eq!(rlerp(0.0, 200.0, 50.0), 0.25);
/// ```
#[inline]
pub fn rlerp(start: f64, end: f64, value: f64) -> f64 {
    (value - start) / (end - start)
}

/// True for 2, 4, 8, ... (1 and 0 are rejected).
pub fn is_power_of_two(n: usize) -> bool {
    n >= 2 && n.is_power_of_two()
}

/// A shaping function over the normalized domain `[0, 1)`.
///
/// Implemented for the [`Curve`] presets and for any `Fn(f64) -> f64`,
/// so ramps accept either.
pub trait Shape {
    /// Reshapes a normalized position.
    fn apply(&self, t: f64) -> f64;
}

impl<F: Fn(f64) -> f64> Shape for F {
    fn apply(&self, t: f64) -> f64 {
        self(t)
    }
}

/// Interpolation curve presets for ramps.
///
/// All curves map a normalized input value [0, 1] to a normalized output value [0, 1],
/// allowing them to be used for any parameter range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Curve {
    /// Linear interpolation (constant rate of change)
    #[default]
    Linear,

    /// Exponential curve (slow start, fast finish)
    ///
    /// The parameter controls steepness:
    /// - `2.0` = squared curve
    /// - `3.0` = cubed curve
    Exponential(f64),

    /// Logarithmic curve (fast start, slow finish)
    ///
    /// Inverse of exponential. The parameter controls steepness.
    Logarithmic(f64),

    /// Smoothstep ease-in/ease-out.
    SCurve,

    /// Quarter sine, `sin(π/2 · t)`. A soft fade that starts steep.
    QuarterSine,
}

impl Curve {
    /// Apply the curve to a normalized value.
    ///
    /// # Arguments
    ///
    /// * `t` - Input value, clamped to [0, 1]
    ///
    /// # Examples
    ///
    /// ```
    /// use riffle::interpolate::Curve;
    ///
    /// assert_eq!(Curve::Linear.apply(0.5), 0.5);
    /// assert_eq!(Curve::Exponential(2.0).apply(0.5), 0.25);
    /// ```
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::Linear => t,
            Curve::Exponential(exp) => t.powf(*exp),
            Curve::Logarithmic(exp) => 1.0 - (1.0 - t).powf(*exp),
            Curve::SCurve => t * t * (3.0 - 2.0 * t),
            Curve::QuarterSine => (std::f64::consts::FRAC_PI_2 * t).sin(),
        }
    }

    /// Map a value from one range to another using this curve.
    ///
    /// # Examples
    ///
    /// ```
    /// use riffle::interpolate::Curve;
    ///
    /// let curve = Curve::Exponential(2.0);
    /// let result = curve.map(0.5, (0.0, 1.0), (0.0, 100.0));
    /// assert_eq!(result, 25.0);
    /// ```
    pub fn map(&self, t: f64, from_range: (f64, f64), to_range: (f64, f64)) -> f64 {
        let normalized = rlerp(from_range.0, from_range.1, t);
        lerp(to_range.0, to_range.1, self.apply(normalized))
    }
}

impl Shape for Curve {
    fn apply(&self, t: f64) -> f64 {
        Curve::apply(self, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(-32768.0, 32767.0, 0.0), -32768.0);
        assert_eq!(lerp(-32768.0, 32767.0, 1.0), 32767.0);
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn test_rlerp_inverts_lerp() {
        for t in [0.0, 0.1, 0.5, 0.9, 1.0] {
            assert_abs_diff_eq!(rlerp(-3.0, 7.0, lerp(-3.0, 7.0, t)), t, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rlerp_outside_range() {
        // Values outside the range map outside [0, 1]; nothing clamps them
        assert_eq!(rlerp(-1.0, 1.0, 3.0), 2.0);
        assert_eq!(rlerp(-1.0, 1.0, -3.0), -1.0);
    }

    #[test]
    fn test_is_power_of_two() {
        assert!(is_power_of_two(2));
        assert!(is_power_of_two(1024));
        assert!(!is_power_of_two(0));
        assert!(!is_power_of_two(1));
        assert!(!is_power_of_two(3));
        assert!(!is_power_of_two(1000));
    }

    #[test]
    fn test_curve_presets() {
        assert_eq!(Curve::Linear.apply(0.5), 0.5);
        assert_eq!(Curve::Exponential(3.0).apply(0.5), 0.125);
        assert_eq!(Curve::Logarithmic(2.0).apply(0.5), 0.75);
        assert_eq!(Curve::SCurve.apply(0.5), 0.5);
        assert!(Curve::SCurve.apply(0.25) < 0.25);
        assert_abs_diff_eq!(Curve::QuarterSine.apply(1.0), 1.0, epsilon = 1e-12);
        assert_eq!(Curve::QuarterSine.apply(0.0), 0.0);
    }

    #[test]
    fn test_curve_clamping() {
        assert_eq!(Curve::Linear.apply(-0.5), 0.0);
        assert_eq!(Curve::Linear.apply(1.5), 1.0);
    }

    #[test]
    fn test_curve_map_different_ranges() {
        let result = Curve::Linear.map(5.0, (0.0, 10.0), (100.0, 200.0));
        assert_eq!(result, 150.0);
        let result = Curve::Logarithmic(2.0).map(0.5, (0.0, 1.0), (0.0, 100.0));
        assert_eq!(result, 75.0);
    }

    #[test]
    fn test_closure_is_a_shape() {
        let square = |t: f64| t * t;
        assert_eq!(Shape::apply(&square, 0.5), 0.25);
        assert_eq!(Shape::apply(&f64::sqrt, 0.25), 0.5);
    }

    #[test]
    fn test_default() {
        assert_eq!(Curve::default(), Curve::Linear);
    }
}
