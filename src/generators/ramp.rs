//! Shaped transition between two values.

use crate::Signal;
use crate::interpolate::{Curve, Shape, lerp};
use crate::signal::ready_stream;

/// A finite ramp from `start` toward `end`.
///
/// The i-th of `samples` values is `lerp(start, end, curve(i / samples))`,
/// so the ramp approaches `end` without producing it. Chain a
/// [`repeat`](crate::repeat) of `end` to hold the destination.
#[derive(Debug, Clone)]
pub struct Ramp<C = Curve> {
    start: f64,
    end: f64,
    samples: usize,
    index: usize,
    curve: C,
}

/// A linear ramp of `samples` values.
///
/// # Examples
///
/// ```
/// use riffle::{SignalExt, ramp};
///
/// let values: Vec<f64> = ramp(0.0, 1.0, 4).samples().collect();
/// assert_eq!(values, vec![0.0, 0.25, 0.5, 0.75]);
/// ```
pub fn ramp(start: f64, end: f64, samples: usize) -> Ramp<Curve> {
    ramp_with(start, end, samples, Curve::Linear)
}

/// A ramp of `samples` values bent by `curve`.
///
/// `curve` is a [`Curve`] preset or any `Fn(f64) -> f64` over `[0, 1)`.
///
/// # Examples
///
/// ```
/// use riffle::{SignalExt, ramp_with};
/// use riffle::interpolate::Curve;
///
/// let eased: Vec<f64> = ramp_with(0.0, 100.0, 2, Curve::Exponential(2.0)).samples().collect();
/// assert_eq!(eased, vec![0.0, 25.0]);
///
/// let fade_out: Vec<f64> = ramp_with(1.0, 0.0, 4, f64::sqrt).samples().collect();
/// assert_eq!(fade_out[1], 0.5);
/// ```
pub fn ramp_with<C: Shape>(start: f64, end: f64, samples: usize, curve: C) -> Ramp<C> {
    Ramp {
        start,
        end,
        samples,
        index: 0,
        curve,
    }
}

impl<C> Ramp<C> {
    /// Values left to produce.
    pub fn remaining(&self) -> usize {
        self.samples - self.index
    }
}

impl<C: Shape> Signal for Ramp<C> {
    fn next_sample(&mut self) -> Option<f64> {
        if self.index >= self.samples {
            return None;
        }
        let t = self.curve.apply(self.index as f64 / self.samples as f64);
        self.index += 1;
        Some(lerp(self.start, self.end, t))
    }
}

ready_stream!(impl[C: Shape + Unpin] Ramp<C>);
