//! Periodic waveform oscillators.
//!
//! All four waveforms share one phase-accumulating [`Oscillator`]; they
//! differ only in the [`Waveform`] that turns a phase in `[0, 1)` into a
//! sample in `[-1, 1]`.

use std::f64::consts::TAU;

use crate::param::Param;
use crate::signal::{Signal, ready_stream};

/// Maps a normalized phase to a sample.
pub trait Waveform {
    /// Sample at `phase`, which is always in `[0, 1)`.
    fn sample(&self, phase: f64) -> f64;
}

/// `sin(2π·phase)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sine;

/// +1 for the first half of the cycle, -1 for the second
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Square;

/// Rises linearly from -1 to 1 across the cycle, then drops back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sawtooth;

/// Rises from -1 to 1 over the first half, falls back over the second
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Triangle;

impl Waveform for Sine {
    fn sample(&self, phase: f64) -> f64 {
        (TAU * phase).sin()
    }
}

impl Waveform for Square {
    fn sample(&self, phase: f64) -> f64 {
        if phase < 0.5 { 1.0 } else { -1.0 }
    }
}

impl Waveform for Sawtooth {
    fn sample(&self, phase: f64) -> f64 {
        2.0 * phase - 1.0
    }
}

impl Waveform for Triangle {
    fn sample(&self, phase: f64) -> f64 {
        if phase < 0.5 {
            4.0 * phase - 1.0
        } else {
            3.0 - 4.0 * phase
        }
    }
}

/// An endless oscillator with a fixed or modulated frequency.
///
/// The frequency parameter is read once per sample, after the sample is
/// produced, so a frequency modulator steps in lockstep with the output.
/// A finite modulator holds its last value once it runs out.
pub struct Oscillator<W> {
    waveform: W,
    /// Current phase of the oscillator (0.0 to 1.0)
    phase: f64,
    frequency: Param,
    sample_rate: f64,
}

pub type SineOscillator = Oscillator<Sine>;
pub type SquareOscillator = Oscillator<Square>;
pub type SawtoothOscillator = Oscillator<Sawtooth>;
pub type TriangleOscillator = Oscillator<Triangle>;

impl<W: Waveform> Oscillator<W> {
    /// Creates an oscillator starting at phase 0.
    ///
    /// # Arguments
    ///
    /// * `waveform` - Shape of one cycle
    /// * `frequency` - Frequency in Hz, fixed or modulated
    /// * `sample_rate` - Sample rate in Hz (e.g., 44100.0 for CD quality)
    pub fn new(waveform: W, frequency: impl Into<Param>, sample_rate: f64) -> Self {
        Self {
            waveform,
            phase: 0.0,
            frequency: frequency.into(),
            sample_rate,
        }
    }

    /// Replaces the frequency parameter. Phase is kept, so the change is click-free.
    pub fn set_frequency(&mut self, frequency: impl Into<Param>) {
        self.frequency = frequency.into();
    }

    /// Current phase in `[0, 1)`.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Samples per second this oscillator advances its phase at.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Resets the oscillator to its initial phase.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

impl<W: Waveform> Signal for Oscillator<W> {
    fn next_sample(&mut self) -> Option<f64> {
        let sample = self.waveform.sample(self.phase);

        // Wrap to [0.0, 1.0); floor also handles negative and super-Nyquist steps
        self.phase += self.frequency.value() / self.sample_rate;
        self.phase -= self.phase.floor();

        Some(sample)
    }
}

ready_stream!(impl[W: Waveform + Unpin] Oscillator<W>);

/// A sine oscillator.
///
/// # Examples
///
/// ```
/// use riffle::{Signal, sine};
///
/// let mut osc = sine(440.0, 44100.0);
/// assert_eq!(osc.next_sample(), Some(0.0));
/// ```
pub fn sine(frequency: impl Into<Param>, sample_rate: f64) -> SineOscillator {
    Oscillator::new(Sine, frequency, sample_rate)
}

/// A square-wave oscillator.
pub fn square(frequency: impl Into<Param>, sample_rate: f64) -> SquareOscillator {
    Oscillator::new(Square, frequency, sample_rate)
}

/// A sawtooth oscillator.
pub fn sawtooth(frequency: impl Into<Param>, sample_rate: f64) -> SawtoothOscillator {
    Oscillator::new(Sawtooth, frequency, sample_rate)
}

/// A triangle-wave oscillator.
pub fn triangle(frequency: impl Into<Param>, sample_rate: f64) -> TriangleOscillator {
    Oscillator::new(Triangle, frequency, sample_rate)
}
