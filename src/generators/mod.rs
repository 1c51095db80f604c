//! Base sample generators.
//!
//! These produce raw sample streams with no upstream source:
//! - [`repeat`]: a constant value, counted or endless
//! - [`ramp`] / [`ramp_with`]: a shaped transition between two values
//! - [`sine`], [`square`], [`sawtooth`], [`triangle`]: periodic waveforms
//!   with a modulatable frequency
//! - [`WhiteNoise`]: uniform random samples

mod noise;
mod ramp;
mod repeat;
mod waves;

pub use noise::WhiteNoise;
pub use ramp::{Ramp, ramp, ramp_with};
pub use repeat::{Repeat, repeat};
pub use waves::{
    Oscillator, Sawtooth, SawtoothOscillator, Sine, SineOscillator, Square, SquareOscillator,
    Triangle, TriangleOscillator, Waveform, sawtooth, sine, square, triangle,
};
