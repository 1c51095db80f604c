//! Riffle - composable, lazy audio-signal pipelines
//!
//! Build a tree of [`Signal`]s out of generators ([`repeat`], [`ramp`],
//! [`sine`], ...) and combinators ([`queue`], [`looped`], [`mix`],
//! [`multi_channel`], [`volume`], [`limit`]), then pull it through a
//! [`Chunker`] to get fixed-size, quantized [`AudioBuffer`]s ready for a
//! device. [`fft`] and [`Spectrum`] inspect a captured block.
//!
//! Every combinator also implements [`futures::Stream`] over stream
//! children, so the same pipeline can sit behind an async source.
//!
//! ```
//! use riffle::{SampleFormat, SignalExt, StreamOptions, chunker, ramp, sine};
//!
//! let options = StreamOptions::default()
//!     .with_format(SampleFormat::Int16)
//!     .with_frames_per_buffer(256);
//! // A 440 Hz tone that fades in over 512 samples, one second long
//! let fade = riffle::Param::modulated(ramp(0.0, 1.0, 512))?;
//! let tone = sine(440.0, 44100.0).volume(fade).limit(44100);
//! let buffers: Vec<_> = chunker(tone, &options)?.collect();
//! assert_eq!(buffers.len(), 44100 / 256);
//! # Ok::<(), riffle::Error>(())
//! ```

pub mod chunker;
pub mod combinators;
pub mod error;
pub mod fft;
pub mod format;
pub mod generators;
pub mod interpolate;
pub mod param;
pub mod signal;
pub mod stream;
#[cfg(feature = "wav")]
pub mod wav;

// Re-export commonly used types at the crate root
pub use chunker::{Chunker, chunker};
pub use combinators::{
    Limit, Loop, Mix, MultiChannel, Queue, SignalExt, Volume, limit, looped, mix, multi_channel,
    queue, volume,
};
pub use error::{Error, Result};
pub use fft::{Spectrum, fft, fft_frequencies};
pub use format::{AudioBuffer, SampleFormat};
pub use generators::{
    Oscillator, Ramp, Repeat, SawtoothOscillator, SineOscillator, SquareOscillator,
    TriangleOscillator, Waveform, WhiteNoise, ramp, ramp_with, repeat, sawtooth, sine, square,
    triangle,
};
pub use interpolate::{Curve, Shape, lerp, rlerp};
pub use param::{Param, RepeatLastWhenDone, repeat_last_when_done};
pub use signal::{BoxedSignal, FromIter, Samples, Signal, SignalStream, from_iter};
pub use stream::{
    Recording, StopAfter, StreamOptions, StreamReader, StreamWriter, play_from, play_from_async,
    record, record_async,
};
#[cfg(feature = "wav")]
pub use wav::WavOptions;
