//! Core signal trait.
//!
//! A [`Signal`] is a lazy, single-pass sequence of samples. It may be
//! infinite (oscillators, constants) or finite (ramps, counted repeats),
//! and pulling from it is destructive: each sample is produced once.
//!
//! Every combinator in this crate accepts and returns a `Signal`, so
//! pipelines compose to any depth. The same combinator types also
//! implement [`futures::Stream`] when their children do, which is the
//! asynchronous variant used where pulling must wait on real I/O.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;

/// Common interface for all signal sources and processors.
///
/// The trait provides two fundamental operations:
/// - Single sample generation via `next_sample()`
/// - Batch processing via `process()`
pub trait Signal {
    /// Generates the next sample from the signal.
    ///
    /// # Returns
    ///
    /// `Some(sample)`, typically between -1.0 and 1.0 for audio signals,
    /// or `None` once the signal is exhausted. An exhausted signal stays
    /// exhausted.
    fn next_sample(&mut self) -> Option<f64>;

    /// Generates multiple samples into a buffer.
    ///
    /// Default implementation calls `next_sample()` for each element and
    /// stops early if the signal runs out.
    ///
    /// # Returns
    ///
    /// The number of slots written. Anything past that is left untouched.
    fn process(&mut self, buffer: &mut [f64]) -> usize {
        for (written, slot) in buffer.iter_mut().enumerate() {
            match self.next_sample() {
                Some(sample) => *slot = sample,
                None => return written,
            }
        }
        buffer.len()
    }
}

/// A heap-allocated signal, for mixing heterogeneous sources in one combinator.
pub type BoxedSignal = Box<dyn Signal + Send>;

/// Implementation of `Signal` for `f64` representing a constant, endless signal.
///
/// # Examples
///
/// ```
/// use riffle::Signal;
///
/// let mut constant = 0.5_f64;
/// assert_eq!(constant.next_sample(), Some(0.5));
///
/// let mut buffer = vec![0.0; 4];
/// assert_eq!(constant.process(&mut buffer), 4);
/// assert_eq!(buffer, vec![0.5, 0.5, 0.5, 0.5]);
/// ```
impl Signal for f64 {
    fn next_sample(&mut self) -> Option<f64> {
        Some(*self)
    }

    fn process(&mut self, buffer: &mut [f64]) -> usize {
        buffer.fill(*self);
        buffer.len()
    }
}

impl<S: Signal + ?Sized> Signal for Box<S> {
    fn next_sample(&mut self) -> Option<f64> {
        (**self).next_sample()
    }

    fn process(&mut self, buffer: &mut [f64]) -> usize {
        (**self).process(buffer)
    }
}

impl<S: Signal + ?Sized> Signal for &mut S {
    fn next_sample(&mut self) -> Option<f64> {
        (**self).next_sample()
    }
}

/// Implements `Stream` for a generator whose samples are always ready.
///
/// Leaves never wait, so polling just pulls the next sample.
macro_rules! ready_stream {
    (impl[$($generics:tt)*] $ty:ty) => {
        impl<$($generics)*> ::futures::Stream for $ty {
            type Item = f64;

            fn poll_next(
                self: ::std::pin::Pin<&mut Self>,
                _cx: &mut ::std::task::Context<'_>,
            ) -> ::std::task::Poll<Option<f64>> {
                ::std::task::Poll::Ready($crate::Signal::next_sample(self.get_mut()))
            }
        }
    };
}

pub(crate) use ready_stream;

/// Adapts any iterator of `f64` into a [`Signal`].
///
/// Created by [`from_iter`].
#[derive(Debug, Clone)]
pub struct FromIter<I> {
    iter: I,
}

/// Wraps an iterator (or anything iterable) as a signal.
///
/// # Examples
///
/// ```
/// use riffle::{Signal, from_iter};
///
/// let mut signal = from_iter([0.25, -0.25]);
/// assert_eq!(signal.next_sample(), Some(0.25));
/// assert_eq!(signal.next_sample(), Some(-0.25));
/// assert_eq!(signal.next_sample(), None);
/// ```
pub fn from_iter<I>(iter: I) -> FromIter<I::IntoIter>
where
    I: IntoIterator<Item = f64>,
{
    FromIter {
        iter: iter.into_iter(),
    }
}

impl<I: Iterator<Item = f64>> Signal for FromIter<I> {
    fn next_sample(&mut self) -> Option<f64> {
        self.iter.next()
    }
}

ready_stream!(impl[I: Iterator<Item = f64> + Unpin] FromIter<I>);

/// Iterator over the samples of a signal.
///
/// Created by [`SignalExt::samples`](crate::SignalExt::samples).
#[derive(Debug, Clone)]
pub struct Samples<S> {
    signal: S,
}

impl<S> Samples<S> {
    pub(crate) fn new(signal: S) -> Self {
        Self { signal }
    }

    /// Recovers the wrapped signal.
    pub fn into_inner(self) -> S {
        self.signal
    }
}

impl<S: Signal> Iterator for Samples<S> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        self.signal.next_sample()
    }
}

/// Async view of a synchronous signal.
///
/// Created by [`SignalExt::into_stream`](crate::SignalExt::into_stream).
/// Every poll is immediately ready.
#[derive(Debug, Clone)]
pub struct SignalStream<S> {
    signal: S,
}

impl<S> SignalStream<S> {
    pub(crate) fn new(signal: S) -> Self {
        Self { signal }
    }
}

impl<S: Signal + Unpin> Stream for SignalStream<S> {
    type Item = f64;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<f64>> {
        Poll::Ready(self.get_mut().signal.next_sample())
    }
}
