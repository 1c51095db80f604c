//! Never-exhausting parameters.
//!
//! Control inputs (frequencies, volume multipliers) must keep producing
//! values for as long as the signal they shape runs. [`RepeatLastWhenDone`]
//! turns a finite source into an endless one by holding its final value,
//! and [`Param`] accepts either a bare scalar or such a held source.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::{Stream, StreamExt};

use crate::error::{Error, Result};
use crate::signal::{BoxedSignal, Signal, ready_stream};

/// Streams a source, then repeats its last value forever.
///
/// Construction pulls the first sample so that an empty source is
/// rejected up front with [`Error::ExhaustedWithNoData`]. After that,
/// pulling never fails and never ends.
///
/// # Examples
///
/// ```
/// use riffle::{RepeatLastWhenDone, Signal, from_iter};
///
/// let mut held = RepeatLastWhenDone::new(from_iter([1.0, 5.0]))?;
/// assert_eq!(held.next_sample(), Some(1.0));
/// assert_eq!(held.next_sample(), Some(5.0));
/// assert_eq!(held.next_sample(), Some(5.0));
/// # Ok::<(), riffle::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct RepeatLastWhenDone<S> {
    /// `None` once the source has run out
    source: Option<S>,
    /// First sample, pulled eagerly but not yet handed out
    pending: Option<f64>,
    last: f64,
}

impl<S> RepeatLastWhenDone<S> {
    fn started(source: S, first: f64) -> Self {
        Self {
            source: Some(source),
            pending: Some(first),
            last: first,
        }
    }

    /// True once the wrapped source has ended and the held value is repeating.
    pub fn is_holding(&self) -> bool {
        self.source.is_none() && self.pending.is_none()
    }
}

impl<S: Signal> RepeatLastWhenDone<S> {
    /// Wraps `source`, failing if it has no samples at all.
    pub fn new(mut source: S) -> Result<Self> {
        let first = source.next_sample().ok_or(Error::ExhaustedWithNoData)?;
        Ok(Self::started(source, first))
    }

    /// Next value. Infallible: the held value stands in once the source ends.
    pub fn hold(&mut self) -> f64 {
        if let Some(first) = self.pending.take() {
            return first;
        }
        if let Some(source) = self.source.as_mut() {
            match source.next_sample() {
                Some(sample) => {
                    self.last = sample;
                    return sample;
                }
                None => self.source = None,
            }
        }
        self.last
    }
}

impl<S: Stream<Item = f64> + Unpin> RepeatLastWhenDone<S> {
    /// Async counterpart of [`new`](Self::new): awaits the first sample.
    pub async fn new_async(mut source: S) -> Result<Self> {
        let first = source.next().await.ok_or(Error::ExhaustedWithNoData)?;
        Ok(Self::started(source, first))
    }
}

impl<S: Signal> Signal for RepeatLastWhenDone<S> {
    fn next_sample(&mut self) -> Option<f64> {
        Some(self.hold())
    }
}

impl<S: Stream<Item = f64> + Unpin> Stream for RepeatLastWhenDone<S> {
    type Item = f64;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<f64>> {
        let this = self.get_mut();
        if let Some(first) = this.pending.take() {
            return Poll::Ready(Some(first));
        }
        if let Some(source) = this.source.as_mut() {
            match ready!(Pin::new(source).poll_next(cx)) {
                Some(sample) => {
                    this.last = sample;
                    return Poll::Ready(Some(sample));
                }
                None => this.source = None,
            }
        }
        Poll::Ready(Some(this.last))
    }
}

/// Wraps `source` so it never exhausts. See [`RepeatLastWhenDone`].
pub fn repeat_last_when_done<S: Signal>(source: S) -> Result<RepeatLastWhenDone<S>> {
    RepeatLastWhenDone::new(source)
}

/// A parameter that can be either a fixed value or modulated by a signal.
///
/// Modulated parameters hold the modulator's last value once it ends, so a
/// finite envelope or sweep never cuts off the signal it controls.
///
/// # Examples
///
/// ```
/// use riffle::{Param, ramp};
///
/// // Fixed parameter
/// let mut fixed: Param = 0.5.into();
/// assert_eq!(fixed.value(), 0.5);
///
/// // A three-step sweep that then stays at its last step
/// let mut swept = Param::modulated(ramp(0.0, 3.0, 3))?;
/// let values: Vec<f64> = (0..5).map(|_| swept.value()).collect();
/// assert_eq!(values, vec![0.0, 1.0, 2.0, 2.0, 2.0]);
/// # Ok::<(), riffle::Error>(())
/// ```
pub enum Param {
    /// A fixed, constant value
    Fixed(f64),
    /// A value driven by a signal, held at its last sample once it ends
    Modulated(RepeatLastWhenDone<BoxedSignal>),
}

impl Param {
    /// Gets the current value of the parameter.
    ///
    /// For modulated parameters this advances the modulator by one sample.
    pub fn value(&mut self) -> f64 {
        match self {
            Param::Fixed(v) => *v,
            Param::Modulated(held) => held.hold(),
        }
    }

    /// Creates a fixed parameter with the given value.
    pub fn fixed(value: f64) -> Self {
        Param::Fixed(value)
    }

    /// Creates a parameter driven by `signal`.
    ///
    /// # Errors
    ///
    /// [`Error::ExhaustedWithNoData`] if `signal` has no samples.
    pub fn modulated(signal: impl Signal + Send + 'static) -> Result<Self> {
        let boxed: BoxedSignal = Box::new(signal);
        Ok(Param::Modulated(RepeatLastWhenDone::new(boxed)?))
    }

    /// Returns true if this parameter is fixed (non-modulated).
    pub fn is_fixed(&self) -> bool {
        matches!(self, Param::Fixed(_))
    }
}

impl std::fmt::Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Param::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            Param::Modulated(_) => f.write_str("Modulated(..)"),
        }
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Fixed(value)
    }
}

impl From<RepeatLastWhenDone<BoxedSignal>> for Param {
    fn from(held: RepeatLastWhenDone<BoxedSignal>) -> Self {
        Param::Modulated(held)
    }
}

impl Signal for Param {
    fn next_sample(&mut self) -> Option<f64> {
        Some(self.value())
    }
}

ready_stream!(impl[] Param);
