//! Signal combinators for composing and transforming audio signals.
//!
//! Every combinator owns its children and pulls them lazily. Each type
//! implements [`Signal`] when its children do, and [`futures::Stream`]
//! when its children are streams, with identical per-step semantics.

mod limit;
mod looping;
mod mix;
mod multi_channel;
mod queue;
mod volume;

pub use limit::{Limit, limit};
pub use looping::{Loop, looped};
pub use mix::{Mix, mix};
pub use multi_channel::{MultiChannel, multi_channel};
pub use queue::{Queue, queue};
pub use volume::{Volume, volume};

use crate::error::Result;
use crate::param::{Param, RepeatLastWhenDone};
use crate::signal::{BoxedSignal, Samples, Signal, SignalStream};

/// Extension trait providing fluent combinator methods for signals.
///
/// # Examples
///
/// ```
/// use riffle::{SignalExt, ramp};
///
/// // Chain operations together
/// let values: Vec<f64> = ramp(0.0, 1.0, 4)
///     .looped(2)    // Play the ramp twice
///     .volume(0.5)  // Halve it
///     .limit(6)     // Stop early
///     .samples()
///     .collect();
/// assert_eq!(values, vec![0.0, 0.125, 0.25, 0.375, 0.0, 0.125]);
/// ```
pub trait SignalExt: Signal + Sized {
    /// Truncates this signal to at most `n` samples.
    fn limit(self, n: usize) -> Limit<Self> {
        limit(self, n)
    }

    /// Plays this signal `times` times in total, or forever for `None`.
    fn looped(self, times: impl Into<Option<usize>>) -> Loop<Self> {
        looped(self, times)
    }

    /// Scales this signal by a fixed or modulated volume.
    fn volume(self, amount: impl Into<Param>) -> Volume<Self> {
        volume(self, amount)
    }

    /// Wraps this signal so it repeats its last sample forever.
    ///
    /// # Errors
    ///
    /// [`Error::ExhaustedWithNoData`](crate::Error::ExhaustedWithNoData)
    /// if the signal is already empty.
    fn hold_last(self) -> Result<RepeatLastWhenDone<Self>> {
        RepeatLastWhenDone::new(self)
    }

    /// Erases the concrete type, for combining heterogeneous signals.
    fn into_boxed(self) -> BoxedSignal
    where
        Self: Send + 'static,
    {
        Box::new(self)
    }

    /// Iterates over the samples of this signal.
    fn samples(self) -> Samples<Self> {
        Samples::new(self)
    }

    /// Views this signal as an always-ready [`futures::Stream`].
    fn into_stream(self) -> SignalStream<Self> {
        SignalStream::new(self)
    }
}

// Blanket implementation for all signals
impl<T: Signal> SignalExt for T {}

/// Concatenates signals of any type. See [`queue`].
///
/// ```
/// use riffle::{SignalExt, ramp, repeat};
///
/// let values: Vec<f64> = riffle::queue!(repeat(1.0, 1), ramp(0.0, 1.0, 2)).samples().collect();
/// assert_eq!(values, vec![1.0, 0.0, 0.5]);
/// ```
#[macro_export]
macro_rules! queue {
    ($($signal:expr),* $(,)?) => {
        $crate::queue(::std::vec![$($crate::SignalExt::into_boxed($signal)),*])
    };
}

/// Mixes signals of any type. See [`mix`].
#[macro_export]
macro_rules! mix {
    ($($signal:expr),* $(,)?) => {
        $crate::mix(::std::vec![$($crate::SignalExt::into_boxed($signal)),*])
    };
}

/// Interleaves channels of any type. See [`multi_channel`].
#[macro_export]
macro_rules! multi_channel {
    ($($signal:expr),* $(,)?) => {
        $crate::multi_channel(::std::vec![$($crate::SignalExt::into_boxed($signal)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_iter, ramp, repeat, sine};
    use futures::StreamExt;
    use futures::executor::block_on;

    #[test]
    fn test_chained_pipeline() {
        let values: Vec<f64> = from_iter([1.0, 2.0])
            .looped(2)
            .volume(0.5)
            .samples()
            .collect();
        assert_eq!(values, vec![0.5, 1.0, 0.5, 1.0]);
    }

    #[test]
    fn test_hold_last() {
        let mut held = repeat(0.5, 1).hold_last().unwrap();
        assert_eq!(held.next_sample(), Some(0.5));
        assert_eq!(held.next_sample(), Some(0.5));
        assert!(repeat(0.5, 0).hold_last().is_err());
    }

    #[test]
    fn test_macros_accept_mixed_types() {
        let queued: Vec<f64> = crate::queue!(repeat(0.25, 1), from_iter([0.5]))
            .samples()
            .collect();
        assert_eq!(queued, vec![0.25, 0.5]);

        let mut mixed = crate::mix!(repeat(1.0, None), ramp(0.0, 2.0, 2));
        assert_eq!(mixed.next_sample(), Some(0.5));
        assert_eq!(mixed.next_sample(), Some(1.0));
        assert_eq!(mixed.next_sample(), Some(0.5));

        let interleaved: Vec<f64> = crate::multi_channel!(sine(0.0, 8.0), repeat(1.0, 1))
            .samples()
            .collect();
        assert_eq!(interleaved, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_into_stream_bridges_sync_pipeline() {
        let values: Vec<f64> = block_on(ramp(0.0, 1.0, 4).limit(2).into_stream().collect());
        assert_eq!(values, vec![0.0, 0.25]);
    }
}
