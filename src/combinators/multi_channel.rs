//! Round-robin interleave.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::Stream;
use tracing::debug;

use crate::Signal;

/// Interleaves mono channels into one frame-ordered signal.
///
/// Created by [`multi_channel`]. Output order is `ch0, ch1, .., chN-1, ch0,
/// ..`. Unlike [`Mix`](crate::Mix), the whole signal ends as soon as any
/// one channel does, which can leave the final frame incomplete.
#[derive(Debug, Clone)]
pub struct MultiChannel<S> {
    channels: Vec<S>,
    cursor: usize,
}

/// Interleaves `channels`, one sample from each per frame.
///
/// # Examples
///
/// ```
/// use riffle::{SignalExt, multi_channel, repeat};
///
/// let values: Vec<f64> = multi_channel([repeat(1.0, 2), repeat(-1.0, 5)]).samples().collect();
/// assert_eq!(values, vec![1.0, -1.0, 1.0, -1.0]);
/// ```
pub fn multi_channel<I>(channels: I) -> MultiChannel<I::Item>
where
    I: IntoIterator,
{
    MultiChannel {
        channels: channels.into_iter().collect(),
        cursor: 0,
    }
}

impl<S> MultiChannel<S> {
    /// Number of interleaved channels, or zero once any of them has ended.
    pub fn channels(&self) -> usize {
        self.channels.len()
    }

    fn advance(&mut self, sample: Option<f64>) -> Option<f64> {
        match sample {
            Some(sample) => {
                self.cursor = (self.cursor + 1) % self.channels.len();
                Some(sample)
            }
            None => {
                debug!(channel = self.cursor, "interleaved channel ended");
                self.channels.clear();
                None
            }
        }
    }
}

impl<S: Signal> Signal for MultiChannel<S> {
    fn next_sample(&mut self) -> Option<f64> {
        let sample = self.channels.get_mut(self.cursor)?.next_sample();
        self.advance(sample)
    }
}

impl<S: Stream<Item = f64> + Unpin> Stream for MultiChannel<S> {
    type Item = f64;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<f64>> {
        let this = self.get_mut();
        let Some(channel) = this.channels.get_mut(this.cursor) else {
            return Poll::Ready(None);
        };
        let sample = ready!(Pin::new(channel).poll_next(cx));
        Poll::Ready(this.advance(sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoxedSignal, SignalExt, from_iter, repeat};
    use futures::StreamExt;
    use futures::executor::block_on;
    use futures::stream;

    #[test]
    fn test_interleaves_frames() {
        let values: Vec<f64> = multi_channel([
            from_iter(vec![1.0, 2.0]),
            from_iter(vec![10.0, 20.0]),
            from_iter(vec![100.0, 200.0]),
        ])
        .samples()
        .collect();
        assert_eq!(values, vec![1.0, 10.0, 100.0, 2.0, 20.0, 200.0]);
    }

    #[test]
    fn test_ends_when_any_channel_ends() {
        // Second channel runs out mid-frame; the first channel's sample for
        // that frame has already been yielded.
        let values: Vec<f64> = multi_channel([repeat(0.5, None), repeat(-0.5, 2)])
            .samples()
            .collect();
        assert_eq!(values, vec![0.5, -0.5, 0.5, -0.5, 0.5]);
    }

    #[test]
    fn test_stays_exhausted_after_first_end() {
        let mut signal = multi_channel([repeat(1.0, 1), repeat(2.0, None)]);
        assert_eq!(signal.next_sample(), Some(1.0));
        assert_eq!(signal.next_sample(), Some(2.0));
        assert_eq!(signal.next_sample(), None);
        assert_eq!(signal.channels(), 0);
        assert_eq!(signal.next_sample(), None);
    }

    #[test]
    fn test_no_channels() {
        let mut signal = multi_channel(Vec::<BoxedSignal>::new());
        assert_eq!(signal.next_sample(), None);
    }

    #[test]
    fn test_single_channel_is_pass_through() {
        let values: Vec<f64> = multi_channel([from_iter(vec![0.1, 0.2, 0.3])])
            .samples()
            .collect();
        assert_eq!(values, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_multi_channel_stream() {
        let channels = vec![
            stream::iter(vec![1.0, 2.0, 3.0]),
            stream::iter(vec![-1.0, -2.0]),
        ];
        let values: Vec<f64> = block_on(multi_channel(channels).collect());
        assert_eq!(values, vec![1.0, -1.0, 2.0, -2.0, 3.0]);
    }
}
