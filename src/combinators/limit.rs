//! Truncation.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::Stream;

use crate::Signal;

/// Yields at most `n` samples of a source.
///
/// Created by [`limit`] or [`SignalExt::limit`](crate::SignalExt::limit).
/// The source is never pulled past the `n`-th sample.
#[derive(Debug, Clone)]
pub struct Limit<S> {
    source: S,
    remaining: usize,
}

/// Truncates `source` to its first `n` samples.
pub fn limit<S>(source: S, n: usize) -> Limit<S> {
    Limit {
        source,
        remaining: n,
    }
}

impl<S> Limit<S> {
    /// Samples still allowed through.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Unwraps the source, however far it has been pulled.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: Signal> Signal for Limit<S> {
    fn next_sample(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        let sample = self.source.next_sample()?;
        self.remaining -= 1;
        Some(sample)
    }
}

impl<S: Stream<Item = f64> + Unpin> Stream for Limit<S> {
    type Item = f64;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<f64>> {
        let this = self.get_mut();
        if this.remaining == 0 {
            return Poll::Ready(None);
        }
        let sample = ready!(Pin::new(&mut this.source).poll_next(cx));
        if sample.is_some() {
            this.remaining -= 1;
        }
        Poll::Ready(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SignalExt, from_iter, repeat};
    use futures::StreamExt;
    use futures::executor::block_on;

    #[test]
    fn test_limit_infinite() {
        let values: Vec<f64> = limit(repeat(0.5, None), 3).samples().collect();
        assert_eq!(values, vec![0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_limit_longer_than_source() {
        let values: Vec<f64> = limit(from_iter([1.0, 2.0]), 10).samples().collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_limit_zero() {
        let mut signal = limit(repeat(1.0, None), 0);
        assert_eq!(signal.next_sample(), None);
    }

    #[test]
    fn test_limit_does_not_overpull() {
        let mut source = from_iter([1.0, 2.0, 3.0]);
        let taken: Vec<f64> = limit(&mut source, 2).samples().collect();
        assert_eq!(taken, vec![1.0, 2.0]);
        assert_eq!(source.next_sample(), Some(3.0));
    }

    #[test]
    fn test_limit_preserves_order_for_all_n() {
        let source = [0.1, 0.2, 0.3, 0.4, 0.5];
        for n in 0..8 {
            let values: Vec<f64> = limit(from_iter(source), n).samples().collect();
            assert_eq!(values.len(), n.min(source.len()));
            assert_eq!(values[..], source[..values.len()]);
        }
    }

    #[test]
    fn test_limit_stream() {
        let stream = limit(futures::stream::repeat(0.25), 4);
        let values: Vec<f64> = block_on(stream.collect());
        assert_eq!(values, vec![0.25; 4]);
    }
}
