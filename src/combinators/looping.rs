//! Bounded and unbounded replay.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::Stream;
use tracing::debug;

use crate::Signal;

/// Replays a source a number of times, or forever.
///
/// Created by [`looped`] or [`SignalExt::looped`](crate::SignalExt::looped).
///
/// The first pass streams straight from the source while recording every
/// sample. Once the source ends, the recording is replayed for the
/// remaining passes. An endless source is therefore a plain pass-through
/// (and its recording grows without bound). An empty source gives empty
/// passes, so the loop ends without producing anything.
#[derive(Debug, Clone)]
pub struct Loop<S> {
    /// `None` once the recording pass is over
    source: Option<S>,
    recording: Vec<f64>,
    cursor: usize,
    /// Passes not yet completed, or `None` to loop forever
    passes_left: Option<usize>,
}

/// Plays `source` `times` times in total (`None` loops forever).
///
/// # Examples
///
/// ```
/// use riffle::{SignalExt, from_iter, looped};
///
/// let values: Vec<f64> = looped(from_iter([1.0, 2.0]), 3).samples().collect();
/// assert_eq!(values, vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
/// ```
pub fn looped<S>(source: S, times: impl Into<Option<usize>>) -> Loop<S> {
    Loop {
        source: Some(source),
        recording: Vec::new(),
        cursor: 0,
        passes_left: times.into(),
    }
}

impl<S> Loop<S> {
    /// True while the first pass is still pulling from the source.
    pub fn is_recording(&self) -> bool {
        self.source.is_some()
    }

    fn done(&self) -> bool {
        self.passes_left == Some(0)
    }

    fn complete_pass(&mut self) {
        if let Some(passes) = &mut self.passes_left {
            *passes -= 1;
        }
    }

    /// Source ran out: switch from recording to replay.
    fn finish_recording(&mut self) {
        self.source = None;
        self.complete_pass();
        debug!(
            recorded = self.recording.len(),
            passes_left = ?self.passes_left,
            "loop source exhausted, replaying"
        );
    }

    fn record(&mut self, sample: f64) -> f64 {
        self.recording.push(sample);
        sample
    }

    fn replay(&mut self) -> Option<f64> {
        while !self.done() && !self.recording.is_empty() {
            if let Some(&sample) = self.recording.get(self.cursor) {
                self.cursor += 1;
                return Some(sample);
            }
            self.cursor = 0;
            self.complete_pass();
        }
        None
    }
}

impl<S: Signal> Signal for Loop<S> {
    fn next_sample(&mut self) -> Option<f64> {
        if self.done() {
            return None;
        }
        if let Some(source) = self.source.as_mut() {
            match source.next_sample() {
                Some(sample) => return Some(self.record(sample)),
                None => self.finish_recording(),
            }
        }
        self.replay()
    }
}

impl<S: Stream<Item = f64> + Unpin> Stream for Loop<S> {
    type Item = f64;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<f64>> {
        let this = self.get_mut();
        if this.done() {
            return Poll::Ready(None);
        }
        if let Some(source) = this.source.as_mut() {
            match ready!(Pin::new(source).poll_next(cx)) {
                Some(sample) => return Poll::Ready(Some(this.record(sample))),
                None => this.finish_recording(),
            }
        }
        Poll::Ready(this.replay())
    }
}
