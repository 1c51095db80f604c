//! Parallel summation of voices.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tracing::debug;

use crate::Signal;

/// Sums parallel voices, scaled by how many were playing.
///
/// Created by [`mix`]. Each step pulls one sample from every voice still
/// playing and yields `sum / n`, where `n` is the number of voices that
/// were playing when the step began. A voice that ends during a step still
/// counts toward that step's divisor and is dropped afterwards. The mix
/// ends on the first step in which no voice produces a sample.
///
/// The async variant polls every pending voice on each wake-up and only
/// settles a step once all of them have answered, so the values are the
/// same as the synchronous ones.
#[derive(Debug, Clone)]
pub struct Mix<S> {
    voices: Vec<S>,
    /// Results of the step in progress, one slot per voice
    step: Vec<Option<Option<f64>>>,
}

/// Mixes `voices` into one signal.
///
/// # Examples
///
/// ```
/// use riffle::{SignalExt, mix, repeat};
///
/// // Second voice is endless; bound the mix to four steps
/// let values: Vec<f64> = mix([repeat(1.0, 2), repeat(3.0, None)]).limit(4).samples().collect();
/// assert_eq!(values, vec![2.0, 2.0, 1.5, 3.0]);
/// ```
pub fn mix<I>(voices: I) -> Mix<I::Item>
where
    I: IntoIterator,
{
    let voices: Vec<_> = voices.into_iter().collect();
    Mix {
        step: Vec::with_capacity(voices.len()),
        voices,
    }
}

impl<S> Mix<S> {
    /// Voices still playing.
    pub fn voices(&self) -> usize {
        self.voices.len()
    }

    /// Folds a completed step into one sample and drops voices that ended.
    fn settle(&mut self) -> Option<f64> {
        let playing = self.voices.len();
        let mut sum = 0.0;
        let mut results = self.step.drain(..);
        self.voices.retain(|_| match results.next().flatten().flatten() {
            Some(sample) => {
                sum += sample;
                true
            }
            None => false,
        });
        drop(results);

        let ended = playing - self.voices.len();
        if ended > 0 {
            debug!(ended, remaining = self.voices.len(), "mix voices ended");
        }
        if self.voices.is_empty() {
            return None;
        }
        Some(sum / playing as f64)
    }
}

impl<S: Signal> Signal for Mix<S> {
    fn next_sample(&mut self) -> Option<f64> {
        if self.voices.is_empty() {
            return None;
        }
        self.step.clear();
        for voice in &mut self.voices {
            self.step.push(Some(voice.next_sample()));
        }
        self.settle()
    }
}

impl<S: Stream<Item = f64> + Unpin> Stream for Mix<S> {
    type Item = f64;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<f64>> {
        let this = self.get_mut();
        if this.voices.is_empty() {
            return Poll::Ready(None);
        }
        this.step.resize(this.voices.len(), None);

        let mut waiting = false;
        for (voice, slot) in this.voices.iter_mut().zip(this.step.iter_mut()) {
            if slot.is_some() {
                continue;
            }
            match Pin::new(voice).poll_next(cx) {
                Poll::Ready(result) => *slot = Some(result),
                Poll::Pending => waiting = true,
            }
        }
        if waiting {
            return Poll::Pending;
        }
        Poll::Ready(this.settle())
    }
}
