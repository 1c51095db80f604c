//! Sequential concatenation.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::Stream;

use crate::Signal;

/// Plays each child to exhaustion before starting the next.
///
/// Created by [`queue`]. Finished children are dropped as soon as they
/// run out. A child that never ends makes everything queued after it
/// unreachable.
#[derive(Debug, Clone)]
pub struct Queue<S> {
    children: VecDeque<S>,
}

/// Concatenates `children` in order.
///
/// # Examples
///
/// ```
/// use riffle::{SignalExt, queue, repeat};
///
/// let values: Vec<f64> = queue([repeat(1.0, 2), repeat(3.0, 1)]).samples().collect();
/// assert_eq!(values, vec![1.0, 1.0, 3.0]);
/// ```
pub fn queue<I>(children: I) -> Queue<I::Item>
where
    I: IntoIterator,
{
    Queue {
        children: children.into_iter().collect(),
    }
}

impl<S> Queue<S> {
    /// Appends another child behind the ones already queued.
    pub fn push(&mut self, child: S) {
        self.children.push_back(child);
    }

    /// Children not yet exhausted, including the one playing.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<S: Signal> Signal for Queue<S> {
    fn next_sample(&mut self) -> Option<f64> {
        while let Some(current) = self.children.front_mut() {
            if let Some(sample) = current.next_sample() {
                return Some(sample);
            }
            self.children.pop_front();
        }
        None
    }
}

impl<S: Stream<Item = f64> + Unpin> Stream for Queue<S> {
    type Item = f64;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<f64>> {
        let this = self.get_mut();
        while let Some(current) = this.children.front_mut() {
            if let Some(sample) = ready!(Pin::new(current).poll_next(cx)) {
                return Poll::Ready(Some(sample));
            }
            this.children.pop_front();
        }
        Poll::Ready(None)
    }
}
