//! Constant-value generator.

use crate::Signal;
use crate::signal::ready_stream;

/// Produces the same value a fixed number of times, or forever.
///
/// Created by [`repeat`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repeat {
    value: f64,
    /// `None` repeats forever
    remaining: Option<usize>,
}

/// Repeats `value` exactly `times` times, or forever when `times` is `None`.
///
/// # Examples
///
/// ```
/// use riffle::{SignalExt, repeat};
///
/// let counted: Vec<f64> = repeat(0.5, 3).samples().collect();
/// assert_eq!(counted, vec![0.5, 0.5, 0.5]);
///
/// let endless = repeat(1.0, None);
/// assert_eq!(endless.limit(1000).samples().count(), 1000);
/// ```
pub fn repeat(value: f64, times: impl Into<Option<usize>>) -> Repeat {
    Repeat {
        value,
        remaining: times.into(),
    }
}

impl Repeat {
    /// The repeated value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Samples left to produce, or `None` for an endless repeat.
    pub fn remaining(&self) -> Option<usize> {
        self.remaining
    }
}

impl Signal for Repeat {
    fn next_sample(&mut self) -> Option<f64> {
        match &mut self.remaining {
            None => Some(self.value),
            Some(0) => None,
            Some(n) => {
                *n -= 1;
                Some(self.value)
            }
        }
    }

    fn process(&mut self, buffer: &mut [f64]) -> usize {
        let count = match self.remaining {
            None => buffer.len(),
            Some(n) => n.min(buffer.len()),
        };
        buffer[..count].fill(self.value);
        if let Some(n) = &mut self.remaining {
            *n -= count;
        }
        count
    }
}

ready_stream!(impl[] Repeat);
