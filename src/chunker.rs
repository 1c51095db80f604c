//! Buffer chunking and quantization.
//!
//! A [`Chunker`] pulls samples from the root of a signal tree, remaps
//! each one into a [`SampleFormat`]'s numeric range and groups them into
//! [`AudioBuffer`]s of exactly `frames_per_buffer` samples. If the source
//! runs out partway through a buffer, that buffer is dropped: downstream
//! writers never see a short block.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tracing::debug;

use crate::Signal;
use crate::error::{Error, Result};
use crate::format::{AudioBuffer, SampleFormat};
use crate::stream::StreamOptions;

/// Groups quantized samples into fixed-size buffers.
///
/// Iterate it (sync source) or poll it as a [`Stream`] (async source).
#[derive(Debug)]
pub struct Chunker<S> {
    source: S,
    format: SampleFormat,
    frames_per_buffer: usize,
    /// Buffer being filled; survives across `Pending` polls
    pending: Option<AudioBuffer>,
    done: bool,
}

/// Chunks `source` using the format and block size from `options`.
///
/// # Examples
///
/// ```
/// use riffle::{SampleFormat, StreamOptions, chunker, repeat};
///
/// let options = StreamOptions::default()
///     .with_format(SampleFormat::Int16)
///     .with_frames_per_buffer(4);
/// let buffers: Vec<_> = chunker(repeat(1.0, 10), &options)?.collect();
/// // 10 samples make two full buffers; the last two samples are dropped
/// assert_eq!(buffers.len(), 2);
/// assert!(buffers.iter().all(|b| b.len() == 4));
/// # Ok::<(), riffle::Error>(())
/// ```
pub fn chunker<S>(source: S, options: &StreamOptions) -> Result<Chunker<S>> {
    Chunker::new(source, options.format, options.frames_per_buffer)
}

impl<S> Chunker<S> {
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if `frames_per_buffer` is zero.
    pub fn new(source: S, format: SampleFormat, frames_per_buffer: usize) -> Result<Self> {
        if frames_per_buffer == 0 {
            return Err(Error::invalid_input("frames per buffer must be at least 1"));
        }
        Ok(Self {
            source,
            format,
            frames_per_buffer,
            pending: None,
            done: false,
        })
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    pub fn frames_per_buffer(&self) -> usize {
        self.frames_per_buffer
    }

    /// Adds one pulled sample to the buffer in progress.
    ///
    /// Returns the buffer once it is full. On exhaustion the partial
    /// buffer is discarded and the chunker ends.
    fn accept(&mut self, sample: Option<f64>) -> Option<Option<AudioBuffer>> {
        let Some(sample) = sample else {
            let dropped = self.pending.take().map_or(0, |b| b.len());
            if dropped > 0 {
                debug!(
                    dropped,
                    frames_per_buffer = self.frames_per_buffer,
                    "source ended mid-buffer, discarding partial buffer"
                );
            }
            self.done = true;
            return Some(None);
        };

        let (format, capacity) = (self.format, self.frames_per_buffer);
        let buffer = self
            .pending
            .get_or_insert_with(|| AudioBuffer::with_capacity(format, capacity));
        buffer.push_sample(sample);
        if buffer.len() == self.frames_per_buffer {
            return Some(self.pending.take());
        }
        None
    }
}

impl<S: Signal> Iterator for Chunker<S> {
    type Item = AudioBuffer;

    fn next(&mut self) -> Option<AudioBuffer> {
        if self.done {
            return None;
        }
        loop {
            let sample = self.source.next_sample();
            if let Some(result) = self.accept(sample) {
                return result;
            }
        }
    }
}

impl<S: Stream<Item = f64> + Unpin> Stream for Chunker<S> {
    type Item = AudioBuffer;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<AudioBuffer>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }
        loop {
            let sample = match Pin::new(&mut this.source).poll_next(cx) {
                Poll::Ready(sample) => sample,
                Poll::Pending => return Poll::Pending,
            };
            if let Some(result) = this.accept(sample) {
                return Poll::Ready(result);
            }
        }
    }
}
