//! Stream configuration and the device boundary.
//!
//! Opening and driving real hardware is left to a [`StreamWriter`] or
//! [`StreamReader`] implementation (or any [`futures::Sink`] or
//! [`futures::Stream`] of buffers). This module only describes the stream,
//! pumps chunked buffers out to a device and pulls captured ones back in.

use std::fmt::Display;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::{Sink, SinkExt, Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::format::{AudioBuffer, SampleFormat};

pub const DEFAULT_CHANNELS: u16 = 1;
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
pub const DEFAULT_FRAMES_PER_BUFFER: usize = 1024;

/// Shape of an audio stream: channel count, rate, encoding and block size.
///
/// `frames_per_buffer` is the exact length, in samples, of every buffer
/// handed to a writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    pub channels: u16,
    pub sample_rate: u32,
    pub format: SampleFormat,
    pub frames_per_buffer: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            channels: DEFAULT_CHANNELS,
            sample_rate: DEFAULT_SAMPLE_RATE,
            format: SampleFormat::default(),
            frames_per_buffer: DEFAULT_FRAMES_PER_BUFFER,
        }
    }
}

impl StreamOptions {
    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_format(mut self, format: SampleFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_frames_per_buffer(mut self, frames_per_buffer: usize) -> Self {
        self.frames_per_buffer = frames_per_buffer;
        self
    }

    /// Rejects option sets no device could open.
    pub fn validate(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(Error::invalid_input("stream needs at least one channel"));
        }
        if self.sample_rate == 0 {
            return Err(Error::invalid_input("sample rate must be positive"));
        }
        if self.frames_per_buffer == 0 {
            return Err(Error::invalid_input("frames per buffer must be at least 1"));
        }
        Ok(())
    }

    /// Number of whole buffers that fit within `limit`.
    ///
    /// ```
    /// use riffle::{StopAfter, StreamOptions};
    ///
    /// let options = StreamOptions::default()
    ///     .with_sample_rate(48000)
    ///     .with_frames_per_buffer(480);
    /// assert_eq!(options.max_chunks(&StopAfter::seconds(1.5)), 150);
    /// ```
    pub fn max_chunks(&self, limit: &StopAfter) -> usize {
        let samples = limit.samples + limit.total_seconds() * self.sample_rate as f64;
        let chunks = limit.chunks + samples / self.frames_per_buffer as f64;
        chunks.floor().max(0.0) as usize
    }
}

/// A playback length, as a sum of durations, sample counts and buffer counts.
///
/// Every field defaults to zero and the fields add up, so
/// `StopAfter { minutes: 1.0, seconds: 30.0, ..Default::default() }` is
/// ninety seconds. Convert with [`StreamOptions::max_chunks`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StopAfter {
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
    pub milliseconds: f64,
    pub samples: f64,
    pub chunks: f64,
}

impl StopAfter {
    pub fn seconds(seconds: f64) -> Self {
        Self {
            seconds,
            ..Default::default()
        }
    }

    pub fn samples(samples: usize) -> Self {
        Self {
            samples: samples as f64,
            ..Default::default()
        }
    }

    pub fn chunks(chunks: usize) -> Self {
        Self {
            chunks: chunks as f64,
            ..Default::default()
        }
    }

    /// The time-based fields folded into seconds.
    pub fn total_seconds(&self) -> f64 {
        (self.hours * 60.0 + self.minutes) * 60.0 + self.seconds + self.milliseconds / 1000.0
    }
}

/// The device side of playback: accepts one full buffer at a time.
pub trait StreamWriter {
    /// Exact length every written buffer must have.
    fn frames_per_buffer(&self) -> usize;

    /// Blocks until `buffer` has been handed to the device.
    fn write(&mut self, buffer: &AudioBuffer) -> Result<()>;
}

impl<W: StreamWriter + ?Sized> StreamWriter for &mut W {
    fn frames_per_buffer(&self) -> usize {
        (**self).frames_per_buffer()
    }

    fn write(&mut self, buffer: &AudioBuffer) -> Result<()> {
        (**self).write(buffer)
    }
}

fn check_length(buffer: &AudioBuffer, frames_per_buffer: usize) -> Result<()> {
    if buffer.len() != frames_per_buffer {
        return Err(Error::invalid_input(format!(
            "buffer length ({}) does not match frames per buffer ({frames_per_buffer})",
            buffer.len()
        )));
    }
    Ok(())
}

fn within_limit(written: usize, max_chunks: Option<usize>) -> bool {
    max_chunks.is_none_or(|max| written < max)
}

/// Writes `buffers` to `writer` until they run out or `max_chunks` is reached.
///
/// The limit is checked before each pull, so an endless source is never
/// pulled past the last buffer that will be written.
///
/// # Returns
///
/// The number of buffers written.
///
/// # Errors
///
/// [`Error::InvalidInput`] for a buffer of the wrong length, or whatever
/// the writer reports. Playback stops at the first error.
pub fn play_from<W, I>(mut writer: W, buffers: I, max_chunks: Option<usize>) -> Result<usize>
where
    W: StreamWriter,
    I: IntoIterator<Item = AudioBuffer>,
{
    let frames_per_buffer = writer.frames_per_buffer();
    info!(frames_per_buffer, ?max_chunks, "playback started");

    let mut buffers = buffers.into_iter();
    let mut written = 0;
    while within_limit(written, max_chunks) {
        let Some(buffer) = buffers.next() else {
            break;
        };
        check_length(&buffer, frames_per_buffer)?;
        writer.write(&buffer).inspect_err(|err| {
            warn!(chunk = written, error = %err, "buffer write failed");
        })?;
        written += 1;
    }

    debug!(written, "playback finished");
    Ok(written)
}

/// Async counterpart of [`play_from`], writing into any [`Sink`] of buffers.
///
/// The sink is closed once playback ends normally. Sink errors surface as
/// [`Error::Device`].
pub async fn play_from_async<K, S>(
    sink: &mut K,
    mut buffers: S,
    frames_per_buffer: usize,
    max_chunks: Option<usize>,
) -> Result<usize>
where
    K: Sink<AudioBuffer> + Unpin,
    K::Error: Display,
    S: Stream<Item = AudioBuffer> + Unpin,
{
    info!(frames_per_buffer, ?max_chunks, "async playback started");

    let mut written = 0;
    while within_limit(written, max_chunks) {
        let Some(buffer) = buffers.next().await else {
            break;
        };
        check_length(&buffer, frames_per_buffer)?;
        sink.send(buffer).await.map_err(|err| {
            warn!(chunk = written, error = %err, "buffer write failed");
            Error::Device(err.to_string())
        })?;
        written += 1;
    }
    sink.close()
        .await
        .map_err(|err| Error::Device(err.to_string()))?;

    debug!(written, "async playback finished");
    Ok(written)
}

/// The device side of capture: hands over one full buffer at a time.
pub trait StreamReader {
    /// Exact length every read buffer must have.
    fn frames_per_buffer(&self) -> usize;

    /// Blocks until the device has a full buffer.
    ///
    /// `Ok(None)` means the device has stopped and nothing more will come.
    fn read(&mut self) -> Result<Option<AudioBuffer>>;
}

impl<R: StreamReader + ?Sized> StreamReader for &mut R {
    fn frames_per_buffer(&self) -> usize {
        (**self).frames_per_buffer()
    }

    fn read(&mut self) -> Result<Option<AudioBuffer>> {
        (**self).read()
    }
}

/// Buffers captured from a [`StreamReader`] or a [`Stream`] of buffers.
///
/// Created by [`record`] or [`record_async`]. Iterate it (reader source) or
/// poll it as a [`Stream`] (async source). Every item is a buffer of exactly
/// `frames_per_buffer` samples; any other length ends the recording with
/// [`Error::InvalidInput`]. Like playback, the chunk limit is checked before
/// each pull, and nothing is pulled after an error.
#[derive(Debug)]
pub struct Recording<R> {
    source: R,
    frames_per_buffer: usize,
    max_chunks: Option<usize>,
    captured: usize,
    done: bool,
}

/// Captures buffers from `reader` until it stops or `max_chunks` is reached.
///
/// # Examples
///
/// ```
/// use riffle::{AudioBuffer, StreamReader, record};
///
/// struct Silence;
///
/// impl StreamReader for Silence {
///     fn frames_per_buffer(&self) -> usize {
///         4
///     }
///
///     fn read(&mut self) -> riffle::Result<Option<AudioBuffer>> {
///         Ok(Some(AudioBuffer::Float32(vec![0.0; 4])))
///     }
/// }
///
/// let buffers = record(Silence, Some(3)).collect::<riffle::Result<Vec<_>>>()?;
/// assert_eq!(buffers.len(), 3);
/// # Ok::<(), riffle::Error>(())
/// ```
pub fn record<R: StreamReader>(reader: R, max_chunks: Option<usize>) -> Recording<R> {
    let frames_per_buffer = reader.frames_per_buffer();
    info!(frames_per_buffer, ?max_chunks, "recording started");
    Recording::new(reader, frames_per_buffer, max_chunks)
}

/// Async counterpart of [`record`], capturing from any [`Stream`] of buffers.
pub fn record_async<S>(
    source: S,
    frames_per_buffer: usize,
    max_chunks: Option<usize>,
) -> Recording<S>
where
    S: Stream<Item = AudioBuffer> + Unpin,
{
    info!(frames_per_buffer, ?max_chunks, "async recording started");
    Recording::new(source, frames_per_buffer, max_chunks)
}

impl<R> Recording<R> {
    fn new(source: R, frames_per_buffer: usize, max_chunks: Option<usize>) -> Self {
        Self {
            source,
            frames_per_buffer,
            max_chunks,
            captured: 0,
            done: false,
        }
    }

    /// Buffers handed out so far.
    pub fn captured(&self) -> usize {
        self.captured
    }

    fn exhausted(&self) -> bool {
        self.done || !within_limit(self.captured, self.max_chunks)
    }

    /// Checks one pulled buffer; `None` ends the recording.
    fn accept(&mut self, read: Result<Option<AudioBuffer>>) -> Option<Result<AudioBuffer>> {
        let buffer = match read {
            Ok(Some(buffer)) => buffer,
            Ok(None) => {
                debug!(captured = self.captured, "recording finished");
                self.done = true;
                return None;
            }
            Err(err) => {
                warn!(chunk = self.captured, error = %err, "buffer read failed");
                self.done = true;
                return Some(Err(err));
            }
        };
        if let Err(err) = check_length(&buffer, self.frames_per_buffer) {
            self.done = true;
            return Some(Err(err));
        }
        self.captured += 1;
        Some(Ok(buffer))
    }
}

impl<R: StreamReader> Iterator for Recording<R> {
    type Item = Result<AudioBuffer>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted() {
            return None;
        }
        let read = self.source.read();
        self.accept(read)
    }
}

impl<S: Stream<Item = AudioBuffer> + Unpin> Stream for Recording<S> {
    type Item = Result<AudioBuffer>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.exhausted() {
            return Poll::Ready(None);
        }
        let buffer = ready!(Pin::new(&mut this.source).poll_next(cx));
        Poll::Ready(this.accept(Ok(buffer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{chunker, repeat};
    use futures::TryStreamExt;
    use futures::executor::block_on;
    use futures::stream;
    use std::collections::VecDeque;

    /// Records every buffer; fails on the write with index `fail_at`.
    struct RecordingWriter {
        frames: usize,
        written: Vec<AudioBuffer>,
        fail_at: Option<usize>,
    }

    impl RecordingWriter {
        fn new(frames: usize) -> Self {
            Self {
                frames,
                written: Vec::new(),
                fail_at: None,
            }
        }
    }

    impl StreamWriter for RecordingWriter {
        fn frames_per_buffer(&self) -> usize {
            self.frames
        }

        fn write(&mut self, buffer: &AudioBuffer) -> Result<()> {
            if self.fail_at == Some(self.written.len()) {
                return Err(Error::Device("device unplugged".into()));
            }
            self.written.push(buffer.clone());
            Ok(())
        }
    }

    /// Hands out queued buffers, then reports the device stopped.
    struct ReplayReader {
        frames: usize,
        queued: VecDeque<Result<AudioBuffer>>,
        reads: usize,
    }

    impl ReplayReader {
        fn new(frames: usize, buffers: Vec<AudioBuffer>) -> Self {
            Self {
                frames,
                queued: buffers.into_iter().map(Ok).collect(),
                reads: 0,
            }
        }
    }

    impl StreamReader for ReplayReader {
        fn frames_per_buffer(&self) -> usize {
            self.frames
        }

        fn read(&mut self) -> Result<Option<AudioBuffer>> {
            self.reads += 1;
            self.queued.pop_front().transpose()
        }
    }

    #[test]
    fn test_defaults() {
        let options = StreamOptions::default();
        assert_eq!(options.channels, 1);
        assert_eq!(options.sample_rate, 44100);
        assert_eq!(options.format, SampleFormat::Float32);
        assert_eq!(options.frames_per_buffer, 1024);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zeroes() {
        let base = StreamOptions::default();
        for bad in [
            base.with_channels(0),
            base.with_sample_rate(0),
            base.with_frames_per_buffer(0),
        ] {
            assert!(matches!(bad.validate(), Err(Error::InvalidInput(_))));
        }
    }

    #[test]
    fn test_max_chunks_sums_fields() {
        let options = StreamOptions::default()
            .with_sample_rate(1000)
            .with_frames_per_buffer(100);
        let limit = StopAfter {
            minutes: 1.0,
            seconds: 1.0,
            milliseconds: 500.0,
            samples: 50.0,
            chunks: 2.0,
            ..Default::default()
        };
        // 61.5 s -> 61500 samples, +50 -> 615.5 chunks, +2 -> floor 617
        assert_eq!(options.max_chunks(&limit), 617);
        assert_eq!(options.max_chunks(&StopAfter::default()), 0);
        assert_eq!(options.max_chunks(&StopAfter::samples(99)), 0);
        assert_eq!(options.max_chunks(&StopAfter::chunks(3)), 3);
    }

    #[test]
    fn test_total_seconds() {
        let limit = StopAfter {
            hours: 1.0,
            minutes: 2.0,
            seconds: 3.0,
            milliseconds: 250.0,
            ..Default::default()
        };
        assert_eq!(limit.total_seconds(), 3723.25);
    }

    #[test]
    fn test_play_until_source_ends() {
        let options = StreamOptions::default().with_frames_per_buffer(4);
        let mut writer = RecordingWriter::new(4);
        let buffers = chunker(repeat(0.0, 10), &options).unwrap();
        assert_eq!(play_from(&mut writer, buffers, None).unwrap(), 2);
        assert_eq!(writer.written.len(), 2);
    }

    #[test]
    fn test_play_stops_at_limit() {
        let options = StreamOptions::default().with_frames_per_buffer(8);
        let mut writer = RecordingWriter::new(8);
        let buffers = chunker(repeat(0.5, None), &options).unwrap();
        assert_eq!(play_from(&mut writer, buffers, Some(5)).unwrap(), 5);
        assert_eq!(writer.written.len(), 5);
    }

    #[test]
    fn test_limit_checked_before_pull() {
        let mut pulled = 0;
        let buffers = std::iter::from_fn(|| {
            pulled += 1;
            Some(AudioBuffer::Float32(vec![0.0; 2]))
        });
        let written = play_from(RecordingWriter::new(2), buffers, Some(3)).unwrap();
        assert_eq!(written, 3);
        assert_eq!(pulled, 3);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let buffers = vec![AudioBuffer::Int16(vec![0; 3])];
        let result = play_from(RecordingWriter::new(4), buffers, None);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_writer_failure_stops_playback() {
        let mut writer = RecordingWriter::new(1);
        writer.fail_at = Some(2);
        let buffers = vec![AudioBuffer::Uint8(vec![128]); 5];
        let result = play_from(&mut writer, buffers, None);
        assert!(matches!(result, Err(Error::Device(_))));
        assert_eq!(writer.written.len(), 2);
    }

    #[test]
    fn test_play_async_into_vec_sink() {
        let options = StreamOptions::default()
            .with_format(SampleFormat::Int16)
            .with_frames_per_buffer(2);
        let buffers = chunker(stream::iter(vec![1.0; 9]), &options).unwrap();
        let mut sink: Vec<AudioBuffer> = Vec::new();
        let written = block_on(play_from_async(&mut sink, buffers, 2, Some(3))).unwrap();
        assert_eq!(written, 3);
        assert_eq!(sink, vec![AudioBuffer::Int16(vec![32767, 32767]); 3]);
    }

    #[test]
    fn test_play_async_rejects_wrong_length() {
        let buffers = stream::iter(vec![AudioBuffer::Float32(vec![0.0; 5])]);
        let mut sink: Vec<AudioBuffer> = Vec::new();
        let result = block_on(play_from_async(&mut sink, buffers, 4, None));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_record_until_reader_stops() {
        let mut reader = ReplayReader::new(2, vec![AudioBuffer::Int16(vec![1, -1]); 3]);
        let mut recording = record(&mut reader, None);
        let buffers: Vec<AudioBuffer> = recording.by_ref().map(Result::unwrap).collect();
        assert_eq!(buffers.len(), 3);
        assert_eq!(recording.captured(), 3);
        assert!(recording.next().is_none());
    }

    #[test]
    fn test_record_limit_checked_before_read() {
        let mut reader = ReplayReader::new(1, vec![AudioBuffer::Uint8(vec![128]); 10]);
        let options = StreamOptions::default()
            .with_sample_rate(4)
            .with_frames_per_buffer(1);
        let max_chunks = options.max_chunks(&StopAfter::seconds(1.0));
        let buffers = record(&mut reader, Some(max_chunks)).collect::<Result<Vec<_>>>();
        assert_eq!(buffers.unwrap().len(), 4);
        assert_eq!(reader.reads, 4);

        let nothing = record(&mut reader, Some(0)).count();
        assert_eq!(nothing, 0);
        assert_eq!(reader.reads, 4);
    }

    #[test]
    fn test_record_rejects_wrong_length() {
        let buffers = vec![
            AudioBuffer::Float32(vec![0.0; 4]),
            AudioBuffer::Float32(vec![0.0; 3]),
            AudioBuffer::Float32(vec![0.0; 4]),
        ];
        let mut reader = ReplayReader::new(4, buffers);
        let mut recording = record(&mut reader, None);
        assert!(matches!(recording.next(), Some(Ok(_))));
        let second = recording.next();
        assert!(matches!(second, Some(Err(Error::InvalidInput(_)))));
        assert!(recording.next().is_none());
        assert_eq!(reader.reads, 2);
    }

    #[test]
    fn test_read_failure_stops_recording() {
        let mut reader = ReplayReader::new(1, vec![AudioBuffer::Int8(vec![0]); 3]);
        reader.queued[1] = Err(Error::Device("device unplugged".into()));
        let results: Vec<_> = record(&mut reader, None).collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(results[1], Err(Error::Device(_))));
        assert_eq!(reader.reads, 2);
    }

    #[test]
    fn test_record_async_from_stream() {
        let source = stream::iter(vec![AudioBuffer::Int32(vec![0; 2]); 5]);
        let recording = record_async(source, 2, Some(3));
        let buffers: Vec<AudioBuffer> = block_on(recording.try_collect()).unwrap();
        assert_eq!(buffers, vec![AudioBuffer::Int32(vec![0; 2]); 3]);
    }

    #[test]
    fn test_record_async_rejects_wrong_length() {
        let source = stream::iter(vec![AudioBuffer::Int16(vec![0; 5])]);
        let result: Result<Vec<AudioBuffer>> =
            block_on(record_async(source, 4, None).try_collect());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
