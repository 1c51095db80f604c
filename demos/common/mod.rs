//! Common utilities for the audio demos.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample, StreamConfig};
use riffle::{AudioBuffer, Error, SampleFormat, StreamOptions, StreamReader, StreamWriter};

/// Plays chunked buffers through the default output device.
///
/// Buffers are dequantized back to `[-1, 1]` and queued; the cpal callback
/// drains the queue and pads with silence when it runs dry. `write`
/// blocks while more than a few buffers are already waiting.
pub struct CpalWriter {
    queue: Arc<Mutex<VecDeque<f64>>>,
    frames_per_buffer: usize,
    max_queued: usize,
    _stream: cpal::Stream,
}

impl CpalWriter {
    pub fn open(options: &StreamOptions) -> Result<Self> {
        options.validate()?;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow::anyhow!("No output device available"))?;
        let sample_format = device.default_output_config()?.sample_format();
        let config = StreamConfig {
            channels: options.channels,
            sample_rate: cpal::SampleRate(options.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let queue = Arc::new(Mutex::new(VecDeque::new()));
        let stream = match sample_format {
            cpal::SampleFormat::F32 => create_audio_stream::<f32>(&device, &config, queue.clone())?,
            cpal::SampleFormat::I16 => create_audio_stream::<i16>(&device, &config, queue.clone())?,
            cpal::SampleFormat::U16 => create_audio_stream::<u16>(&device, &config, queue.clone())?,
            sample_format => {
                return Err(anyhow::anyhow!(
                    "Unsupported sample format: {}",
                    sample_format
                ));
            }
        };

        Ok(Self {
            queue,
            frames_per_buffer: options.frames_per_buffer,
            max_queued: options.frames_per_buffer * 4,
            _stream: stream,
        })
    }

    fn queued(&self) -> riffle::Result<usize> {
        self.queue
            .lock()
            .map(|q| q.len())
            .map_err(|_| Error::Device("audio queue poisoned".into()))
    }

    /// Blocks until everything written so far has been played.
    pub fn drain(&self) -> riffle::Result<()> {
        while self.queued()? > 0 {
            thread::sleep(Duration::from_millis(10));
        }
        Ok(())
    }
}

impl StreamWriter for CpalWriter {
    fn frames_per_buffer(&self) -> usize {
        self.frames_per_buffer
    }

    fn write(&mut self, buffer: &AudioBuffer) -> riffle::Result<()> {
        while self.queued()? > self.max_queued {
            thread::sleep(Duration::from_millis(2));
        }
        let mut queue = self
            .queue
            .lock()
            .map_err(|_| Error::Device("audio queue poisoned".into()))?;
        queue.extend(buffer.dequantize());
        Ok(())
    }
}

/// Records buffers from the default input device.
///
/// The cpal callback appends every captured sample to a shared queue.
/// `read` blocks until a full buffer is waiting, then quantizes it into the
/// requested format.
pub struct CpalReader {
    queue: Arc<Mutex<VecDeque<f64>>>,
    format: SampleFormat,
    frames_per_buffer: usize,
    _stream: cpal::Stream,
}

impl CpalReader {
    pub fn open(options: &StreamOptions) -> Result<Self> {
        options.validate()?;

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| anyhow::anyhow!("No input device available"))?;
        let sample_format = device.default_input_config()?.sample_format();
        let config = StreamConfig {
            channels: options.channels,
            sample_rate: cpal::SampleRate(options.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let queue = Arc::new(Mutex::new(VecDeque::new()));
        let stream = match sample_format {
            cpal::SampleFormat::F32 => input_stream::<f32>(&device, &config, queue.clone())?,
            cpal::SampleFormat::I16 => input_stream::<i16>(&device, &config, queue.clone())?,
            cpal::SampleFormat::U16 => input_stream::<u16>(&device, &config, queue.clone())?,
            sample_format => {
                return Err(anyhow::anyhow!(
                    "Unsupported sample format: {}",
                    sample_format
                ));
            }
        };

        Ok(Self {
            queue,
            format: options.format,
            frames_per_buffer: options.frames_per_buffer,
            _stream: stream,
        })
    }
}

impl StreamReader for CpalReader {
    fn frames_per_buffer(&self) -> usize {
        self.frames_per_buffer
    }

    fn read(&mut self) -> riffle::Result<Option<AudioBuffer>> {
        let (format, frames) = (self.format, self.frames_per_buffer);
        loop {
            {
                let mut queue = self
                    .queue
                    .lock()
                    .map_err(|_| Error::Device("audio queue poisoned".into()))?;
                if queue.len() >= frames {
                    let mut buffer = AudioBuffer::with_capacity(format, frames);
                    for sample in queue.drain(..frames) {
                        buffer.push_sample(sample);
                    }
                    return Ok(Some(buffer));
                }
            }
            thread::sleep(Duration::from_millis(2));
        }
    }
}

/// Creates an input stream that pushes captured samples onto the shared queue.
fn input_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    queue: Arc<Mutex<VecDeque<f64>>>,
) -> Result<cpal::Stream>
where
    T: SizedSample,
    f64: FromSample<T>,
{
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let Ok(mut queue) = queue.lock() else {
                return;
            };
            queue.extend(data.iter().map(|&sample| f64::from_sample(sample)));
        },
        |err| eprintln!("Audio stream error: {}", err),
        None,
    )?;

    stream.play()?;
    Ok(stream)
}

/// Creates an audio stream that pops samples from the shared queue.
fn create_audio_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    queue: Arc<Mutex<VecDeque<f64>>>,
) -> Result<cpal::Stream>
where
    T: Sample + FromSample<f64> + SizedSample,
{
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let Ok(mut queue) = queue.lock() else {
                return;
            };
            for slot in data.iter_mut() {
                let sample = queue.pop_front().unwrap_or(0.0);
                *slot = T::from_sample(sample);
            }
        },
        |err| eprintln!("Audio stream error: {}", err),
        None,
    )?;

    stream.play()?;
    Ok(stream)
}

/// Installs a stderr subscriber so the library's tracing events are visible.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();
}
