//! WAV container encode and decode.
//!
//! Files are written with the canonical 44-byte header: a 16-byte `fmt `
//! chunk tagged 3 (IEEE float) for float data and 1 (PCM) for integer data,
//! followed by a single `data` chunk. Reading goes through `hound`, so files
//! from other tools (including `WAVE_FORMAT_EXTENSIBLE` ones) load too.
//!
//! 8-bit WAV data is unsigned by convention. `Int8` buffers are stored
//! offset by 128 like any other 8-bit file, so a plain [`decode`] reports
//! them as [`SampleFormat::Uint8`]. Use [`decode_as`] with the format the
//! file was written in to get the original samples back exactly.

use std::io::{BufWriter, Read, Write};
use std::path::Path;

use hound::{WavReader, WavSpec};
use tracing::debug;

use crate::error::{Error, Result};
use crate::format::{AudioBuffer, SampleFormat};
use crate::stream::StreamOptions;

const HEADER_LEN: usize = 44;
const FMT_CHUNK_LEN: u32 = 16;
const FORMAT_PCM: u16 = 1;
const FORMAT_IEEE_FLOAT: u16 = 3;

/// Container header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavOptions {
    pub channels: u16,
    pub sample_rate: u32,
    pub format: SampleFormat,
}

impl Default for WavOptions {
    fn default() -> Self {
        StreamOptions::default().into()
    }
}

impl From<StreamOptions> for WavOptions {
    fn from(options: StreamOptions) -> Self {
        Self {
            channels: options.channels,
            sample_rate: options.sample_rate,
            format: options.format,
        }
    }
}

impl WavOptions {
    fn format_code(&self) -> u16 {
        if self.format.is_float() {
            FORMAT_IEEE_FLOAT
        } else {
            FORMAT_PCM
        }
    }

    fn block_align(&self) -> u16 {
        self.channels * self.format.bytes_per_sample() as u16
    }

    fn header(&self, data_len: u32) -> [u8; HEADER_LEN] {
        let byte_rate = self.sample_rate * u32::from(self.block_align());

        let mut header = [0; HEADER_LEN];
        header[0..4].copy_from_slice(b"RIFF");
        header[4..8].copy_from_slice(&(data_len + 36).to_le_bytes());
        header[8..12].copy_from_slice(b"WAVE");
        header[12..16].copy_from_slice(b"fmt ");
        header[16..20].copy_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
        header[20..22].copy_from_slice(&self.format_code().to_le_bytes());
        header[22..24].copy_from_slice(&self.channels.to_le_bytes());
        header[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
        header[32..34].copy_from_slice(&self.block_align().to_le_bytes());
        header[34..36].copy_from_slice(&self.format.bits_per_sample().to_le_bytes());
        header[36..40].copy_from_slice(b"data");
        header[40..44].copy_from_slice(&data_len.to_le_bytes());
        header
    }

    fn from_spec(spec: &WavSpec) -> Result<Self> {
        let format = match (spec.sample_format, spec.bits_per_sample) {
            (hound::SampleFormat::Float, 32) => SampleFormat::Float32,
            (hound::SampleFormat::Int, 32) => SampleFormat::Int32,
            (hound::SampleFormat::Int, 16) => SampleFormat::Int16,
            (hound::SampleFormat::Int, 8) => SampleFormat::Uint8,
            (sample_format, bits) => {
                return Err(Error::UnsupportedFormat(format!(
                    "{bits}-bit {sample_format:?} WAV data"
                )));
            }
        };
        Ok(Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            format,
        })
    }

    fn check(&self, buffers: &[AudioBuffer]) -> Result<u32> {
        if self.channels == 0 {
            return Err(Error::invalid_input("WAV needs at least one channel"));
        }
        if self.channels as usize * self.format.bytes_per_sample() > u16::MAX as usize {
            return Err(Error::invalid_input(format!(
                "{} channels of {} do not fit a WAV frame",
                self.channels, self.format
            )));
        }
        if let Some(other) = buffers.iter().find(|b| b.format() != self.format) {
            return Err(Error::invalid_input(format!(
                "{} buffer in a {} WAV",
                other.format(),
                self.format
            )));
        }
        let samples: usize = buffers.iter().map(AudioBuffer::len).sum();
        if !samples.is_multiple_of(self.channels as usize) {
            return Err(Error::invalid_input(format!(
                "{samples} samples do not split into {} channels",
                self.channels
            )));
        }
        let data_len = samples * self.format.bytes_per_sample();
        match u32::try_from(data_len) {
            Ok(len) if len <= u32::MAX - 36 => Ok(len),
            _ => Err(Error::invalid_input(format!(
                "{data_len} data bytes overflow a WAV file"
            ))),
        }
    }
}

fn is_eight_bit(format: SampleFormat) -> bool {
    matches!(format, SampleFormat::Int8 | SampleFormat::Uint8)
}

/// The format to load `stored` data as when the caller expects `expected`.
///
/// 8-bit data carries no signedness, so either 8-bit format may claim it.
fn resolve_format(stored: SampleFormat, expected: SampleFormat) -> Result<SampleFormat> {
    if stored == expected || (is_eight_bit(stored) && is_eight_bit(expected)) {
        Ok(expected)
    } else {
        Err(Error::invalid_input(format!(
            "{stored} WAV data cannot be read as {expected}"
        )))
    }
}

/// Sample bytes as they sit in the `data` chunk.
fn data_bytes(buffer: &AudioBuffer) -> Vec<u8> {
    match buffer {
        AudioBuffer::Int8(v) => v.iter().map(|&s| (s as u8).wrapping_add(128)).collect(),
        other => other.to_le_bytes(),
    }
}

/// Encodes `buffers` back to back into an in-memory WAV file.
///
/// # Errors
///
/// [`Error::InvalidInput`] if a buffer's format differs from
/// `options.format` or the samples do not fill whole frames.
pub fn encode(buffers: &[AudioBuffer], options: &WavOptions) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    write_to(&mut bytes, buffers, options)?;
    Ok(bytes)
}

/// Writes `buffers` as a WAV file at `path`.
pub fn write_file(
    path: impl AsRef<Path>,
    buffers: &[AudioBuffer],
    options: &WavOptions,
) -> Result<()> {
    let mut file = BufWriter::new(std::fs::File::create(path)?);
    write_to(&mut file, buffers, options)?;
    file.flush()?;
    Ok(())
}

fn write_to<W: Write>(sink: &mut W, buffers: &[AudioBuffer], options: &WavOptions) -> Result<()> {
    let data_len = options.check(buffers)?;
    sink.write_all(&options.header(data_len))?;
    for buffer in buffers {
        sink.write_all(&data_bytes(buffer))?;
    }
    debug!(
        data_len,
        channels = options.channels,
        sample_rate = options.sample_rate,
        format = %options.format,
        "encoded WAV"
    );
    Ok(())
}

/// Decodes a WAV file held in memory, taking the sample format from its header.
///
/// # Errors
///
/// [`Error::UnsupportedFormat`] for sample encodings with no
/// [`SampleFormat`] (such as 24-bit PCM); [`Error::Wav`] for malformed data.
pub fn decode(bytes: &[u8]) -> Result<(WavOptions, AudioBuffer)> {
    read_from(bytes, None)
}

/// Decodes a WAV file held in memory as `format` data.
///
/// For 8-bit files this picks between [`SampleFormat::Int8`] and
/// [`SampleFormat::Uint8`], so an `Int8` run written by [`encode`] comes
/// back unchanged.
///
/// ```
/// use riffle::wav::{decode_as, encode};
/// use riffle::{AudioBuffer, SampleFormat, WavOptions};
///
/// let options = WavOptions {
///     format: SampleFormat::Int8,
///     ..WavOptions::default()
/// };
/// let buffer = AudioBuffer::Int8(vec![-128, 0, 127]);
/// let bytes = encode(std::slice::from_ref(&buffer), &options)?;
/// assert_eq!(decode_as(&bytes, SampleFormat::Int8)?, (options, buffer));
/// # Ok::<(), riffle::Error>(())
/// ```
///
/// # Errors
///
/// [`Error::InvalidInput`] if the file holds some other sample format,
/// plus everything [`decode`] reports.
pub fn decode_as(bytes: &[u8], format: SampleFormat) -> Result<(WavOptions, AudioBuffer)> {
    read_from(bytes, Some(format))
}

/// Reads the WAV file at `path`.
pub fn read_file(path: impl AsRef<Path>) -> Result<(WavOptions, AudioBuffer)> {
    let file = std::io::BufReader::new(std::fs::File::open(path)?);
    read_from(file, None)
}

/// Reads the WAV file at `path` as `format` data. See [`decode_as`].
pub fn read_file_as(
    path: impl AsRef<Path>,
    format: SampleFormat,
) -> Result<(WavOptions, AudioBuffer)> {
    let file = std::io::BufReader::new(std::fs::File::open(path)?);
    read_from(file, Some(format))
}

fn read_from<R: Read>(
    source: R,
    expected: Option<SampleFormat>,
) -> Result<(WavOptions, AudioBuffer)> {
    let mut reader = WavReader::new(source)?;
    let mut options = WavOptions::from_spec(&reader.spec())?;
    if let Some(expected) = expected {
        options.format = resolve_format(options.format, expected)?;
    }

    // hound hands 8-bit samples over signed, with the 128 offset removed
    let buffer = match options.format {
        SampleFormat::Float32 => {
            AudioBuffer::Float32(reader.samples::<f32>().collect::<hound::Result<_>>()?)
        }
        SampleFormat::Int32 => {
            AudioBuffer::Int32(reader.samples::<i32>().collect::<hound::Result<_>>()?)
        }
        SampleFormat::Int16 => {
            AudioBuffer::Int16(reader.samples::<i16>().collect::<hound::Result<_>>()?)
        }
        SampleFormat::Int8 => {
            AudioBuffer::Int8(reader.samples::<i8>().collect::<hound::Result<_>>()?)
        }
        SampleFormat::Uint8 => AudioBuffer::Uint8(
            reader
                .samples::<i8>()
                .map(|s| s.map(|s| (s as u8).wrapping_add(128)))
                .collect::<hound::Result<_>>()?,
        ),
    };
    debug!(
        samples = buffer.len(),
        channels = options.channels,
        sample_rate = options.sample_rate,
        format = %options.format,
        "decoded WAV"
    );
    Ok((options, buffer))
}
