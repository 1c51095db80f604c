//! Sample formats and quantized buffers.
//!
//! A [`SampleFormat`] names one of the hardware sample encodings and
//! carries its numeric range. An [`AudioBuffer`] is a block of samples
//! already converted into one of those encodings.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::interpolate::{lerp, rlerp};

/// Encoding of a single sample in a hardware buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// 32-bit IEEE float in `[-1, 1]`
    #[default]
    Float32,
    /// Signed 32-bit integer
    Int32,
    /// Signed 16-bit integer
    Int16,
    /// Signed 8-bit integer
    Int8,
    /// Unsigned 8-bit integer, silence at 127/128
    Uint8,
}

impl SampleFormat {
    pub const ALL: [SampleFormat; 5] = [
        SampleFormat::Float32,
        SampleFormat::Int32,
        SampleFormat::Int16,
        SampleFormat::Int8,
        SampleFormat::Uint8,
    ];

    /// Smallest representable sample value.
    pub fn min_value(self) -> f64 {
        match self {
            SampleFormat::Float32 => -1.0,
            SampleFormat::Int32 => i32::MIN as f64,
            SampleFormat::Int16 => i16::MIN as f64,
            SampleFormat::Int8 => i8::MIN as f64,
            SampleFormat::Uint8 => u8::MIN as f64,
        }
    }

    /// Largest representable sample value.
    pub fn max_value(self) -> f64 {
        match self {
            SampleFormat::Float32 => 1.0,
            SampleFormat::Int32 => i32::MAX as f64,
            SampleFormat::Int16 => i16::MAX as f64,
            SampleFormat::Int8 => i8::MAX as f64,
            SampleFormat::Uint8 => u8::MAX as f64,
        }
    }

    /// Storage width of one sample.
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::Float32 | SampleFormat::Int32 => 4,
            SampleFormat::Int16 => 2,
            SampleFormat::Int8 | SampleFormat::Uint8 => 1,
        }
    }

    pub fn bits_per_sample(self) -> u16 {
        self.bytes_per_sample() as u16 * 8
    }

    pub fn is_float(self) -> bool {
        self == SampleFormat::Float32
    }

    pub fn is_signed(self) -> bool {
        self != SampleFormat::Uint8
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            SampleFormat::Float32 => "float32",
            SampleFormat::Int32 => "int32",
            SampleFormat::Int16 => "int16",
            SampleFormat::Int8 => "int8",
            SampleFormat::Uint8 => "uint8",
        }
    }

    /// Remaps a sample from `[-1, 1]` onto this format's numeric range.
    ///
    /// Inputs outside `[-1, 1]` are not clamped; they land outside the
    /// range and saturate when stored.
    pub fn quantize(self, sample: f64) -> f64 {
        lerp(self.min_value(), self.max_value(), rlerp(-1.0, 1.0, sample))
    }

    /// Inverse of [`quantize`](Self::quantize).
    pub fn dequantize(self, value: f64) -> f64 {
        lerp(-1.0, 1.0, rlerp(self.min_value(), self.max_value(), value))
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SampleFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SampleFormat::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| Error::UnsupportedFormat(s.to_string()))
    }
}

/// A block of quantized samples in one [`SampleFormat`].
#[derive(Debug, Clone, PartialEq)]
pub enum AudioBuffer {
    Float32(Vec<f32>),
    Int32(Vec<i32>),
    Int16(Vec<i16>),
    Int8(Vec<i8>),
    Uint8(Vec<u8>),
}

impl AudioBuffer {
    /// An empty buffer with room for `capacity` samples.
    pub fn with_capacity(format: SampleFormat, capacity: usize) -> Self {
        match format {
            SampleFormat::Float32 => AudioBuffer::Float32(Vec::with_capacity(capacity)),
            SampleFormat::Int32 => AudioBuffer::Int32(Vec::with_capacity(capacity)),
            SampleFormat::Int16 => AudioBuffer::Int16(Vec::with_capacity(capacity)),
            SampleFormat::Int8 => AudioBuffer::Int8(Vec::with_capacity(capacity)),
            SampleFormat::Uint8 => AudioBuffer::Uint8(Vec::with_capacity(capacity)),
        }
    }

    /// Quantizes every sample of `samples` into a new buffer.
    pub fn from_samples(format: SampleFormat, samples: &[f64]) -> Self {
        let mut buffer = Self::with_capacity(format, samples.len());
        for &sample in samples {
            buffer.push_sample(sample);
        }
        buffer
    }

    pub fn format(&self) -> SampleFormat {
        match self {
            AudioBuffer::Float32(_) => SampleFormat::Float32,
            AudioBuffer::Int32(_) => SampleFormat::Int32,
            AudioBuffer::Int16(_) => SampleFormat::Int16,
            AudioBuffer::Int8(_) => SampleFormat::Int8,
            AudioBuffer::Uint8(_) => SampleFormat::Uint8,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AudioBuffer::Float32(v) => v.len(),
            AudioBuffer::Int32(v) => v.len(),
            AudioBuffer::Int16(v) => v.len(),
            AudioBuffer::Int8(v) => v.len(),
            AudioBuffer::Uint8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Quantizes a `[-1, 1]` sample and appends it.
    ///
    /// Integer formats truncate toward zero and saturate at their bounds.
    pub fn push_sample(&mut self, sample: f64) {
        let value = self.format().quantize(sample);
        match self {
            AudioBuffer::Float32(v) => v.push(value as f32),
            AudioBuffer::Int32(v) => v.push(value as i32),
            AudioBuffer::Int16(v) => v.push(value as i16),
            AudioBuffer::Int8(v) => v.push(value as i8),
            AudioBuffer::Uint8(v) => v.push(value as u8),
        }
    }

    /// Stored value at `index`, in the format's own numeric range.
    pub fn get(&self, index: usize) -> Option<f64> {
        match self {
            AudioBuffer::Float32(v) => v.get(index).map(|&s| s as f64),
            AudioBuffer::Int32(v) => v.get(index).map(|&s| s as f64),
            AudioBuffer::Int16(v) => v.get(index).map(|&s| s as f64),
            AudioBuffer::Int8(v) => v.get(index).map(|&s| s as f64),
            AudioBuffer::Uint8(v) => v.get(index).map(|&s| s as f64),
        }
    }

    /// Stored values in order, in the format's own numeric range.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }

    /// Maps every stored value back into `[-1, 1]`.
    pub fn dequantize(&self) -> Vec<f64> {
        let format = self.format();
        self.iter().map(|value| format.dequantize(value)).collect()
    }

    /// Raw little-endian bytes, as a device or container expects them.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len() * self.format().bytes_per_sample());
        match self {
            AudioBuffer::Float32(v) => v.iter().for_each(|s| bytes.extend(s.to_le_bytes())),
            AudioBuffer::Int32(v) => v.iter().for_each(|s| bytes.extend(s.to_le_bytes())),
            AudioBuffer::Int16(v) => v.iter().for_each(|s| bytes.extend(s.to_le_bytes())),
            AudioBuffer::Int8(v) => v.iter().for_each(|s| bytes.extend(s.to_le_bytes())),
            AudioBuffer::Uint8(v) => bytes.extend_from_slice(v),
        }
        bytes
    }

    /// Reads samples back from raw little-endian bytes.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if `bytes` is not a whole number of samples.
    pub fn from_le_bytes(format: SampleFormat, bytes: &[u8]) -> Result<Self> {
        let width = format.bytes_per_sample();
        if !bytes.len().is_multiple_of(width) {
            return Err(Error::invalid_input(format!(
                "{} bytes is not a whole number of {format} samples",
                bytes.len()
            )));
        }
        let chunks = bytes.chunks_exact(width);
        let buffer = match format {
            SampleFormat::Float32 => AudioBuffer::Float32(
                chunks
                    .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            SampleFormat::Int32 => AudioBuffer::Int32(
                chunks
                    .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            SampleFormat::Int16 => {
                AudioBuffer::Int16(chunks.map(|c| i16::from_le_bytes([c[0], c[1]])).collect())
            }
            SampleFormat::Int8 => AudioBuffer::Int8(bytes.iter().map(|&b| b as i8).collect()),
            SampleFormat::Uint8 => AudioBuffer::Uint8(bytes.to_vec()),
        };
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_range_table() {
        assert_eq!(SampleFormat::Float32.min_value(), -1.0);
        assert_eq!(SampleFormat::Float32.max_value(), 1.0);
        assert_eq!(SampleFormat::Int32.min_value(), -2147483648.0);
        assert_eq!(SampleFormat::Int32.max_value(), 2147483647.0);
        assert_eq!(SampleFormat::Int16.min_value(), -32768.0);
        assert_eq!(SampleFormat::Int16.max_value(), 32767.0);
        assert_eq!(SampleFormat::Int8.min_value(), -128.0);
        assert_eq!(SampleFormat::Int8.max_value(), 127.0);
        assert_eq!(SampleFormat::Uint8.min_value(), 0.0);
        assert_eq!(SampleFormat::Uint8.max_value(), 255.0);
    }

    #[test]
    fn test_widths() {
        let widths: Vec<usize> = SampleFormat::ALL
            .iter()
            .map(|f| f.bytes_per_sample())
            .collect();
        assert_eq!(widths, vec![4, 4, 2, 1, 1]);
        assert_eq!(SampleFormat::Int16.bits_per_sample(), 16);
    }

    #[test]
    fn test_name_round_trip() {
        for format in SampleFormat::ALL {
            assert_eq!(format.to_string().parse::<SampleFormat>().unwrap(), format);
        }
        assert!(matches!(
            "int24".parse::<SampleFormat>(),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_quantize_endpoints() {
        for format in SampleFormat::ALL {
            assert_abs_diff_eq!(format.quantize(-1.0), format.min_value());
            assert_abs_diff_eq!(format.quantize(1.0), format.max_value());
        }
    }

    #[test]
    fn test_push_truncates_toward_zero() {
        let cases = [
            (SampleFormat::Int16, AudioBuffer::Int16(vec![0])),
            (SampleFormat::Int8, AudioBuffer::Int8(vec![0])),
            (SampleFormat::Uint8, AudioBuffer::Uint8(vec![127])),
            (SampleFormat::Float32, AudioBuffer::Float32(vec![0.0])),
        ];
        for (format, expected) in cases {
            assert_eq!(AudioBuffer::from_samples(format, &[0.0]), expected);
        }
    }

    #[test]
    fn test_out_of_range_saturates() {
        let buffer = AudioBuffer::from_samples(SampleFormat::Int8, &[2.0, -2.0]);
        assert_eq!(buffer, AudioBuffer::Int8(vec![127, -128]));
        let buffer = AudioBuffer::from_samples(SampleFormat::Uint8, &[3.0, -3.0]);
        assert_eq!(buffer, AudioBuffer::Uint8(vec![255, 0]));
    }

    #[test]
    fn test_dequantize_is_close_to_input() {
        let input = [-1.0, -0.5, 0.0, 0.25, 1.0];
        for format in SampleFormat::ALL {
            let restored = AudioBuffer::from_samples(format, &input).dequantize();
            // One quantization step in [-1, 1] units
            let step = 2.0 / (format.max_value() - format.min_value());
            for (a, b) in input.iter().zip(&restored) {
                assert_abs_diff_eq!(*a, *b, epsilon = step.max(1e-6));
            }
        }
    }

    #[test]
    fn test_le_bytes_round_trip() {
        let input = [-1.0, -0.3, 0.0, 0.7, 1.0];
        for format in SampleFormat::ALL {
            let buffer = AudioBuffer::from_samples(format, &input);
            let bytes = buffer.to_le_bytes();
            assert_eq!(bytes.len(), input.len() * format.bytes_per_sample());
            assert_eq!(AudioBuffer::from_le_bytes(format, &bytes).unwrap(), buffer);
        }
    }

    #[test]
    fn test_le_bytes_layout() {
        let buffer = AudioBuffer::Int16(vec![0x0102, -2]);
        assert_eq!(buffer.to_le_bytes(), vec![0x02, 0x01, 0xFE, 0xFF]);
    }

    #[test]
    fn test_from_le_bytes_rejects_ragged_input() {
        let result = AudioBuffer::from_le_bytes(SampleFormat::Int32, &[0, 0, 0]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
