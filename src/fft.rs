//! Radix-2 FFT and bin-to-frequency mapping.
//!
//! [`fft`] returns unscaled `f64` magnitudes for the first `n / 2` bins.
//! Nothing is clipped: for input bounded by `|x| <= 1` the largest
//! possible magnitude is `n`.

use std::f64::consts::PI;

use crate::error::{Error, Result};
use crate::format::AudioBuffer;
use crate::interpolate::is_power_of_two;

/// Magnitude spectrum of a real block whose length is a power of two.
///
/// Bin `k` covers `k * sample_rate / n` Hz; pair with [`fft_frequencies`].
///
/// # Errors
///
/// [`Error::InvalidInput`] unless `input.len()` is 2, 4, 8, ...
///
/// # Examples
///
/// ```
/// use riffle::fft;
///
/// // A unit impulse has a flat spectrum
/// let magnitudes = fft(&[1.0, 0.0, 0.0, 0.0])?;
/// assert_eq!(magnitudes, vec![1.0, 1.0]);
/// # Ok::<(), riffle::Error>(())
/// ```
pub fn fft(input: &[f64]) -> Result<Vec<f64>> {
    let n = input.len();
    if !is_power_of_two(n) {
        return Err(Error::invalid_input(format!(
            "FFT length must be a power of two, got {n}"
        )));
    }

    let mut real = input.to_vec();
    let mut imag = vec![0.0; n];
    bit_reverse_permute(&mut real);

    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let angle = -2.0 * PI / len as f64;
        let (step_re, step_im) = (angle.cos(), angle.sin());
        for start in (0..n).step_by(len) {
            let (mut w_re, mut w_im) = (1.0, 0.0);
            for j in start..start + half {
                let k = j + half;
                let v_re = real[k] * w_re - imag[k] * w_im;
                let v_im = real[k] * w_im + imag[k] * w_re;
                let (u_re, u_im) = (real[j], imag[j]);
                real[j] = u_re + v_re;
                imag[j] = u_im + v_im;
                real[k] = u_re - v_re;
                imag[k] = u_im - v_im;

                let next_re = w_re * step_re - w_im * step_im;
                w_im = w_re * step_im + w_im * step_re;
                w_re = next_re;
            }
        }
        len <<= 1;
    }

    Ok(real
        .iter()
        .zip(&imag)
        .take(n / 2)
        .map(|(re, im)| re.hypot(*im))
        .collect())
}

/// In-place reordering so that index `i` holds the value at `reverse_bits(i)`.
fn bit_reverse_permute(values: &mut [f64]) {
    let bits = values.len().trailing_zeros();
    for i in 0..values.len() {
        let j = i.reverse_bits() >> (usize::BITS - bits);
        if i < j {
            values.swap(i, j);
        }
    }
}

/// Center frequency in Hz of each of the `fft_size / 2` bins.
///
/// ```
/// use riffle::fft_frequencies;
///
/// assert_eq!(fft_frequencies(8000.0, 8), vec![0.0, 1000.0, 2000.0, 3000.0]);
/// ```
pub fn fft_frequencies(sample_rate: f64, fft_size: usize) -> Vec<f64> {
    (0..fft_size / 2)
        .map(|k| k as f64 * sample_rate / fft_size as f64)
        .collect()
}

/// Magnitudes paired with the frequencies of their bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub magnitudes: Vec<f64>,
    pub frequencies: Vec<f64>,
}

impl Spectrum {
    /// Runs the FFT over `block` and labels each bin.
    pub fn new(block: &[f64], sample_rate: f64) -> Result<Self> {
        Ok(Self {
            magnitudes: fft(block)?,
            frequencies: fft_frequencies(sample_rate, block.len()),
        })
    }

    /// Spectrum of a captured buffer, dequantized back to `[-1, 1]` first.
    ///
    /// Channels are not separated: pass a mono buffer, or expect the
    /// interleaving to show up as spectral images.
    pub fn analyze(buffer: &AudioBuffer, sample_rate: f64) -> Result<Self> {
        Self::new(&buffer.dequantize(), sample_rate)
    }

    /// `(frequency, magnitude)` for every bin, lowest frequency first.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.magnitudes.iter().copied())
    }

    /// The loudest bin as `(frequency, magnitude)`.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.bins().max_by(|a, b| a.1.total_cmp(&b.1))
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SampleFormat, SignalExt, sine};
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rustfft::FftPlanner;
    use rustfft::num_complex::Complex;

    #[test]
    fn test_rejects_non_power_of_two() {
        for n in [0, 1, 3, 6, 100, 1000] {
            let result = fft(&vec![0.0; n]);
            assert!(matches!(result, Err(Error::InvalidInput(_))), "n = {n}");
        }
    }

    #[test]
    fn test_impulse_is_flat() {
        let mut n = 2;
        while n <= 1024 {
            let mut input = vec![0.0; n];
            input[0] = 1.0;
            let magnitudes = fft(&input).unwrap();
            assert_eq!(magnitudes.len(), n / 2);
            for m in magnitudes {
                assert_abs_diff_eq!(m, 1.0, epsilon = 1e-9);
            }
            n *= 2;
        }
    }

    #[test]
    fn test_dc_lands_in_bin_zero() {
        let magnitudes = fft(&[0.5; 16]).unwrap();
        assert_abs_diff_eq!(magnitudes[0], 8.0, epsilon = 1e-9);
        for m in &magnitudes[1..] {
            assert_abs_diff_eq!(*m, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_magnitudes_are_not_clipped() {
        let magnitudes = fft(&[1.0; 1024]).unwrap();
        assert_abs_diff_eq!(magnitudes[0], 1024.0, epsilon = 1e-6);
    }

    #[test]
    fn test_matches_rustfft() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut planner = FftPlanner::<f64>::new();
        for n in [2, 4, 8, 64, 256, 2048] {
            let input: Vec<f64> = (0..n).map(|_| rng.gen_range(-1.0..=1.0)).collect();
            let mut reference: Vec<Complex<f64>> =
                input.iter().map(|&re| Complex::new(re, 0.0)).collect();
            planner.plan_fft_forward(n).process(&mut reference);

            let ours = fft(&input).unwrap();
            for (k, m) in ours.iter().enumerate() {
                assert_abs_diff_eq!(*m, reference[k].norm(), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_frequencies() {
        let freqs = fft_frequencies(44100.0, 1024);
        assert_eq!(freqs.len(), 512);
        assert_eq!(freqs[0], 0.0);
        assert_abs_diff_eq!(freqs[1], 44100.0 / 1024.0);
        assert_abs_diff_eq!(freqs[511], 511.0 * 44100.0 / 1024.0);
    }

    #[test]
    fn test_spectrum_peak_finds_tone() {
        // 1000 Hz at 8000 Hz sampling is exactly bin 8 of 64
        let block: Vec<f64> = sine(1000.0, 8000.0).limit(64).samples().collect();
        let spectrum = Spectrum::new(&block, 8000.0).unwrap();
        assert_eq!(spectrum.len(), 32);
        let (freq, magnitude) = spectrum.peak().unwrap();
        assert_eq!(freq, 1000.0);
        assert_abs_diff_eq!(magnitude, 32.0, epsilon = 1e-6);
    }

    #[test]
    fn test_analyze_captured_buffer() {
        let samples: Vec<f64> = sine(500.0, 8000.0).limit(32).samples().collect();
        let buffer = AudioBuffer::from_samples(SampleFormat::Int16, &samples);
        let spectrum = Spectrum::analyze(&buffer, 8000.0).unwrap();
        assert_eq!(spectrum.peak().map(|(f, _)| f), Some(500.0));
    }
}
