//! Prints the spectrum of one block of a two-tone chord over a noise floor.

use rand::SeedableRng;
use rand::rngs::StdRng;
use riffle::{SignalExt, Spectrum, StreamOptions, WhiteNoise, chunker, sine};

// Must be a power of two; larger sizes give finer frequency resolution
const FFT_SIZE: usize = 2048;

fn main() -> Result<(), anyhow::Error> {
    let options = StreamOptions::default().with_frames_per_buffer(FFT_SIZE);
    let sample_rate = options.sample_rate as f64;

    let hiss = WhiteNoise::with_rng(StdRng::seed_from_u64(2048)).volume(0.2);
    let chord = riffle::mix!(sine(440.0, sample_rate), sine(660.0, sample_rate), hiss);
    let Some(block) = chunker(chord, &options)?.next() else {
        anyhow::bail!("the chord produced no samples");
    };

    let spectrum = Spectrum::analyze(&block, sample_rate)?;
    for (i, (frequency, magnitude)) in spectrum.bins().enumerate() {
        let label = format!("#{}", i + 1);
        println!("{label:>8} - {frequency:>9.2} Hz: {magnitude:>8.3}");
    }
    if let Some((frequency, magnitude)) = spectrum.peak() {
        println!("peak: {frequency:.2} Hz ({magnitude:.3})");
    }
    Ok(())
}
