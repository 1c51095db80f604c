//! Records five seconds from the default microphone, reports the loudest
//! frequency it heard and plays the recording back.

mod common;

use common::{CpalReader, CpalWriter};
use riffle::{AudioBuffer, Spectrum, StopAfter, StreamOptions, play_from, record};

fn main() -> Result<(), anyhow::Error> {
    common::init_logging();

    // Power-of-two blocks so every captured buffer can go straight into the FFT
    let options = StreamOptions::default().with_frames_per_buffer(2048);
    let sample_rate = options.sample_rate as f64;

    let mic = CpalReader::open(&options)?;
    let max_chunks = options.max_chunks(&StopAfter::seconds(5.0));
    println!("recording {max_chunks} buffers...");
    let recording = record(mic, Some(max_chunks));
    let captured: Vec<AudioBuffer> = recording.collect::<riffle::Result<_>>()?;

    let peak_of = |buffer: &AudioBuffer| Spectrum::analyze(buffer, sample_rate).map(|s| s.peak());
    let peaks = captured
        .iter()
        .map(peak_of)
        .collect::<riffle::Result<Vec<_>>>()?;
    let loudest = peaks
        .into_iter()
        .flatten()
        .max_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((frequency, magnitude)) = loudest {
        println!("loudest: {frequency:.1} Hz ({magnitude:.3})");
    }

    let mut speaker = CpalWriter::open(&options)?;
    let played = play_from(&mut speaker, captured, None)?;
    speaker.drain()?;
    println!("played back {played} buffers");
    Ok(())
}
