//! Renders a short arpeggio to a WAV file, reads it back and plays it.

mod common;

use common::CpalWriter;
use riffle::wav::{read_file_as, write_file};
use riffle::{
    AudioBuffer, SampleFormat, SignalExt, StreamOptions, WavOptions, chunker, play_from, repeat,
    triangle,
};

fn main() -> Result<(), anyhow::Error> {
    common::init_logging();

    let options = StreamOptions::default()
        .with_format(SampleFormat::Int16)
        .with_frames_per_buffer(512);
    let sample_rate = options.sample_rate as f64;
    let note = options.sample_rate as usize / 4;

    let tone = |frequency: f64| triangle(frequency, sample_rate).volume(0.4).limit(note);
    let arpeggio = riffle::queue([261.63, 329.63, 392.00, 523.25].map(tone)).looped(2);
    let tail = repeat(0.0, note);
    let buffers: Vec<AudioBuffer> = chunker(riffle::queue!(arpeggio, tail), &options)?.collect();

    let path = std::env::temp_dir().join("riffle-arpeggio.wav");
    write_file(&path, &buffers, &WavOptions::from(options))?;
    println!("wrote {} buffers to {}", buffers.len(), path.display());

    let (header, decoded) = read_file_as(&path, options.format)?;
    println!(
        "read back {} samples: {} channel(s), {} Hz, {}",
        decoded.len(),
        header.channels,
        header.sample_rate,
        header.format
    );

    // Re-chunk the decoded samples for playback
    let playback = StreamOptions::default()
        .with_channels(header.channels)
        .with_sample_rate(header.sample_rate)
        .with_format(header.format)
        .with_frames_per_buffer(options.frames_per_buffer);
    let mut writer = CpalWriter::open(&playback)?;
    let replay = chunker(riffle::from_iter(decoded.dequantize()), &playback)?;
    play_from(&mut writer, replay, None)?;
    writer.drain()?;
    Ok(())
}
