//! Two-tone siren: a looped frequency sweep driving a sine oscillator.

mod common;

use common::CpalWriter;
use riffle::{
    Curve, Param, SignalExt, StopAfter, StreamOptions, chunker, play_from, ramp_with, repeat, sine,
};

const EB5: f64 = 622.26;
const A5: f64 = 880.0;

fn main() -> Result<(), anyhow::Error> {
    common::init_logging();

    let options = StreamOptions::default();
    let quarter = options.sample_rate as usize / 4;

    // Hold, sweep up, hold, sweep down; forever
    let sweep = riffle::queue!(
        repeat(EB5, quarter),
        ramp_with(EB5, A5, quarter, Curve::QuarterSine),
        repeat(A5, quarter),
        ramp_with(A5, EB5, quarter, Curve::QuarterSine),
    )
    .looped(None);

    let wave = sine(Param::modulated(sweep)?, options.sample_rate as f64).volume(0.5);
    let source = chunker(wave, &options)?;

    let mut writer = CpalWriter::open(&options)?;
    let max_chunks = options.max_chunks(&StopAfter::seconds(10.0));
    play_from(&mut writer, source, Some(max_chunks))?;
    writer.drain()?;
    Ok(())
}
