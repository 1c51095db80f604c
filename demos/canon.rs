//! A three-voice round, each voice entering two bars after the last.

mod common;

use common::CpalWriter;
use riffle::{
    BoxedSignal, Param, SignalExt, StreamOptions, chunker, mix, play_from, ramp, ramp_with, repeat,
    sine,
};

const BPM: f64 = 160.0;

const G3: f64 = 196.00;
const C4: f64 = 261.63;
const D4: f64 = 293.66;
const E4: f64 = 329.63;
const F4: f64 = 349.23;
const G4: f64 = 392.00;
const A4: f64 = 440.00;

struct Score {
    sample_rate: f64,
    beat: f64,
}

impl Score {
    /// A plucked note: short attack, square-root decay.
    fn tone(&self, frequency: f64, beats: f64) -> riffle::Result<BoxedSignal> {
        let samples = (self.beat * beats) as usize;
        let attack = (self.beat * 0.1) as usize;
        let envelope = riffle::queue!(
            ramp(0.0, 1.0, attack),
            ramp_with(1.0, 0.0, samples - attack, f64::sqrt),
        );
        Ok(sine(frequency, self.sample_rate)
            .volume(Param::modulated(envelope)?)
            .limit(samples)
            .into_boxed())
    }

    fn phrase(&self, notes: &[(f64, f64)]) -> riffle::Result<BoxedSignal> {
        let tones = notes
            .iter()
            .map(|&(frequency, beats)| self.tone(frequency, beats))
            .collect::<riffle::Result<Vec<_>>>()?;
        Ok(riffle::queue(tones).looped(2).into_boxed())
    }

    fn voice(&self, entry: usize) -> riffle::Result<BoxedSignal> {
        let rest = (entry as f64 * self.beat * 8.0) as usize;
        Ok(riffle::queue(vec![
            repeat(0.0, rest).into_boxed(),
            self.phrase(&[(C4, 1.0), (D4, 1.0), (E4, 1.0), (C4, 1.0)])?,
            self.phrase(&[(E4, 1.0), (F4, 1.0), (G4, 2.0)])?,
            self.phrase(&[
                (G4, 0.5),
                (A4, 0.5),
                (G4, 0.5),
                (F4, 0.5),
                (E4, 1.0),
                (C4, 1.0),
            ])?,
            self.phrase(&[(C4, 1.0), (G3, 1.0), (C4, 2.0)])?,
        ])
        .into_boxed())
    }
}

fn main() -> Result<(), anyhow::Error> {
    common::init_logging();

    let options = StreamOptions::default().with_frames_per_buffer(2048);
    let score = Score {
        sample_rate: options.sample_rate as f64,
        beat: 60.0 / BPM * options.sample_rate as f64,
    };

    let voices = (0..3)
        .map(|entry| score.voice(entry))
        .collect::<riffle::Result<Vec<_>>>()?;
    let source = chunker(mix(voices), &options)?;

    let mut writer = CpalWriter::open(&options)?;
    let written = play_from(&mut writer, source, None)?;
    writer.drain()?;
    println!("played {written} buffers");
    Ok(())
}
