//! Elementwise gain.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::Stream;

use crate::{Param, Signal};

/// Scales a signal by a fixed or modulated volume.
///
/// Created by [`volume`] or [`SignalExt::volume`](crate::SignalExt::volume).
/// The signal ends when the source does. A modulated volume holds its last
/// value after its own signal ends, so it never cuts the source short.
///
/// The volume is advanced only after the source produced a sample, keeping
/// source and modulator aligned step for step. In the async variant the
/// volume stays a synchronous [`Param`]: control inputs never wait.
#[derive(Debug)]
pub struct Volume<S> {
    source: S,
    volume: Param,
}

/// Multiplies `source` by `volume`, sample by sample.
///
/// # Examples
///
/// ```
/// use riffle::{Param, SignalExt, ramp, repeat, volume};
///
/// let halved: Vec<f64> = volume(repeat(0.8, 2), 0.5).samples().collect();
/// assert_eq!(halved, vec![0.4, 0.4]);
///
/// // A fade-in that stays at full volume once the ramp ends
/// let fade = Param::modulated(ramp(0.0, 1.0, 2))?;
/// let faded: Vec<f64> = volume(repeat(1.0, 4), fade).samples().collect();
/// assert_eq!(faded, vec![0.0, 0.5, 0.5, 0.5]);
/// # Ok::<(), riffle::Error>(())
/// ```
pub fn volume<S>(source: S, volume: impl Into<Param>) -> Volume<S> {
    Volume {
        source,
        volume: volume.into(),
    }
}

impl<S> Volume<S> {
    /// Unwraps the source and drops the volume parameter.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: Signal> Signal for Volume<S> {
    fn next_sample(&mut self) -> Option<f64> {
        let sample = self.source.next_sample()?;
        Some(sample * self.volume.value())
    }
}

impl<S: Stream<Item = f64> + Unpin> Stream for Volume<S> {
    type Item = f64;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<f64>> {
        let this = self.get_mut();
        let sample = ready!(Pin::new(&mut this.source).poll_next(cx));
        Poll::Ready(sample.map(|s| s * this.volume.value()))
    }
}
