//! Direction-reversible loop playback
//!
//! Keeps one looping music track phase-continuous while the host flips
//! play direction and adjusts tempo. Two equal-duration renders are held:
//! the forward track and its time-reversed twin. A direction flip swaps
//! renders and remaps the start offset so the perceived playhead never
//! jumps; small rate changes apply in place, large ones restart at the
//! current playhead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tuning::Tuning;

/// Which of the two renders a session plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackDirection {
    #[default]
    Forward,
    Reverse,
}

/// Errors surfaced when injecting renders.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("forward and reverse renders differ in duration: {forward}s vs {reverse}s")]
    MismatchedDurations { forward: f64, reverse: f64 },
    #[error("a render needs a positive sample rate")]
    ZeroSampleRate,
}

/// A decoded, loopable audio render.
///
/// The crate never decodes audio itself; the host hands over samples it
/// obtained from its own decoder.
#[derive(Debug, Clone)]
pub struct LoopBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl LoopBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::ZeroSampleRate);
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// The time-reversed twin used for reverse playback.
    pub fn reversed(&self) -> Self {
        let mut samples = self.samples.clone();
        samples.reverse();
        Self {
            samples,
            sample_rate: self.sample_rate,
        }
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// One in-flight loop playback. At most one exists at a time; starting a
/// new session implicitly ends the previous one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSession {
    pub direction: PlaybackDirection,
    pub rate: f64,
    /// Host clock time the session started at, seconds.
    pub started_at: f64,
    /// Start offset into the playing render, seconds.
    pub offset: f64,
}

/// Side-effect seam: actual audio output lives behind this trait.
///
/// `start` begins looping playback of the render selected by `direction`
/// at the given rate and offset, replacing any prior playback.
pub trait PlaybackSink {
    fn start(&mut self, direction: PlaybackDirection, rate: f64, offset: f64);
    fn stop(&mut self);
    fn set_rate(&mut self, rate: f64);
}

/// Reconciles a desired (direction, rate) against the playing session.
pub struct MusicSynchronizer<S: PlaybackSink> {
    sink: S,
    buffers: Option<(LoopBuffer, LoopBuffer)>,
    session: Option<PlaybackSession>,
}

impl<S: PlaybackSink> MusicSynchronizer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            buffers: None,
            session: None,
        }
    }

    /// Inject the decoded renders. Until this happens, `update` is a
    /// no-op: render availability is governed by the host's asynchronous
    /// decoder.
    pub fn set_buffers(
        &mut self,
        forward: LoopBuffer,
        reverse: LoopBuffer,
    ) -> Result<(), AudioError> {
        let (f, r) = (forward.duration(), reverse.duration());
        if (f - r).abs() > 1e-9 {
            return Err(AudioError::MismatchedDurations {
                forward: f,
                reverse: r,
            });
        }
        self.buffers = Some((forward, reverse));
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.buffers.is_some()
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    /// The render a session in the given direction plays from.
    pub fn buffer(&self, direction: PlaybackDirection) -> Option<&LoopBuffer> {
        self.buffers.as_ref().map(|(forward, reverse)| match direction {
            PlaybackDirection::Forward => forward,
            PlaybackDirection::Reverse => reverse,
        })
    }

    fn duration(&self) -> f64 {
        self.buffers
            .as_ref()
            .map(|(forward, _)| forward.duration())
            .unwrap_or(0.0)
    }

    /// Current playhead on the forward timeline, seconds.
    ///
    /// The loop repeats forever, so elapsed time wraps modulo the render
    /// duration; a reverse session reads its render back-to-front, which
    /// mirrors the wrapped position.
    pub fn playhead(&self, now: f64) -> f64 {
        let Some(session) = self.session else {
            return 0.0;
        };
        let duration = self.duration();
        if duration <= 0.0 {
            return 0.0;
        }
        let elapsed = (now - session.started_at) * session.rate;
        let raw = (session.offset + elapsed).rem_euclid(duration);
        match session.direction {
            PlaybackDirection::Forward => raw,
            PlaybackDirection::Reverse => duration - raw,
        }
    }

    /// Reconcile the desired direction and rate, once per tick.
    ///
    /// Stopped: start at offset 0. Direction change: restart from the
    /// offset that keeps the perceived playhead continuous (the reverse
    /// render's timeline runs opposite to the forward one). Rate change
    /// past the hysteresis threshold: restart at the current playhead.
    /// Otherwise apply the rate to the playing session in place.
    pub fn update(
        &mut self,
        now: f64,
        direction: PlaybackDirection,
        rate: f64,
        tuning: &Tuning,
    ) {
        if self.buffers.is_none() {
            return;
        }

        let Some(session) = self.session else {
            self.start_session(now, direction, rate, 0.0);
            return;
        };

        if session.direction != direction {
            let offset = self.restart_offset(now, direction);
            self.sink.stop();
            self.start_session(now, direction, rate, offset);
        } else if (session.rate - rate).abs() > tuning.rate_change_threshold {
            let offset = self.restart_offset(now, direction);
            self.sink.stop();
            self.start_session(now, direction, rate, offset);
        } else if let Some(session) = &mut self.session {
            session.rate = rate;
            self.sink.set_rate(rate);
        }
    }

    /// End playback entirely.
    pub fn stop(&mut self) {
        if self.session.take().is_some() {
            self.sink.stop();
        }
    }

    /// Offset that resumes a session in `direction` at the current
    /// perceived playhead.
    fn restart_offset(&self, now: f64, direction: PlaybackDirection) -> f64 {
        let p = self.playhead(now);
        match direction {
            PlaybackDirection::Forward => p,
            PlaybackDirection::Reverse => self.duration() - p,
        }
    }

    fn start_session(
        &mut self,
        now: f64,
        direction: PlaybackDirection,
        rate: f64,
        offset: f64,
    ) {
        self.sink.start(direction, rate, offset);
        self.session = Some(PlaybackSession {
            direction,
            rate,
            started_at: now,
            offset,
        });
    }
}
