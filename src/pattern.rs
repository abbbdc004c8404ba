//! Cyclic keyframe playback
//!
//! A pattern is an ordered list of keyframes where the last one connects
//! back to the first. [`PatternPlayer`] fades keyframe `i` into keyframe
//! `i + 1` over keyframe `i`'s duration, forever, until cancelled.

use embassy_time::Duration;

use crate::cancel::CancelSignal;
use crate::color::Rgb;
use crate::config::PatternConfig;
use crate::error::SequencerError;
use crate::renderer::Renderer;
use crate::transition::FadeSegment;
use crate::{OutputDriver, Pacer};

/// A color and the time spent leaving it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyframe {
    pub color: Rgb,
    pub duration: Duration,
}

impl Keyframe {
    pub const fn new(color: Rgb, duration: Duration) -> Self {
        Self { color, duration }
    }

    /// Shorthand for a keyframe with a millisecond duration
    pub const fn from_millis(r: u8, g: u8, b: u8, duration_ms: u64) -> Self {
        Self::new(Rgb { r, g, b }, Duration::from_millis(duration_ms))
    }
}

/// Non-empty keyframe list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    keyframes: Vec<Keyframe>,
}

impl Pattern {
    /// Build a pattern from keyframes
    ///
    /// Fails with [`SequencerError::InvalidPattern`] when `keyframes` is
    /// empty.
    pub fn from_slice(keyframes: &[Keyframe]) -> Result<Self, SequencerError> {
        Self::from_vec(keyframes.to_vec())
    }

    /// Build a pattern, taking ownership of `keyframes`
    pub fn from_vec(keyframes: Vec<Keyframe>) -> Result<Self, SequencerError> {
        if keyframes.is_empty() {
            return Err(SequencerError::InvalidPattern("pattern is empty"));
        }
        Ok(Self { keyframes })
    }

    pub fn as_slice(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Always `false` for a constructed pattern
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Total time of one full cycle, saturating at [`Duration::MAX`]
    pub fn cycle_duration(&self) -> Duration {
        let ticks = self
            .keyframes
            .iter()
            .fold(0u64, |acc, keyframe| acc.saturating_add(keyframe.duration.as_ticks()));
        Duration::from_ticks(ticks)
    }
}

/// How consecutive keyframes are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyframeTransition {
    /// Interpolate into the next keyframe
    #[default]
    Fade,
    /// Show the keyframe color unchanged for its duration
    Hold,
}

/// Player lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Running,
    /// Terminal; the player does not run again
    Stopped,
}

/// Counters of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternRun {
    /// Fully completed pattern cycles
    pub cycles: u32,
    /// Frames written to the driver
    pub frames: u64,
}

/// Pattern Player - loops a pattern until cancelled
#[derive(Debug)]
pub struct PatternPlayer {
    config: PatternConfig,
    state: PlayerState,
}

impl PatternPlayer {
    pub const fn new(config: PatternConfig) -> Self {
        Self {
            config,
            state: PlayerState::Idle,
        }
    }

    pub const fn state(&self) -> PlayerState {
        self.state
    }

    /// Play `keyframes` until `cancel` fires
    ///
    /// Returns only on cancellation or on the first render failure. An empty
    /// keyframe list fails with [`SequencerError::InvalidPattern`] without
    /// touching the strip.
    pub fn run<D, P, C>(
        &mut self,
        renderer: &mut Renderer<D, P>,
        keyframes: &[Keyframe],
        cancel: &C,
    ) -> Result<PatternRun, SequencerError>
    where
        D: OutputDriver,
        P: Pacer,
        C: CancelSignal + ?Sized,
    {
        if self.state == PlayerState::Stopped {
            log::warn!("pattern player already stopped");
            return Ok(PatternRun::default());
        }
        if keyframes.is_empty() {
            self.state = PlayerState::Stopped;
            let err = SequencerError::InvalidPattern("pattern is empty");
            log::error!("{err}");
            return Err(err);
        }

        self.state = PlayerState::Running;
        log::info!(
            "playing pattern of {} keyframes ({:?})",
            keyframes.len(),
            self.config.transition
        );

        let mut run = PatternRun::default();
        let result = 'cycle: loop {
            if cancel.is_cancelled() {
                break Ok(());
            }
            for (index, keyframe) in keyframes.iter().enumerate() {
                if cancel.is_cancelled() {
                    break 'cycle Ok(());
                }
                let next = &keyframes[(index + 1) % keyframes.len()];
                let segment = self.segment(keyframe, next);

                match renderer.fade(&segment, cancel) {
                    Ok(outcome) => {
                        run.frames += u64::from(outcome.frames());
                        if outcome.is_cancelled() {
                            break 'cycle Ok(());
                        }
                    }
                    Err(err) => {
                        log::error!("pattern stopped at keyframe {index}: {err}");
                        break 'cycle Err(err);
                    }
                }
            }
            run.cycles += 1;
        };

        self.state = PlayerState::Stopped;
        log::info!(
            "pattern stopped after {} cycles, {} frames",
            run.cycles,
            run.frames
        );
        result.map(|()| run)
    }

    fn segment(&self, keyframe: &Keyframe, next: &Keyframe) -> FadeSegment {
        let segment = match self.config.transition {
            KeyframeTransition::Fade => FadeSegment::new(
                keyframe.color,
                next.color,
                keyframe.duration,
                self.config.steps,
            ),
            KeyframeTransition::Hold => FadeSegment::hold(keyframe.color, keyframe.duration),
        };
        segment.with_brightness(self.config.brightness)
    }
}
