//! Beat-synchronized rendering
//!
//! [`BeatSyncDriver`] follows the position of an external player and renders
//! one fade or hold per analysed beat. Loud, fast passages fade from the
//! start color to the end color; calm passages hold the end color.
//!
//! The driver re-enters its wait state whenever playback stops, the track
//! changes or a provider fails, and backs off exponentially while waiting.

use core::fmt;

use embassy_time::Duration;

use crate::analysis::{Analysis, Beat, loudness_norm};
use crate::cancel::CancelSignal;
use crate::color::{Rgb, scale_color};
use crate::config::SyncConfig;
use crate::error::SequencerError;
use crate::renderer::Renderer;
use crate::time::saturating_millis;
use crate::transition::FadeSegment;
use crate::{OutputDriver, Pacer};

/// Opaque identifier of a track
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackId(pub String);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Player state at the time of a poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub is_playing: bool,
    pub track_id: Option<TrackId>,
    pub position_ms: u64,
}

impl PlaybackSnapshot {
    /// Snapshot of a playing track
    pub fn playing(track_id: impl Into<TrackId>, position_ms: u64) -> Self {
        Self {
            is_playing: true,
            track_id: Some(track_id.into()),
            position_ms,
        }
    }

    /// Snapshot with nothing playing
    pub const fn stopped() -> Self {
        Self {
            is_playing: false,
            track_id: None,
            position_ms: 0,
        }
    }

    fn playing_track(self) -> Option<(TrackId, u64)> {
        match self.track_id {
            Some(track) if self.is_playing => Some((track, self.position_ms)),
            _ => None,
        }
    }
}

/// Source of the current playback state
pub trait PlaybackProvider {
    type Error: fmt::Display;

    fn current_snapshot(&mut self) -> Result<PlaybackSnapshot, Self::Error>;
}

/// Source of per-track analysis
pub trait AnalysisProvider {
    type Error: fmt::Display;

    fn analysis_for(&mut self, track: &TrackId) -> Result<Analysis, Self::Error>;
}

impl<T: PlaybackProvider + ?Sized> PlaybackProvider for &mut T {
    type Error = T::Error;

    fn current_snapshot(&mut self) -> Result<PlaybackSnapshot, Self::Error> {
        (**self).current_snapshot()
    }
}

impl<T: AnalysisProvider + ?Sized> AnalysisProvider for &mut T {
    type Error = T::Error;

    fn analysis_for(&mut self, track: &TrackId) -> Result<Analysis, Self::Error> {
        (**self).analysis_for(track)
    }
}

/// What to render for one beat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatAction {
    /// Fade start color into end color over the beat
    Fade,
    /// Show the end color for the beat
    Hold,
}

/// Loudness-weighted tempo of the segment containing `beat`
///
/// Returns `None` when the analysis has no segments.
pub fn beat_intensity(analysis: &Analysis, beat: &Beat) -> Option<f32> {
    let segment = analysis.segment_at(beat.start_ms)?;
    Some(loudness_norm(segment.loudness_max_db) * analysis.tempo_bpm)
}

/// Decide between fade and hold for `beat`
pub fn decide(analysis: &Analysis, beat: &Beat, threshold: f32) -> BeatAction {
    match beat_intensity(analysis, beat) {
        Some(intensity) if intensity > threshold => BeatAction::Fade,
        _ => BeatAction::Hold,
    }
}

/// Why a sync run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncExit {
    Cancelled,
    /// `max_idle_polls` consecutive polls found nothing to follow
    SourceLost,
}

enum TrackExit {
    Cancelled,
    /// Playback stopped, changed track or the provider failed
    Interrupted,
}

/// Monotonic index into the beat list
#[derive(Debug, Clone)]
pub struct BeatCursor<'a> {
    beats: &'a [Beat],
    index: usize,
}

impl<'a> BeatCursor<'a> {
    /// Cursor positioned at the first beat still sounding at `position_ms`
    pub fn starting_at(beats: &'a [Beat], position_ms: u64) -> Self {
        let index = beats
            .iter()
            .position(|beat| beat.end_ms() > position_ms)
            .unwrap_or(beats.len());
        Self { beats, index }
    }

    /// Next beat that started at or before `position_ms`, advancing past it
    pub fn next_due(&mut self, position_ms: u64) -> Option<&'a Beat> {
        let beat = self.beats.get(self.index)?;
        if beat.start_ms > position_ms {
            return None;
        }
        self.index += 1;
        Some(beat)
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn is_exhausted(&self) -> bool {
        self.index >= self.beats.len()
    }
}

/// Doubling wait between `initial` and `max`
#[derive(Debug, Clone, Copy)]
struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    fn new(initial: Duration, max: Duration) -> Self {
        let max = max.max(initial);
        Self {
            initial,
            max,
            current: initial,
        }
    }

    fn next(&mut self) -> Duration {
        let wait = self.current;
        self.current =
            Duration::from_ticks(self.current.as_ticks().saturating_mul(2)).min(self.max);
        wait
    }

    fn reset(&mut self) {
        self.current = self.initial;
    }
}

/// Beat Sync Driver - renders beats of the track an external player is on
pub struct BeatSyncDriver<PB, AN> {
    playback: PB,
    analysis: AN,
    config: SyncConfig,
    start_color: Rgb,
    end_color: Rgb,
}

impl<PB, AN> BeatSyncDriver<PB, AN>
where
    PB: PlaybackProvider,
    AN: AnalysisProvider,
{
    pub fn new(
        playback: PB,
        analysis: AN,
        config: SyncConfig,
        start_color: Rgb,
        end_color: Rgb,
    ) -> Self {
        Self {
            playback,
            analysis,
            config,
            start_color,
            end_color,
        }
    }

    /// Follow playback until cancelled or the source is lost
    ///
    /// Provider failures are logged and waited out. Render failures stop
    /// the run and are returned.
    pub fn run<D, P, C>(
        &mut self,
        renderer: &mut Renderer<D, P>,
        cancel: &C,
    ) -> Result<SyncExit, SequencerError>
    where
        D: OutputDriver,
        P: Pacer,
        C: CancelSignal + ?Sized,
    {
        log::info!("beat sync started");
        let mut backoff = Backoff::new(self.config.retry_initial, self.config.retry_max);
        let mut idle_polls = 0u32;

        loop {
            if cancel.is_cancelled() {
                log::info!("beat sync cancelled");
                return Ok(SyncExit::Cancelled);
            }

            let analysed = self.poll_playing().and_then(|(track, position)| {
                match self.analysis.analysis_for(&track) {
                    Ok(analysis) => Some((track, position, analysis)),
                    Err(err) => {
                        let err = SequencerError::ProviderUnavailable(err.to_string());
                        log::warn!("no analysis for {track}: {err}");
                        None
                    }
                }
            });

            let Some((track, position, analysis)) = analysed else {
                idle_polls += 1;
                if self
                    .config
                    .max_idle_polls
                    .is_some_and(|max| idle_polls > max)
                {
                    log::warn!("beat sync lost its source after {idle_polls} idle polls");
                    return Ok(SyncExit::SourceLost);
                }
                if self.retry_wait(renderer, backoff.next(), cancel) {
                    log::info!("beat sync cancelled");
                    return Ok(SyncExit::Cancelled);
                }
                continue;
            };

            backoff.reset();
            idle_polls = 0;
            log::info!(
                "following {track}: {} beats, {} segments, {:.1} bpm",
                analysis.beats.len(),
                analysis.segments.len(),
                analysis.tempo_bpm
            );

            match self.follow_track(renderer, &track, &analysis, position, cancel)? {
                TrackExit::Cancelled => {
                    log::info!("beat sync cancelled");
                    return Ok(SyncExit::Cancelled);
                }
                TrackExit::Interrupted => log::info!("playback of {track} interrupted"),
            }
        }
    }

    fn follow_track<D, P, C>(
        &mut self,
        renderer: &mut Renderer<D, P>,
        track: &TrackId,
        analysis: &Analysis,
        mut position_ms: u64,
        cancel: &C,
    ) -> Result<TrackExit, SequencerError>
    where
        D: OutputDriver,
        P: Pacer,
        C: CancelSignal + ?Sized,
    {
        let mut cursor = BeatCursor::starting_at(&analysis.beats, position_ms);
        if analysis.beats.is_empty() {
            log::info!("{track} has no beats, holding end color");
            renderer.write(scale_color(self.end_color, self.config.brightness))?;
        }

        loop {
            if cancel.is_cancelled() {
                return Ok(TrackExit::Cancelled);
            }

            let mut rendered = false;
            while let Some(beat) = cursor.next_due(position_ms) {
                if cancel.is_cancelled() {
                    return Ok(TrackExit::Cancelled);
                }
                let action = decide(analysis, beat, self.config.intensity_threshold);
                log::debug!(
                    "beat {} at {} ms ({} ms): {action:?}",
                    cursor.index() - 1,
                    beat.start_ms,
                    beat.duration_ms
                );

                let segment = self.beat_segment(action, beat);
                if renderer.fade(&segment, cancel)?.is_cancelled() {
                    return Ok(TrackExit::Cancelled);
                }
                rendered = true;
            }

            if !rendered {
                renderer.idle(self.config.poll_interval);
            }

            match self.poll_playing() {
                Some((current, position)) if current == *track => position_ms = position,
                _ => return Ok(TrackExit::Interrupted),
            }
        }
    }

    /// Sleep `wait` in `poll_interval` slices, returning `true` if cancelled
    fn retry_wait<D, P, C>(
        &self,
        renderer: &mut Renderer<D, P>,
        wait: Duration,
        cancel: &C,
    ) -> bool
    where
        D: OutputDriver,
        P: Pacer,
        C: CancelSignal + ?Sized,
    {
        let mut remaining = wait.as_ticks();
        let slice = match self.config.poll_interval.as_ticks() {
            0 => remaining,
            ticks => ticks,
        };

        while remaining > 0 {
            if cancel.is_cancelled() {
                return true;
            }
            let ticks = remaining.min(slice);
            renderer.idle(Duration::from_ticks(ticks));
            remaining -= ticks;
        }
        false
    }

    fn beat_segment(&self, action: BeatAction, beat: &Beat) -> FadeSegment {
        let duration = saturating_millis(beat.duration_ms);
        let segment = match action {
            BeatAction::Fade => FadeSegment::new(
                self.start_color,
                self.end_color,
                duration,
                self.config.fade_steps,
            ),
            BeatAction::Hold => FadeSegment::hold(self.end_color, duration),
        };
        segment.with_brightness(self.config.brightness)
    }

    /// Poll the player, treating provider errors as "not playing"
    fn poll_playing(&mut self) -> Option<(TrackId, u64)> {
        match self.playback.current_snapshot() {
            Ok(snapshot) => snapshot.playing_track(),
            Err(err) => {
                let err = SequencerError::ProviderUnavailable(err.to_string());
                log::warn!("{err}");
                None
            }
        }
    }
}
