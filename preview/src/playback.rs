use std::convert::Infallible;
use std::time::Instant;

use myrtio_light_sequencer::{
    Analysis, AnalysisProvider, PlaybackProvider, PlaybackSnapshot, TrackId,
};

/// Plays a single track on the wall clock
///
/// The position starts at `offset_ms` and playback stops once it passes
/// `length_ms`.
pub struct ClockPlayback {
    track: TrackId,
    started: Instant,
    offset_ms: u64,
    length_ms: u64,
}

impl ClockPlayback {
    pub fn start(track: TrackId, offset_ms: u64, length_ms: u64) -> Self {
        Self {
            track,
            started: Instant::now(),
            offset_ms,
            length_ms,
        }
    }

    fn position_ms(&self) -> u64 {
        let elapsed = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.offset_ms.saturating_add(elapsed)
    }
}

impl PlaybackProvider for ClockPlayback {
    type Error = Infallible;

    fn current_snapshot(&mut self) -> Result<PlaybackSnapshot, Self::Error> {
        let position = self.position_ms();
        if position >= self.length_ms {
            return Ok(PlaybackSnapshot::stopped());
        }
        Ok(PlaybackSnapshot::playing(self.track.clone(), position))
    }
}

/// Serves one analysis loaded from disk
pub struct FileAnalysis {
    track: TrackId,
    analysis: Analysis,
}

impl FileAnalysis {
    pub fn new(track: TrackId, analysis: Analysis) -> Self {
        Self { track, analysis }
    }
}

impl AnalysisProvider for FileAnalysis {
    type Error = String;

    fn analysis_for(&mut self, track: &TrackId) -> Result<Analysis, Self::Error> {
        if *track == self.track {
            Ok(self.analysis.clone())
        } else {
            Err(format!("no analysis for {track}"))
        }
    }
}
