//! Beat and segment analysis of a track
//!
//! All times inside the sequencer are milliseconds. Analysis documents that
//! express times in seconds are converted once, in
//! [`Analysis::from_seconds_json`].

use serde::Deserialize;

use crate::error::SequencerError;
use crate::time::MAX_DURATION_MS;

/// Loudness (dB) mapped to zero by [`loudness_norm`]
pub const LOUDNESS_FLOOR_DB: f32 = -60.0;

/// Time interval with a loudness characteristic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start_ms: u64,
    pub duration_ms: u64,
    /// Peak loudness within the segment (dB, usually negative)
    pub loudness_max_db: f32,
}

impl Segment {
    pub const fn end_ms(&self) -> u64 {
        self.start_ms.saturating_add(self.duration_ms)
    }

    /// `start_ms <= time_ms < end_ms`
    pub const fn contains(&self, time_ms: u64) -> bool {
        self.start_ms <= time_ms && time_ms < self.end_ms()
    }
}

/// Rhythmic pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Beat {
    pub start_ms: u64,
    pub duration_ms: u64,
}

impl Beat {
    pub const fn end_ms(&self) -> u64 {
        self.start_ms.saturating_add(self.duration_ms)
    }
}

/// Timing and loudness analysis of one track
///
/// Segments and beats are sorted ascending by start time. Either may be
/// empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Analysis {
    pub segments: Vec<Segment>,
    pub beats: Vec<Beat>,
    pub tempo_bpm: f32,
}

impl Analysis {
    /// Build an analysis, sorting segments and beats by start time
    pub fn new(mut segments: Vec<Segment>, mut beats: Vec<Beat>, tempo_bpm: f32) -> Self {
        segments.sort_by_key(|segment| segment.start_ms);
        beats.sort_by_key(|beat| beat.start_ms);
        Self {
            segments,
            beats,
            tempo_bpm,
        }
    }

    /// Parse a seconds-based analysis document
    ///
    /// Expects `track.tempo`, `segments[].{start, duration, loudness_max}`
    /// and `beats[].{start, duration}`, times in seconds.
    pub fn from_seconds_json(json: &str) -> Result<Self, SequencerError> {
        let document: SecondsDocument = serde_json::from_str(json)
            .map_err(|err| SequencerError::ProviderUnavailable(format!("bad analysis: {err}")))?;
        Ok(document.into())
    }

    /// End of the last beat or segment
    pub fn end_ms(&self) -> u64 {
        let segments = self.segments.iter().map(Segment::end_ms);
        let beats = self.beats.iter().map(Beat::end_ms);
        segments.chain(beats).max().unwrap_or(0)
    }

    /// Segment containing `time_ms`, or the last segment when none does
    pub fn segment_at(&self, time_ms: u64) -> Option<&Segment> {
        let after = self
            .segments
            .partition_point(|segment| segment.start_ms <= time_ms);
        after
            .checked_sub(1)
            .and_then(|index| self.segments.get(index))
            .filter(|segment| segment.contains(time_ms))
            .or_else(|| self.segments.last())
    }
}

/// Map loudness to `0.0..=1.0`, with -60 dB and below as silence
pub fn loudness_norm(loudness_db: f32) -> f32 {
    let norm = (loudness_db - LOUDNESS_FLOOR_DB) / -LOUDNESS_FLOOR_DB;
    if norm.is_nan() {
        return 0.0;
    }
    norm.clamp(0.0, 1.0)
}

/// Convert seconds to whole milliseconds, rounding to nearest
///
/// Negative and NaN inputs give zero. Large inputs, infinity included,
/// clamp to [`MAX_DURATION_MS`].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn seconds_to_ms(seconds: f64) -> u64 {
    if seconds.is_nan() || seconds <= 0.0 {
        return 0;
    }
    ((seconds * 1000.0).round() as u64).min(MAX_DURATION_MS)
}

#[derive(Debug, Deserialize)]
struct SecondsDocument {
    #[serde(default)]
    track: SecondsTrack,
    #[serde(default)]
    segments: Vec<SecondsSegment>,
    #[serde(default)]
    beats: Vec<SecondsInterval>,
}

#[derive(Debug, Default, Deserialize)]
struct SecondsTrack {
    #[serde(default)]
    tempo: f32,
}

#[derive(Debug, Deserialize)]
struct SecondsSegment {
    start: f64,
    duration: f64,
    loudness_max: f32,
}

#[derive(Debug, Deserialize)]
struct SecondsInterval {
    start: f64,
    duration: f64,
}

impl From<SecondsDocument> for Analysis {
    fn from(document: SecondsDocument) -> Self {
        let segments = document
            .segments
            .iter()
            .map(|segment| Segment {
                start_ms: seconds_to_ms(segment.start),
                duration_ms: seconds_to_ms(segment.duration),
                loudness_max_db: segment.loudness_max,
            })
            .collect();
        let beats = document
            .beats
            .iter()
            .map(|beat| Beat {
                start_ms: seconds_to_ms(beat.start),
                duration_ms: seconds_to_ms(beat.duration),
            })
            .collect();
        Self::new(segments, beats, document.track.tempo)
    }
}
