#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use myrtio_light_sequencer::{
    Analysis, AnalysisProvider, Duration, OutputDriver, Pacer, PlaybackProvider,
    PlaybackSnapshot, Renderer, Rgb, TrackId,
};

/// Driver that records every flushed color
#[derive(Clone, Default)]
pub struct RecordingDriver {
    frames: Rc<RefCell<Vec<Rgb>>>,
    pending: Option<Rgb>,
    fail_after: Option<usize>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every flush once `frames` frames were recorded
    pub fn failing_after(frames: usize) -> Self {
        Self {
            fail_after: Some(frames),
            ..Self::default()
        }
    }

    pub fn frames(&self) -> Rc<RefCell<Vec<Rgb>>> {
        Rc::clone(&self.frames)
    }
}

impl OutputDriver for RecordingDriver {
    type Error = &'static str;

    fn set_all(&mut self, color: Rgb) -> Result<(), Self::Error> {
        self.pending = Some(color);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        let mut frames = self.frames.borrow_mut();
        if self.fail_after.is_some_and(|limit| frames.len() >= limit) {
            return Err("strip disconnected");
        }
        frames.extend(self.pending.take());
        Ok(())
    }
}

/// Pacer that records pauses instead of sleeping
#[derive(Clone, Default)]
pub struct RecordingPacer {
    pauses: Rc<RefCell<Vec<Duration>>>,
}

impl RecordingPacer {
    pub fn pauses(&self) -> Rc<RefCell<Vec<Duration>>> {
        Rc::clone(&self.pauses)
    }
}

impl Pacer for RecordingPacer {
    fn pause(&mut self, duration: Duration) {
        self.pauses.borrow_mut().push(duration);
    }
}

pub struct Harness {
    pub renderer: Renderer<RecordingDriver, RecordingPacer>,
    pub frames: Rc<RefCell<Vec<Rgb>>>,
    pub pauses: Rc<RefCell<Vec<Duration>>>,
}

pub fn harness() -> Harness {
    harness_with(RecordingDriver::new())
}

pub fn harness_with(driver: RecordingDriver) -> Harness {
    let pacer = RecordingPacer::default();
    let frames = driver.frames();
    let pauses = pacer.pauses();
    Harness {
        renderer: Renderer::new(driver, pacer),
        frames,
        pauses,
    }
}

/// Playback provider that replays a script, then reports "stopped"
///
/// Once the script runs out it raises `exhausted`, which tests use as the
/// cancel signal.
pub struct ScriptedPlayback {
    script: VecDeque<Result<PlaybackSnapshot, String>>,
    pub exhausted: Rc<RefCell<bool>>,
}

impl ScriptedPlayback {
    pub fn new(script: Vec<Result<PlaybackSnapshot, String>>) -> Self {
        Self {
            script: script.into(),
            exhausted: Rc::new(RefCell::new(false)),
        }
    }
}

impl PlaybackProvider for ScriptedPlayback {
    type Error = String;

    fn current_snapshot(&mut self) -> Result<PlaybackSnapshot, Self::Error> {
        match self.script.pop_front() {
            Some(next) => next,
            None => {
                *self.exhausted.borrow_mut() = true;
                Ok(PlaybackSnapshot::stopped())
            }
        }
    }
}

/// Analysis provider serving fixed analyses and recording requests
#[derive(Default)]
pub struct FixedAnalysis {
    tracks: Vec<(TrackId, Analysis)>,
    pub requests: Vec<TrackId>,
}

impl FixedAnalysis {
    pub fn with(mut self, track: &str, analysis: Analysis) -> Self {
        self.tracks.push((TrackId::from(track), analysis));
        self
    }
}

impl AnalysisProvider for FixedAnalysis {
    type Error = String;

    fn analysis_for(&mut self, track: &TrackId) -> Result<Analysis, Self::Error> {
        self.requests.push(track.clone());
        self.tracks
            .iter()
            .find(|(id, _)| id == track)
            .map(|(_, analysis)| analysis.clone())
            .ok_or_else(|| format!("no analysis for {track}"))
    }
}
