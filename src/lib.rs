//! Keyframe and beat-synchronized LED strip sequencer
//!
//! Renders cyclic color patterns or music-driven fades onto a single
//! addressable strip. Every frame passes through gamma correction before it
//! reaches the [`OutputDriver`].

pub mod analysis;
pub mod cancel;
pub mod color;
pub mod command;
pub mod config;
pub mod driver;
pub mod error;
pub mod math8;
pub mod pacer;
pub mod pattern;
pub mod renderer;
pub mod sync;
pub mod time;
pub mod transition;
pub mod worker;

pub use analysis::{Analysis, Beat, Segment};
pub use cancel::{CancelSignal, CancelToken};
pub use color::{GammaTable, Rgb};
pub use command::{CommandStatus, LightCommand};
pub use config::{PatternConfig, SequencerConfig, SyncConfig};
pub use driver::SmartLedsDriver;
pub use error::{CommandError, SequencerError};
pub use pacer::ThreadPacer;
pub use pattern::{Keyframe, KeyframeTransition, Pattern, PatternPlayer, PatternRun, PlayerState};
pub use renderer::{FadeOutcome, Renderer};
pub use sync::{
    AnalysisProvider, BeatAction, BeatSyncDriver, PlaybackProvider, PlaybackSnapshot, SyncExit,
    TrackId,
};
pub use transition::FadeSegment;
pub use worker::RenderWorker;

pub use embassy_time::Duration;

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The renderer is generic over this trait.
pub trait OutputDriver {
    /// Error reported by the underlying hardware
    type Error: core::fmt::Debug;

    /// Set every pixel of the strip to one color
    fn set_all(&mut self, color: Rgb) -> Result<(), Self::Error>;

    /// Push the buffered colors to the strip
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Source of the pauses between rendered frames
///
/// Pauses are best effort; implementations may oversleep.
pub trait Pacer {
    /// Block the current render loop for `duration`
    fn pause(&mut self, duration: Duration);
}
