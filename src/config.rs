use embassy_time::Duration;

use crate::color::DEFAULT_GAMMA;
use crate::pattern::KeyframeTransition;

/// Interpolation steps per keyframe in pattern playback
pub const DEFAULT_PATTERN_STEPS: u32 = 300;

/// Interpolation steps per loud beat in beat sync
pub const DEFAULT_FADE_STEPS: u32 = 50;

/// Loudness-weighted tempo above which a beat fades instead of holding
pub const DEFAULT_INTENSITY_THRESHOLD: f32 = 125.0;

/// Pause between position polls, also the slice size of retry waits
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// First retry wait while playback is unavailable
pub const DEFAULT_RETRY_INITIAL: Duration = Duration::from_millis(500);

/// Cap for the doubling retry wait
pub const DEFAULT_RETRY_MAX: Duration = Duration::from_millis(5_000);

/// Configuration for pattern playback
#[derive(Debug, Clone, Copy)]
pub struct PatternConfig {
    /// Frames per keyframe fade
    pub steps: u32,
    /// Scale factor (0.0-1.0)
    pub brightness: f32,
    /// How consecutive keyframes are joined
    pub transition: KeyframeTransition,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_PATTERN_STEPS,
            brightness: 1.0,
            transition: KeyframeTransition::Fade,
        }
    }
}

/// Configuration for beat synchronization
#[derive(Debug, Clone, Copy)]
pub struct SyncConfig {
    /// Frames per loud-beat fade
    pub fade_steps: u32,
    /// Fade when `loudness_norm * tempo` exceeds this
    pub intensity_threshold: f32,
    /// Scale factor (0.0-1.0)
    pub brightness: f32,
    /// Pause between position polls when no beat is due
    pub poll_interval: Duration,
    /// First wait while playback is stopped or unavailable
    pub retry_initial: Duration,
    /// Upper bound for the doubling wait
    pub retry_max: Duration,
    /// Give up after this many consecutive idle polls (`None` waits forever)
    pub max_idle_polls: Option<u32>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            fade_steps: DEFAULT_FADE_STEPS,
            intensity_threshold: DEFAULT_INTENSITY_THRESHOLD,
            brightness: 1.0,
            poll_interval: DEFAULT_POLL_INTERVAL,
            retry_initial: DEFAULT_RETRY_INITIAL,
            retry_max: DEFAULT_RETRY_MAX,
            max_idle_polls: None,
        }
    }
}

/// Configuration for the whole sequencer
#[derive(Debug, Clone, Copy)]
pub struct SequencerConfig {
    /// Display gamma
    pub gamma: f32,
    pub pattern: PatternConfig,
    pub sync: SyncConfig,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            pattern: PatternConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}
