use std::path::Path;

use anyhow::{Context, Result};
use myrtio_light_sequencer::color::DEFAULT_GAMMA;
use myrtio_light_sequencer::config::{
    DEFAULT_FADE_STEPS, DEFAULT_INTENSITY_THRESHOLD, DEFAULT_PATTERN_STEPS, DEFAULT_POLL_INTERVAL,
    DEFAULT_RETRY_INITIAL, DEFAULT_RETRY_MAX,
};
use myrtio_light_sequencer::driver::DEFAULT_LED_COUNT;
use myrtio_light_sequencer::time::saturating_millis;
use myrtio_light_sequencer::{KeyframeTransition, PatternConfig, SequencerConfig, SyncConfig};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub strip: StripConfig,
    #[serde(default)]
    pub pattern: PatternSection,
    #[serde(default)]
    pub sync: SyncSection,
}

#[derive(Debug, Deserialize)]
pub struct StripConfig {
    #[serde(default = "default_led_count")]
    pub led_count: usize,
    /// Terminal cells used to draw the strip
    #[serde(default = "default_columns")]
    pub columns: usize,
    #[serde(default = "default_gamma")]
    pub gamma: f32,
}

#[derive(Debug, Deserialize)]
pub struct PatternSection {
    #[serde(default = "default_pattern_steps")]
    pub steps: u32,
    #[serde(default = "default_brightness")]
    pub brightness: f32,
    #[serde(default)]
    pub hold: bool,
}

#[derive(Debug, Deserialize)]
pub struct SyncSection {
    #[serde(default = "default_fade_steps")]
    pub fade_steps: u32,
    #[serde(default = "default_intensity_threshold")]
    pub intensity_threshold: f32,
    #[serde(default = "default_brightness")]
    pub brightness: f32,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_retry_initial_ms")]
    pub retry_initial_ms: u64,
    #[serde(default = "default_retry_max_ms")]
    pub retry_max_ms: u64,
    #[serde(default = "default_max_idle_polls")]
    pub max_idle_polls: Option<u32>,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            led_count: default_led_count(),
            columns: default_columns(),
            gamma: default_gamma(),
        }
    }
}

impl Default for PatternSection {
    fn default() -> Self {
        Self {
            steps: default_pattern_steps(),
            brightness: default_brightness(),
            hold: false,
        }
    }
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            fade_steps: default_fade_steps(),
            intensity_threshold: default_intensity_threshold(),
            brightness: default_brightness(),
            poll_interval_ms: default_poll_interval_ms(),
            retry_initial_ms: default_retry_initial_ms(),
            retry_max_ms: default_retry_max_ms(),
            max_idle_polls: default_max_idle_polls(),
        }
    }
}

fn default_led_count() -> usize {
    DEFAULT_LED_COUNT
}

fn default_columns() -> usize {
    60
}

fn default_gamma() -> f32 {
    DEFAULT_GAMMA
}

fn default_pattern_steps() -> u32 {
    DEFAULT_PATTERN_STEPS
}

fn default_fade_steps() -> u32 {
    DEFAULT_FADE_STEPS
}

fn default_intensity_threshold() -> f32 {
    DEFAULT_INTENSITY_THRESHOLD
}

fn default_brightness() -> f32 {
    1.0
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis()
}

fn default_retry_initial_ms() -> u64 {
    DEFAULT_RETRY_INITIAL.as_millis()
}

fn default_retry_max_ms() -> u64 {
    DEFAULT_RETRY_MAX.as_millis()
}

// The simulated track never resumes once it ends.
fn default_max_idle_polls() -> Option<u32> {
    Some(3)
}

impl Config {
    pub fn sequencer(&self) -> SequencerConfig {
        SequencerConfig {
            gamma: self.strip.gamma,
            pattern: PatternConfig {
                steps: self.pattern.steps,
                brightness: self.pattern.brightness,
                transition: if self.pattern.hold {
                    KeyframeTransition::Hold
                } else {
                    KeyframeTransition::Fade
                },
            },
            sync: SyncConfig {
                fade_steps: self.sync.fade_steps,
                intensity_threshold: self.sync.intensity_threshold,
                brightness: self.sync.brightness,
                poll_interval: saturating_millis(self.sync.poll_interval_ms),
                retry_initial: saturating_millis(self.sync.retry_initial_ms),
                retry_max: saturating_millis(self.sync.retry_max_ms),
                max_idle_polls: self.sync.max_idle_polls,
            },
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}
