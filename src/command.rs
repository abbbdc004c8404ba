//! Light commands
//!
//! A command is a JSON object with a `pattern` array of keyframes:
//!
//! ```json
//! {"pattern": [{"r": 255, "g": 0, "b": 0, "duration": 3000}]}
//! ```
//!
//! Durations are milliseconds.

use core::fmt;
use core::str::FromStr;

use embassy_time::Duration;
use serde::{Deserialize, Deserializer};

use crate::color::Rgb;
use crate::error::{CommandError, SequencerError};
use crate::pattern::{Keyframe, Pattern};
use crate::time::{MAX_DURATION_MS, checked_millis};

/// Keyframes shorter than this are accepted but usually too fast to read
pub const RECOMMENDED_MIN_DURATION_MS: u64 = 3_000;

#[derive(Debug, Deserialize)]
struct RawCommand {
    pattern: Option<Vec<RawKeyframe>>,
}

#[derive(Debug, Deserialize)]
struct RawKeyframe {
    r: u8,
    g: u8,
    b: u8,
    #[serde(deserialize_with = "millis")]
    duration: Duration,
}

fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let ms = u64::deserialize(deserializer)?;
    checked_millis(ms).ok_or_else(|| {
        <D::Error as serde::de::Error>::custom(format_args!(
            "duration {ms} ms exceeds the maximum of {MAX_DURATION_MS} ms"
        ))
    })
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightCommand {
    pub pattern: Pattern,
}

impl LightCommand {
    /// Parse a JSON command
    pub fn parse(json: &str) -> Result<Self, SequencerError> {
        let raw: RawCommand = serde_json::from_str(json).map_err(|err| {
            if err.is_data() {
                CommandError::Structure(err)
            } else {
                CommandError::Json(err)
            }
        })?;
        let raw_pattern = raw.pattern.ok_or(CommandError::MissingPattern)?;

        let keyframes: Vec<Keyframe> = raw_pattern
            .iter()
            .map(|step| Keyframe::new(Rgb::new(step.r, step.g, step.b), step.duration))
            .collect();
        let recommended = Duration::from_millis(RECOMMENDED_MIN_DURATION_MS);
        if let Some(short) = raw_pattern.iter().find(|step| step.duration < recommended) {
            log::debug!(
                "keyframe duration {} ms is below the recommended {} ms",
                short.duration.as_millis(),
                RECOMMENDED_MIN_DURATION_MS
            );
        }

        Ok(Self {
            pattern: Pattern::from_vec(keyframes)?,
        })
    }
}

impl FromStr for LightCommand {
    type Err = SequencerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// User-facing outcome of handling a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    PatternSet,
    InvalidFormat,
    InvalidJson,
}

impl CommandStatus {
    /// Classify a parse result
    pub fn of(result: &Result<LightCommand, SequencerError>) -> Self {
        match result {
            Ok(_) => Self::PatternSet,
            Err(SequencerError::MalformedCommand(CommandError::Json(_))) => Self::InvalidJson,
            Err(_) => Self::InvalidFormat,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::PatternSet => "LED pattern set.",
            Self::InvalidFormat => "Invalid command format.",
            Self::InvalidJson => "Invalid JSON command.",
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
