//! Fade segments
//!
//! A [`FadeSegment`] describes one interpolation run between two colors.
//! Its frames are produced lazily and stay in linear space; gamma is applied
//! by the renderer.

use embassy_time::Duration;

use crate::color::{Rgb, lerp_colors};
use crate::math8::unit_clamp;

/// One interpolation run from `from` to `to`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeSegment {
    pub from: Rgb,
    pub to: Rgb,
    /// Total time spread over all steps
    pub duration: Duration,
    /// Number of emitted frames
    pub steps: u32,
    /// Scale factor (0.0-1.0)
    pub brightness: f32,
}

impl FadeSegment {
    /// Create a full-brightness fade
    pub const fn new(from: Rgb, to: Rgb, duration: Duration, steps: u32) -> Self {
        Self {
            from,
            to,
            duration,
            steps,
            brightness: 1.0,
        }
    }

    /// Single frame of `color` followed by a pause of `duration`
    pub const fn hold(color: Rgb, duration: Duration) -> Self {
        Self::new(color, color, duration, 1)
    }

    /// Set brightness, clamped into `0.0..=1.0`
    #[must_use]
    pub fn with_brightness(mut self, brightness: f32) -> Self {
        self.brightness = unit_clamp(brightness);
        self
    }

    /// Pause between two consecutive frames
    pub fn step_interval(&self) -> Duration {
        if self.steps == 0 {
            return Duration::from_ticks(0);
        }
        Duration::from_micros(self.duration.as_micros() / u64::from(self.steps))
    }

    /// Lazy sequence of linear frame colors
    pub fn frames(&self) -> FadeFrames {
        FadeFrames {
            segment: *self,
            step: 0,
        }
    }
}

/// Iterator over the linear colors of a [`FadeSegment`]
#[derive(Debug, Clone)]
pub struct FadeFrames {
    segment: FadeSegment,
    step: u32,
}

impl Iterator for FadeFrames {
    type Item = Rgb;

    fn next(&mut self) -> Option<Self::Item> {
        let segment = &self.segment;
        if self.step >= segment.steps {
            return None;
        }
        let color = lerp_colors(
            segment.from,
            segment.to,
            self.step,
            segment.steps,
            segment.brightness,
        );
        self.step += 1;
        Some(color)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.segment.steps.saturating_sub(self.step) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FadeFrames {}
