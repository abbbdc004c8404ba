use embassy_time::Duration;

use crate::cancel::CancelSignal;
use crate::color::{DEFAULT_GAMMA, GammaTable, Rgb};
use crate::error::SequencerError;
use crate::transition::FadeSegment;
use crate::{OutputDriver, Pacer};

/// Result of playing one [`FadeSegment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeOutcome {
    /// All steps were emitted
    Completed { frames: u32 },
    /// The cancel signal fired before the last step
    Cancelled { frames: u32 },
}

impl FadeOutcome {
    /// Number of frames written to the driver
    pub const fn frames(self) -> u32 {
        match self {
            Self::Completed { frames } | Self::Cancelled { frames } => frames,
        }
    }

    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Renderer - owns the strip and turns linear colors into paced frames
///
/// Every frame is gamma-encoded, written to all pixels and flushed.
pub struct Renderer<D: OutputDriver, P: Pacer> {
    driver: D,
    pacer: P,
    gamma: GammaTable,
}

impl<D: OutputDriver, P: Pacer> Renderer<D, P> {
    /// Create a renderer with the default gamma
    pub fn new(driver: D, pacer: P) -> Self {
        Self::with_gamma(driver, pacer, DEFAULT_GAMMA)
    }

    /// Create a renderer with a custom gamma
    pub fn with_gamma(driver: D, pacer: P, gamma: f32) -> Self {
        Self {
            driver,
            pacer,
            gamma: GammaTable::new(gamma),
        }
    }

    /// Write one linear color to the whole strip
    pub fn write(&mut self, linear: Rgb) -> Result<(), SequencerError> {
        let color = self.gamma.encode(linear);
        self.driver
            .set_all(color)
            .and_then(|()| self.driver.flush())
            .map_err(|err| {
                let err = SequencerError::RenderFailure(format!("{err:?}"));
                log::error!("{err}");
                err
            })
    }

    /// Play a fade segment
    ///
    /// Polls `cancel` before each step and pauses `duration / steps` after
    /// each emitted frame. A cancelled fade leaves the strip on whatever
    /// frame was written last.
    pub fn fade<C>(
        &mut self,
        segment: &FadeSegment,
        cancel: &C,
    ) -> Result<FadeOutcome, SequencerError>
    where
        C: CancelSignal + ?Sized,
    {
        let interval = segment.step_interval();
        let mut frames = 0;

        for color in segment.frames() {
            if cancel.is_cancelled() {
                return Ok(FadeOutcome::Cancelled { frames });
            }
            self.write(color)?;
            frames += 1;
            self.idle(interval);
        }

        Ok(FadeOutcome::Completed { frames })
    }

    /// Show one color for `duration`
    pub fn hold<C>(
        &mut self,
        color: Rgb,
        duration: Duration,
        cancel: &C,
    ) -> Result<FadeOutcome, SequencerError>
    where
        C: CancelSignal + ?Sized,
    {
        self.fade(&FadeSegment::hold(color, duration), cancel)
    }

    /// Wait without touching the strip
    pub fn idle(&mut self, duration: Duration) {
        if duration.as_ticks() > 0 {
            self.pacer.pause(duration);
        }
    }

    pub fn gamma(&self) -> &GammaTable {
        &self.gamma
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Release the driver and pacer
    pub fn into_parts(self) -> (D, P) {
        (self.driver, self.pacer)
    }
}
