//! Adapter from [`smart_leds::SmartLedsWrite`] to [`OutputDriver`]
//!
//! Keeps a frame buffer of the strip length; `set_all` fills the buffer and
//! `flush` pushes it to the writer.

use smart_leds::SmartLedsWrite;

use crate::{OutputDriver, Rgb};

/// Number of LEDs on the default strip
pub const DEFAULT_LED_COUNT: usize = 300;

/// Whole-strip driver on top of any smart-leds writer
pub struct SmartLedsDriver<W> {
    writer: W,
    frame: Vec<Rgb>,
}

impl<W> SmartLedsDriver<W>
where
    W: SmartLedsWrite<Color = Rgb>,
{
    /// Create a driver for a strip of `led_count` pixels
    pub fn new(writer: W, led_count: usize) -> Self {
        Self {
            writer,
            frame: vec![Rgb::default(); led_count],
        }
    }

    /// Current frame buffer
    pub fn frame(&self) -> &[Rgb] {
        &self.frame
    }

    pub fn led_count(&self) -> usize {
        self.frame.len()
    }

    /// Release the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> OutputDriver for SmartLedsDriver<W>
where
    W: SmartLedsWrite<Color = Rgb>,
    W::Error: core::fmt::Debug,
{
    type Error = W::Error;

    fn set_all(&mut self, color: Rgb) -> Result<(), Self::Error> {
        self.frame.fill(color);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.writer.write(self.frame.iter().copied())
    }
}
