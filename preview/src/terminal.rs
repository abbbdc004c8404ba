use std::io::{self, Stdout, Write};

use myrtio_light_sequencer::Rgb;
use smart_leds::SmartLedsWrite;

/// Strip drawn as one line of true-color cells
///
/// Long strips are sampled down to `columns` cells. Each write redraws the
/// line in place.
pub struct TerminalStrip {
    out: Stdout,
    columns: usize,
    line: String,
}

impl TerminalStrip {
    pub fn new(columns: usize) -> Self {
        Self {
            out: io::stdout(),
            columns: columns.max(1),
            line: String::new(),
        }
    }
}

impl SmartLedsWrite for TerminalStrip {
    type Error = io::Error;
    type Color = Rgb;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let leds: Vec<Rgb> = iterator.into_iter().map(Into::into).collect();
        if leds.is_empty() {
            return Ok(());
        }

        self.line.clear();
        self.line.push('\r');
        let cells = self.columns.min(leds.len());
        for cell in 0..cells {
            let led = leds[cell * leds.len() / cells];
            self.line
                .push_str(&format!("\x1b[48;2;{};{};{}m ", led.r, led.g, led.b));
        }
        self.line.push_str("\x1b[0m");

        let mut out = self.out.lock();
        out.write_all(self.line.as_bytes())?;
        out.flush()
    }
}

impl Drop for TerminalStrip {
    fn drop(&mut self) {
        let mut out = self.out.lock();
        let _ = out.write_all(b"\x1b[0m\n");
        let _ = out.flush();
    }
}
