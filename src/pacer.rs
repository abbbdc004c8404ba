use embassy_time::Duration;

use crate::Pacer;

/// Pacer backed by `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) {
        if duration.as_ticks() == 0 {
            return;
        }
        std::thread::sleep(std::time::Duration::from_micros(duration.as_micros()));
    }
}
