//! Millisecond conversions that cannot overflow the tick counter
//!
//! `Duration::from_millis` multiplies by the tick rate and overflows for
//! very large inputs. Untrusted millisecond values go through these helpers.

use embassy_time::{Duration, TICK_HZ};

/// Largest millisecond value that fits in a [`Duration`]
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
pub const MAX_DURATION_MS: u64 = {
    let ms = u64::MAX as u128 * 1_000 / TICK_HZ as u128;
    if ms > u64::MAX as u128 { u64::MAX } else { ms as u64 }
};

/// Milliseconds to [`Duration`], or `None` past [`MAX_DURATION_MS`]
pub fn checked_millis(ms: u64) -> Option<Duration> {
    let ticks = (u128::from(ms) * u128::from(TICK_HZ)).div_ceil(1_000);
    u64::try_from(ticks).ok().map(Duration::from_ticks)
}

/// Milliseconds to [`Duration`], clamped to the longest representable one
pub fn saturating_millis(ms: u64) -> Duration {
    checked_millis(ms.min(MAX_DURATION_MS)).unwrap_or(Duration::MAX)
}
