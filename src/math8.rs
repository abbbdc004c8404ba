/// Clamp a float channel value into `0..=255`, truncating the fraction
///
/// NaN maps to zero.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp8(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0) as u8
}

/// Interpolate one channel at `step` of `steps`, then scale by `brightness`
///
/// `raw = a + (b - a) * step / steps`. With zero steps the start value is
/// returned.
#[inline]
#[allow(clippy::cast_precision_loss)]
pub fn lerp8(a: u8, b: u8, step: u32, steps: u32, brightness: f32) -> u8 {
    let a = f32::from(a);
    let raw = if steps == 0 {
        a
    } else {
        a + (f32::from(b) - a) * step as f32 / steps as f32
    };
    clamp8(raw * brightness)
}

/// Clamp a brightness factor into `0.0..=1.0`
///
/// NaN maps to zero.
#[inline]
pub fn unit_clamp(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
