use crate::{
    color::Rgb,
    math8::{lerp8, unit_clamp},
};

/// Interpolate two RGB colors
///
/// # Arguments
/// * `a` - Start color
/// * `b` - End color
/// * `step` - Current step (0 = all a)
/// * `steps` - Total number of steps
/// * `brightness` - Scale factor applied after interpolation (0.0-1.0)
#[inline]
pub fn lerp_colors(a: Rgb, b: Rgb, step: u32, steps: u32, brightness: f32) -> Rgb {
    Rgb {
        r: lerp8(a.r, b.r, step, steps, brightness),
        g: lerp8(a.g, b.g, step, steps, brightness),
        b: lerp8(a.b, b.b, step, steps, brightness),
    }
}

/// Scale every channel by `brightness` (clamped to 0.0-1.0), truncating
#[inline]
pub fn scale_color(color: Rgb, brightness: f32) -> Rgb {
    lerp_colors(color, color, 0, 1, unit_clamp(brightness))
}

/// Create an RGB color from a u32 value (0xRRGGBB format)
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}
