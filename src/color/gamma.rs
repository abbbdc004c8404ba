//! Gamma correction
//!
//! Converts between linear brightness and the perceptual value sent to the
//! strip: `display = round((linear / 255) ^ gamma * 255)`.

use crate::color::Rgb;

/// Default display gamma
pub const DEFAULT_GAMMA: f32 = 1.9;

/// Precomputed encode/decode lookup tables for one gamma value
#[derive(Debug, Clone)]
pub struct GammaTable {
    gamma: f32,
    encode: [u8; 256],
    decode: [u8; 256],
}

impl GammaTable {
    /// Build tables for `gamma`
    ///
    /// Non-finite or non-positive values fall back to [`DEFAULT_GAMMA`].
    pub fn new(gamma: f32) -> Self {
        let gamma = if gamma.is_finite() && gamma > 0.0 {
            gamma
        } else {
            DEFAULT_GAMMA
        };

        let mut encode = [0u8; 256];
        let mut decode = [0u8; 256];
        for value in 0..=u8::MAX {
            encode[usize::from(value)] = pow8(value, gamma);
            decode[usize::from(value)] = pow8(value, 1.0 / gamma);
        }

        Self {
            gamma,
            encode,
            decode,
        }
    }

    pub const fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Linear channel value to display value
    #[inline]
    pub const fn encode8(&self, value: u8) -> u8 {
        self.encode[value as usize]
    }

    /// Display channel value to linear value
    #[inline]
    pub const fn decode8(&self, value: u8) -> u8 {
        self.decode[value as usize]
    }

    /// Encode every channel of a linear color
    pub const fn encode(&self, color: Rgb) -> Rgb {
        Rgb {
            r: self.encode8(color.r),
            g: self.encode8(color.g),
            b: self.encode8(color.b),
        }
    }

    /// Decode every channel of a display color
    pub const fn decode(&self, color: Rgb) -> Rgb {
        Rgb {
            r: self.decode8(color.r),
            g: self.decode8(color.g),
            b: self.decode8(color.b),
        }
    }
}

impl Default for GammaTable {
    fn default() -> Self {
        Self::new(DEFAULT_GAMMA)
    }
}

/// Encode a linear color with [`DEFAULT_GAMMA`]
pub fn encode(color: Rgb) -> Rgb {
    Rgb {
        r: pow8(color.r, DEFAULT_GAMMA),
        g: pow8(color.g, DEFAULT_GAMMA),
        b: pow8(color.b, DEFAULT_GAMMA),
    }
}

/// Decode a display color with [`DEFAULT_GAMMA`]
pub fn decode(color: Rgb) -> Rgb {
    let exponent = 1.0 / DEFAULT_GAMMA;
    Rgb {
        r: pow8(color.r, exponent),
        g: pow8(color.g, exponent),
        b: pow8(color.b, exponent),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pow8(value: u8, exponent: f32) -> u8 {
    let normalized = f32::from(value) / 255.0;
    let scaled = libm::roundf(libm::powf(normalized, exponent) * 255.0);
    scaled.clamp(0.0, 255.0) as u8
}
