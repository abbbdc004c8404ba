mod gamma;
mod utils;

pub use gamma::{DEFAULT_GAMMA, GammaTable, decode, encode};
pub use utils::{lerp_colors, rgb_from_u32, scale_color};
use smart_leds::RGB8;

pub type Rgb = RGB8;
