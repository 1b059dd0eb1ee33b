//! Area Color
//!
//! Perceptual color engine for the material theming daemon: CAM16 and HCT
//! color spaces, tonal palettes, wallpaper quantization, seed scoring and the
//! Material 3 dynamic color scheme.
//!
//! Everything here is pure and synchronous. The same inputs always produce
//! the same colors.

pub mod cam16;
pub mod contrast;
pub mod dislike;
pub mod dynamic_color;
pub mod hct;
pub mod palette;
pub mod quantize;
pub mod roles;
pub mod scheme;
pub mod score;
pub mod temperature;
pub mod utils;

pub use hct::Hct;
pub use palette::TonalPalette;
pub use quantize::{QuantizerCelebi, QuantizerResult, QuantizerWsmeans, QuantizerWu};
pub use scheme::{DynamicScheme, UnknownVariant, Variant};
pub use score::{score, ScoreOptions, FALLBACK_SEED};
