//! Seed selection from a quantized palette

use area_color::{ScoreOptions, score};

use super::quantizer::ColorPalette;

/// Best theme seed in `palette`, or the fallback blue when nothing qualifies
pub fn pick_seed(palette: &ColorPalette) -> u32 {
    let options = ScoreOptions::default();
    score(palette.entries(), options)
        .first()
        .copied()
        .unwrap_or(options.fallback)
}
