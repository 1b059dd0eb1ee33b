//! Wu for a fast, good initial guess, refined by WSMeans.

use super::{QuantizerResult, QuantizerWsmeans, QuantizerWu};

pub struct QuantizerCelebi;

impl QuantizerCelebi {
    pub fn quantize(pixels: &[u32], max_colors: usize) -> QuantizerResult {
        let wu = QuantizerWu::quantize(pixels, max_colors);
        QuantizerResult::new(QuantizerWsmeans::quantize(pixels, &wu, max_colors))
    }
}
