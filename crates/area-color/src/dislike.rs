//! Bile-yellow detection.
//!
//! Dark yellow-greens are near-universally disliked; palettes derived from
//! image content steer away from them.

use crate::hct::Hct;

pub fn is_disliked(hct: &Hct) -> bool {
    let hue_passes = (90.0..=111.0).contains(&hct.hue().round());
    let chroma_passes = hct.chroma().round() > 16.0;
    let tone_passes = hct.tone().round() < 65.0;
    hue_passes && chroma_passes && tone_passes
}

/// Lighten a disliked color to tone 70; anything else is returned unchanged.
pub fn fix_if_disliked(hct: Hct) -> Hct {
    if is_disliked(&hct) {
        Hct::new(hct.hue(), hct.chroma(), 70.0)
    } else {
        hct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bile_is_fixed() {
        let bile = Hct::new(100.0, 40.0, 40.0);
        assert!(is_disliked(&bile));
        let fixed = fix_if_disliked(bile);
        assert!(!is_disliked(&fixed));
        assert!((fixed.tone() - 70.0).abs() < 1.0);
    }

    #[test]
    fn test_other_colors_are_kept() {
        let purple = Hct::from_argb(0xFF6750A4);
        assert!(!is_disliked(&purple));
        assert_eq!(fix_if_disliked(purple), purple);
    }
}
