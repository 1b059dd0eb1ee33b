//! Tonal palettes: one hue and chroma, every tone.

use crate::hct::Hct;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TonalPalette {
    hue: f64,
    chroma: f64,
    key_color: Hct,
}

impl TonalPalette {
    pub fn from_argb(argb: u32) -> Self {
        Self::from_hct(Hct::from_argb(argb))
    }

    pub fn from_hct(hct: Hct) -> Self {
        Self {
            hue: hct.hue(),
            chroma: hct.chroma(),
            key_color: hct,
        }
    }

    pub fn from_hue_and_chroma(hue: f64, chroma: f64) -> Self {
        Self {
            hue,
            chroma,
            key_color: key_color(hue, chroma),
        }
    }

    pub fn hue(&self) -> f64 {
        self.hue
    }

    pub fn chroma(&self) -> f64 {
        self.chroma
    }

    pub fn key_color(&self) -> Hct {
        self.key_color
    }

    /// ARGB of this palette at `tone` (0-100).
    pub fn tone(&self, tone: f64) -> u32 {
        self.hct(tone).to_argb()
    }

    pub fn hct(&self, tone: f64) -> Hct {
        Hct::new(self.hue, self.chroma, tone)
    }
}

/// Color of the palette whose achievable chroma is closest to the requested
/// one, searching outwards from tone 50.
fn key_color(hue: f64, chroma: f64) -> Hct {
    const START_TONE: f64 = 50.0;
    let mut best = Hct::new(hue, chroma, START_TONE);
    let mut best_delta = (best.chroma() - chroma).abs();
    for step in 1..50 {
        if chroma.round() == best.chroma().round() {
            return best;
        }
        let delta = step as f64;
        for tone in [START_TONE + delta, START_TONE - delta] {
            let candidate = Hct::new(hue, chroma, tone);
            let candidate_delta = (candidate.chroma() - chroma).abs();
            if candidate_delta < best_delta {
                best_delta = candidate_delta;
                best = candidate;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils;

    #[test]
    fn test_tone_extremes() {
        let palette = TonalPalette::from_hue_and_chroma(270.0, 36.0);
        assert_eq!(palette.tone(0.0), 0xFF000000);
        assert_eq!(palette.tone(100.0), 0xFFFFFFFF);
    }

    #[test]
    fn test_tones_are_monotonic() {
        let palette = TonalPalette::from_argb(0xFF6750A4);
        let mut last = -1.0;
        for tone in [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 95.0, 99.0, 100.0] {
            let lstar = utils::lstar_from_argb(palette.tone(tone));
            assert!(lstar > last, "tone {tone} not lighter than previous");
            last = lstar;
        }
    }

    #[test]
    fn test_key_color_reaches_requested_chroma() {
        let key = TonalPalette::from_hue_and_chroma(50.0, 16.0).key_color();
        assert!((key.chroma() - 16.0).abs() < 1.0);
        assert!((key.hue() - 50.0).abs() < 2.0);
    }
}
