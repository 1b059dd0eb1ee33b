//! Colors whose tone depends on the scheme they are resolved against.
//!
//! A [`DynamicColor`] names a palette and a preferred tone, then adjusts that
//! tone until it meets a contrast requirement against its background (and,
//! for pairs like `primary`/`primaryContainer`, keeps a minimum tone distance
//! from its partner).

use crate::contrast;
use crate::hct::Hct;
use crate::palette::TonalPalette;
use crate::scheme::DynamicScheme;
use crate::utils;

/// Which of the scheme's tonal palettes a color draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Primary,
    Secondary,
    Tertiary,
    Neutral,
    NeutralVariant,
    Error,
}

/// Contrast ratio required at contrast levels -1, 0, 0.5 and 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastCurve {
    low: f64,
    normal: f64,
    medium: f64,
    high: f64,
}

impl ContrastCurve {
    pub const fn new(low: f64, normal: f64, medium: f64, high: f64) -> Self {
        Self { low, normal, medium, high }
    }

    /// Ratio at `level`, interpolated linearly between the anchor points.
    pub fn get(&self, level: f64) -> f64 {
        if level <= -1.0 {
            self.low
        } else if level < 0.0 {
            utils::lerp(self.low, self.normal, level + 1.0)
        } else if level < 0.5 {
            utils::lerp(self.normal, self.medium, level / 0.5)
        } else if level < 1.0 {
            utils::lerp(self.medium, self.high, (level - 0.5) / 0.5)
        } else {
            self.high
        }
    }
}

/// How the two members of a [`ToneDeltaPair`] are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TonePolarity {
    /// `role_a` is darker than `role_b`.
    Darker,
    /// `role_a` is lighter than `role_b`.
    Lighter,
    /// `role_a` is closer to the background than `role_b`.
    Nearer,
    /// `role_a` is further from the background than `role_b`.
    Farther,
}

/// Two colors that must stay at least `delta` tones apart.
#[derive(Debug, Clone, Copy)]
pub struct ToneDeltaPair {
    pub role_a: DynamicColor,
    pub role_b: DynamicColor,
    pub delta: f64,
    pub polarity: TonePolarity,
    /// Move both out of the 50-59 band together rather than splitting them.
    pub stay_together: bool,
}

type ToneFn = fn(&DynamicScheme) -> f64;
type ColorFn = fn() -> DynamicColor;
type PairFn = fn() -> ToneDeltaPair;

#[derive(Clone, Copy)]
pub struct DynamicColor {
    name: &'static str,
    palette: Palette,
    tone: ToneFn,
    is_background: bool,
    background: Option<ColorFn>,
    second_background: Option<ColorFn>,
    contrast_curve: Option<ContrastCurve>,
    tone_delta_pair: Option<PairFn>,
}

impl std::fmt::Debug for DynamicColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicColor")
            .field("name", &self.name)
            .field("palette", &self.palette)
            .field("is_background", &self.is_background)
            .finish_non_exhaustive()
    }
}

impl DynamicColor {
    pub fn from_palette(name: &'static str, palette: Palette, tone: ToneFn) -> Self {
        Self {
            name,
            palette,
            tone,
            is_background: false,
            background: None,
            second_background: None,
            contrast_curve: None,
            tone_delta_pair: None,
        }
    }

    /// Mark this color as one that others are drawn on top of.
    pub fn as_background(mut self) -> Self {
        self.is_background = true;
        self
    }

    pub fn on(mut self, background: ColorFn, curve: ContrastCurve) -> Self {
        self.background = Some(background);
        self.contrast_curve = Some(curve);
        self
    }

    pub fn with_second_background(mut self, background: ColorFn) -> Self {
        self.second_background = Some(background);
        self
    }

    pub fn with_tone_delta_pair(mut self, pair: PairFn) -> Self {
        self.tone_delta_pair = Some(pair);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn get_argb(&self, scheme: &DynamicScheme) -> u32 {
        self.get_hct(scheme).to_argb()
    }

    pub fn get_hct(&self, scheme: &DynamicScheme) -> Hct {
        self.palette_in(scheme).hct(self.get_tone(scheme))
    }

    fn palette_in<'a>(&self, scheme: &'a DynamicScheme) -> &'a TonalPalette {
        scheme.palette(self.palette)
    }

    fn curve_at(&self, scheme: &DynamicScheme) -> f64 {
        self.contrast_curve
            .map(|curve| curve.get(scheme.contrast_level))
            .unwrap_or(1.0)
    }

    /// Final tone of this color in `scheme`, after contrast adjustments.
    pub fn get_tone(&self, scheme: &DynamicScheme) -> f64 {
        let decreasing_contrast = scheme.contrast_level < 0.0;

        if let (Some(pair), Some(background)) = (self.tone_delta_pair, self.background) {
            let pair = pair();
            let bg_tone = background().get_tone(scheme);
            return self.paired_tone(scheme, &pair, bg_tone, decreasing_contrast);
        }

        let mut answer = (self.tone)(scheme);
        let Some(background) = self.background else {
            return answer;
        };

        let bg_tone = background().get_tone(scheme);
        let desired_ratio = self.curve_at(scheme);
        if contrast::ratio_of_tones(bg_tone, answer) < desired_ratio || decreasing_contrast {
            answer = foreground_tone(bg_tone, desired_ratio);
        }

        if self.is_background && (50.0..60.0).contains(&answer) {
            answer = if contrast::ratio_of_tones(49.0, bg_tone) >= desired_ratio {
                49.0
            } else {
                60.0
            };
        }

        let Some(second_background) = self.second_background else {
            return answer;
        };

        // Must contrast with both backgrounds; try going lighter than the
        // lighter one or darker than the darker one.
        let bg_tone_1 = bg_tone;
        let bg_tone_2 = second_background().get_tone(scheme);
        let upper = bg_tone_1.max(bg_tone_2);
        let lower = bg_tone_1.min(bg_tone_2);
        if contrast::ratio_of_tones(upper, answer) >= desired_ratio
            && contrast::ratio_of_tones(lower, answer) >= desired_ratio
        {
            return answer;
        }

        let light_option = contrast::lighter(upper, desired_ratio);
        let dark_option = contrast::darker(lower, desired_ratio);
        if tone_prefers_light_foreground(bg_tone_1) || tone_prefers_light_foreground(bg_tone_2) {
            return light_option.unwrap_or(100.0);
        }
        match (light_option, dark_option) {
            (Some(light), None) => light,
            (None, Some(dark)) => dark,
            (_, dark) => dark.unwrap_or(0.0),
        }
    }

    fn paired_tone(
        &self,
        scheme: &DynamicScheme,
        pair: &ToneDeltaPair,
        bg_tone: f64,
        decreasing_contrast: bool,
    ) -> f64 {
        let a_is_nearer = match pair.polarity {
            TonePolarity::Nearer => true,
            TonePolarity::Farther => false,
            TonePolarity::Lighter => !scheme.is_dark,
            TonePolarity::Darker => scheme.is_dark,
        };
        let (nearer, farther) = if a_is_nearer {
            (pair.role_a, pair.role_b)
        } else {
            (pair.role_b, pair.role_a)
        };
        let am_nearer = self.name == nearer.name;
        let delta = pair.delta;
        let expansion_dir = if scheme.is_dark { 1.0 } else { -1.0 };

        let n_contrast = nearer.curve_at(scheme);
        let f_contrast = farther.curve_at(scheme);

        let n_initial = (nearer.tone)(scheme);
        let mut n_tone = if contrast::ratio_of_tones(bg_tone, n_initial) >= n_contrast {
            n_initial
        } else {
            foreground_tone(bg_tone, n_contrast)
        };
        let f_initial = (farther.tone)(scheme);
        let mut f_tone = if contrast::ratio_of_tones(bg_tone, f_initial) >= f_contrast {
            f_initial
        } else {
            foreground_tone(bg_tone, f_contrast)
        };

        if decreasing_contrast {
            n_tone = foreground_tone(bg_tone, n_contrast);
            f_tone = foreground_tone(bg_tone, f_contrast);
        }

        if (f_tone - n_tone) * expansion_dir < delta {
            f_tone = (n_tone + delta * expansion_dir).clamp(0.0, 100.0);
            if (f_tone - n_tone) * expansion_dir < delta {
                n_tone = (f_tone - delta * expansion_dir).clamp(0.0, 100.0);
            }
        }

        // Tones 50-59 have poor contrast with both black and white text.
        if (50.0..60.0).contains(&n_tone) || (pair.stay_together && (50.0..60.0).contains(&f_tone)) {
            if expansion_dir > 0.0 {
                n_tone = 60.0;
                f_tone = f_tone.max(n_tone + delta * expansion_dir);
            } else {
                n_tone = 49.0;
                f_tone = f_tone.min(n_tone + delta * expansion_dir);
            }
        } else if (50.0..60.0).contains(&f_tone) {
            f_tone = if expansion_dir > 0.0 { 60.0 } else { 49.0 };
        }

        if am_nearer {
            n_tone
        } else {
            f_tone
        }
    }
}

/// Tone for text or icons drawn on `bg_tone` reaching `ratio` if possible.
pub fn foreground_tone(bg_tone: f64, ratio: f64) -> f64 {
    let lighter_tone = contrast::lighter_unsafe(bg_tone, ratio);
    let darker_tone = contrast::darker_unsafe(bg_tone, ratio);
    let lighter_ratio = contrast::ratio_of_tones(lighter_tone, bg_tone);
    let darker_ratio = contrast::ratio_of_tones(darker_tone, bg_tone);

    if tone_prefers_light_foreground(bg_tone) {
        let negligible_difference =
            (lighter_ratio - darker_ratio).abs() < 0.1 && lighter_ratio < ratio && darker_ratio < ratio;
        if lighter_ratio >= ratio || lighter_ratio >= darker_ratio || negligible_difference {
            lighter_tone
        } else {
            darker_tone
        }
    } else if darker_ratio >= ratio || darker_ratio >= lighter_ratio {
        darker_tone
    } else {
        lighter_tone
    }
}

/// Backgrounds below tone 60 read better with light content on top.
pub fn tone_prefers_light_foreground(tone: f64) -> bool {
    tone.round() < 60.0
}

pub fn tone_allows_light_foreground(tone: f64) -> bool {
    tone.round() <= 49.0
}

/// Nudge a tone in the 50-59 band down to 49 so light content stays legible.
pub fn enable_light_foreground(tone: f64) -> f64 {
    if tone_prefers_light_foreground(tone) && !tone_allows_light_foreground(tone) {
        49.0
    } else {
        tone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contrast_curve_interpolates() {
        let curve = ContrastCurve::new(1.0, 3.0, 5.0, 9.0);
        assert_eq!(curve.get(-2.0), 1.0);
        assert_eq!(curve.get(-0.5), 2.0);
        assert_eq!(curve.get(0.0), 3.0);
        assert_eq!(curve.get(0.25), 4.0);
        assert_eq!(curve.get(0.75), 7.0);
        assert_eq!(curve.get(1.0), 9.0);
    }

    #[test]
    fn test_foreground_tone_meets_ratio() {
        for bg in [0.0, 20.0, 45.0, 70.0, 98.0] {
            let fg = foreground_tone(bg, 4.5);
            assert!(contrast::ratio_of_tones(bg, fg) >= 4.5, "bg {bg} fg {fg}");
        }
    }

    #[test]
    fn test_light_foreground_band() {
        assert!(tone_prefers_light_foreground(55.0));
        assert!(!tone_allows_light_foreground(55.0));
        assert_eq!(enable_light_foreground(55.0), 49.0);
        assert_eq!(enable_light_foreground(30.0), 30.0);
        assert_eq!(enable_light_foreground(80.0), 80.0);
    }
}
