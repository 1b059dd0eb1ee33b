//! The Material 3 color roles, resolved against a [`DynamicScheme`].
//!
//! Names are the camelCase identifiers used by theme templates
//! (`{{ surfaceContainerHigh }}`).

use crate::dislike;
use crate::dynamic_color::{foreground_tone, ContrastCurve, DynamicColor, Palette, TonePolarity, ToneDeltaPair};
use crate::hct::Hct;
use crate::scheme::{DynamicScheme, Variant};

/// Every role, in template order.
pub const ALL: [&str; 54] = [
    "primaryPaletteKeyColor",
    "secondaryPaletteKeyColor",
    "tertiaryPaletteKeyColor",
    "neutralPaletteKeyColor",
    "neutralVariantPaletteKeyColor",
    "background",
    "onBackground",
    "surface",
    "surfaceDim",
    "surfaceBright",
    "surfaceContainerLowest",
    "surfaceContainerLow",
    "surfaceContainer",
    "surfaceContainerHigh",
    "surfaceContainerHighest",
    "onSurface",
    "surfaceVariant",
    "onSurfaceVariant",
    "inverseSurface",
    "inverseOnSurface",
    "outline",
    "outlineVariant",
    "shadow",
    "scrim",
    "surfaceTint",
    "primary",
    "onPrimary",
    "primaryContainer",
    "onPrimaryContainer",
    "inversePrimary",
    "secondary",
    "onSecondary",
    "secondaryContainer",
    "onSecondaryContainer",
    "tertiary",
    "onTertiary",
    "tertiaryContainer",
    "onTertiaryContainer",
    "error",
    "onError",
    "errorContainer",
    "onErrorContainer",
    "primaryFixed",
    "primaryFixedDim",
    "onPrimaryFixed",
    "onPrimaryFixedVariant",
    "secondaryFixed",
    "secondaryFixedDim",
    "onSecondaryFixed",
    "onSecondaryFixedVariant",
    "tertiaryFixed",
    "tertiaryFixedDim",
    "onTertiaryFixed",
    "onTertiaryFixedVariant",
];

const COLORS: [fn() -> DynamicColor; 54] = [
    primary_palette_key_color,
    secondary_palette_key_color,
    tertiary_palette_key_color,
    neutral_palette_key_color,
    neutral_variant_palette_key_color,
    background,
    on_background,
    surface,
    surface_dim,
    surface_bright,
    surface_container_lowest,
    surface_container_low,
    surface_container,
    surface_container_high,
    surface_container_highest,
    on_surface,
    surface_variant,
    on_surface_variant,
    inverse_surface,
    inverse_on_surface,
    outline,
    outline_variant,
    shadow,
    scrim,
    surface_tint,
    primary,
    on_primary,
    primary_container,
    on_primary_container,
    inverse_primary,
    secondary,
    on_secondary,
    secondary_container,
    on_secondary_container,
    tertiary,
    on_tertiary,
    tertiary_container,
    on_tertiary_container,
    error,
    on_error,
    error_container,
    on_error_container,
    primary_fixed,
    primary_fixed_dim,
    on_primary_fixed,
    on_primary_fixed_variant,
    secondary_fixed,
    secondary_fixed_dim,
    on_secondary_fixed,
    on_secondary_fixed_variant,
    tertiary_fixed,
    tertiary_fixed_dim,
    on_tertiary_fixed,
    on_tertiary_fixed_variant,
];

/// All roles as dynamic colors, in the same order as [`ALL`].
pub fn all() -> impl Iterator<Item = DynamicColor> {
    COLORS.iter().map(|color| color())
}

pub fn by_name(name: &str) -> Option<DynamicColor> {
    ALL.iter().position(|role| *role == name).map(|i| COLORS[i]())
}

const TEXT: ContrastCurve = ContrastCurve::new(4.5, 7.0, 11.0, 21.0);
const ACCENT: ContrastCurve = ContrastCurve::new(3.0, 4.5, 7.0, 7.0);
const CONTAINER: ContrastCurve = ContrastCurve::new(1.0, 1.0, 3.0, 4.5);
const SUBTLE_TEXT: ContrastCurve = ContrastCurve::new(3.0, 4.5, 7.0, 11.0);

fn is_fidelity(s: &DynamicScheme) -> bool {
    matches!(s.variant, Variant::Fidelity | Variant::Content)
}

fn is_monochrome(s: &DynamicScheme) -> bool {
    s.variant == Variant::Monochrome
}

fn dark_light(s: &DynamicScheme, dark: f64, light: f64) -> f64 {
    if s.is_dark {
        dark
    } else {
        light
    }
}

/// Closest tone to `tone` at which the palette reaches `chroma`, walking
/// darker or lighter until chroma stops improving.
fn find_desired_chroma_by_tone(hue: f64, chroma: f64, tone: f64, by_decreasing_tone: bool) -> f64 {
    let mut answer = tone;
    let mut closest = Hct::new(hue, chroma, tone);
    if closest.chroma() < chroma {
        let mut chroma_peak = closest.chroma();
        while closest.chroma() < chroma {
            answer += if by_decreasing_tone { -1.0 } else { 1.0 };
            let candidate = Hct::new(hue, chroma, answer);
            if chroma_peak > candidate.chroma()
                || (candidate.chroma() - chroma).abs() < 0.4
                || !(0.0..=100.0).contains(&answer)
            {
                break;
            }
            if (candidate.chroma() - chroma).abs() < (closest.chroma() - chroma).abs() {
                closest = candidate;
            }
            chroma_peak = chroma_peak.max(candidate.chroma());
        }
    }
    answer
}

fn highest_surface_for(s: &DynamicScheme) -> DynamicColor {
    if s.is_dark {
        surface_bright()
    } else {
        surface_dim()
    }
}

/// Background of accents: bright in dark schemes, dim in light ones.
///
/// Background functions take no scheme, so this resolves lazily through a
/// dedicated color whose tone follows the scheme.
fn highest_surface() -> DynamicColor {
    DynamicColor::from_palette("highestSurface", Palette::Neutral, |s| {
        highest_surface_for(s).get_tone(s)
    })
    .as_background()
}

pub fn primary_palette_key_color() -> DynamicColor {
    DynamicColor::from_palette("primaryPaletteKeyColor", Palette::Primary, |s| {
        s.primary_palette.key_color().tone()
    })
}

pub fn secondary_palette_key_color() -> DynamicColor {
    DynamicColor::from_palette("secondaryPaletteKeyColor", Palette::Secondary, |s| {
        s.secondary_palette.key_color().tone()
    })
}

pub fn tertiary_palette_key_color() -> DynamicColor {
    DynamicColor::from_palette("tertiaryPaletteKeyColor", Palette::Tertiary, |s| {
        s.tertiary_palette.key_color().tone()
    })
}

pub fn neutral_palette_key_color() -> DynamicColor {
    DynamicColor::from_palette("neutralPaletteKeyColor", Palette::Neutral, |s| {
        s.neutral_palette.key_color().tone()
    })
}

pub fn neutral_variant_palette_key_color() -> DynamicColor {
    DynamicColor::from_palette("neutralVariantPaletteKeyColor", Palette::NeutralVariant, |s| {
        s.neutral_variant_palette.key_color().tone()
    })
}

pub fn background() -> DynamicColor {
    DynamicColor::from_palette("background", Palette::Neutral, |s| dark_light(s, 6.0, 98.0)).as_background()
}

pub fn on_background() -> DynamicColor {
    DynamicColor::from_palette("onBackground", Palette::Neutral, |s| dark_light(s, 90.0, 10.0))
        .on(background, ContrastCurve::new(3.0, 3.0, 4.5, 7.0))
}

pub fn surface() -> DynamicColor {
    DynamicColor::from_palette("surface", Palette::Neutral, |s| dark_light(s, 6.0, 98.0)).as_background()
}

pub fn surface_dim() -> DynamicColor {
    DynamicColor::from_palette("surfaceDim", Palette::Neutral, |s| {
        dark_light(s, 6.0, ContrastCurve::new(87.0, 87.0, 80.0, 75.0).get(s.contrast_level))
    })
    .as_background()
}

pub fn surface_bright() -> DynamicColor {
    DynamicColor::from_palette("surfaceBright", Palette::Neutral, |s| {
        dark_light(s, ContrastCurve::new(24.0, 24.0, 29.0, 34.0).get(s.contrast_level), 98.0)
    })
    .as_background()
}

pub fn surface_container_lowest() -> DynamicColor {
    DynamicColor::from_palette("surfaceContainerLowest", Palette::Neutral, |s| {
        dark_light(s, ContrastCurve::new(4.0, 4.0, 2.0, 0.0).get(s.contrast_level), 100.0)
    })
    .as_background()
}

pub fn surface_container_low() -> DynamicColor {
    DynamicColor::from_palette("surfaceContainerLow", Palette::Neutral, |s| {
        let curve = if s.is_dark {
            ContrastCurve::new(10.0, 10.0, 11.0, 12.0)
        } else {
            ContrastCurve::new(96.0, 96.0, 96.0, 95.0)
        };
        curve.get(s.contrast_level)
    })
    .as_background()
}

pub fn surface_container() -> DynamicColor {
    DynamicColor::from_palette("surfaceContainer", Palette::Neutral, |s| {
        let curve = if s.is_dark {
            ContrastCurve::new(12.0, 12.0, 16.0, 20.0)
        } else {
            ContrastCurve::new(94.0, 94.0, 92.0, 90.0)
        };
        curve.get(s.contrast_level)
    })
    .as_background()
}

pub fn surface_container_high() -> DynamicColor {
    DynamicColor::from_palette("surfaceContainerHigh", Palette::Neutral, |s| {
        let curve = if s.is_dark {
            ContrastCurve::new(17.0, 17.0, 21.0, 25.0)
        } else {
            ContrastCurve::new(92.0, 92.0, 88.0, 85.0)
        };
        curve.get(s.contrast_level)
    })
    .as_background()
}

pub fn surface_container_highest() -> DynamicColor {
    DynamicColor::from_palette("surfaceContainerHighest", Palette::Neutral, |s| {
        let curve = if s.is_dark {
            ContrastCurve::new(22.0, 22.0, 26.0, 30.0)
        } else {
            ContrastCurve::new(90.0, 90.0, 84.0, 80.0)
        };
        curve.get(s.contrast_level)
    })
    .as_background()
}

pub fn on_surface() -> DynamicColor {
    DynamicColor::from_palette("onSurface", Palette::Neutral, |s| dark_light(s, 90.0, 10.0))
        .on(highest_surface, TEXT)
}

pub fn surface_variant() -> DynamicColor {
    DynamicColor::from_palette("surfaceVariant", Palette::NeutralVariant, |s| dark_light(s, 30.0, 90.0))
        .as_background()
}

pub fn on_surface_variant() -> DynamicColor {
    DynamicColor::from_palette("onSurfaceVariant", Palette::NeutralVariant, |s| dark_light(s, 80.0, 30.0))
        .on(highest_surface, SUBTLE_TEXT)
}

pub fn inverse_surface() -> DynamicColor {
    DynamicColor::from_palette("inverseSurface", Palette::Neutral, |s| dark_light(s, 90.0, 20.0))
}

pub fn inverse_on_surface() -> DynamicColor {
    DynamicColor::from_palette("inverseOnSurface", Palette::Neutral, |s| dark_light(s, 20.0, 95.0))
        .on(inverse_surface, TEXT)
}

pub fn outline() -> DynamicColor {
    DynamicColor::from_palette("outline", Palette::NeutralVariant, |s| dark_light(s, 60.0, 50.0))
        .on(highest_surface, ContrastCurve::new(1.5, 3.0, 4.5, 7.0))
}

pub fn outline_variant() -> DynamicColor {
    DynamicColor::from_palette("outlineVariant", Palette::NeutralVariant, |s| dark_light(s, 30.0, 80.0))
        .on(highest_surface, CONTAINER)
}

pub fn shadow() -> DynamicColor {
    DynamicColor::from_palette("shadow", Palette::Neutral, |_| 0.0)
}

pub fn scrim() -> DynamicColor {
    DynamicColor::from_palette("scrim", Palette::Neutral, |_| 0.0)
}

pub fn surface_tint() -> DynamicColor {
    DynamicColor::from_palette("surfaceTint", Palette::Primary, |s| dark_light(s, 80.0, 40.0)).as_background()
}

fn primary_pair() -> ToneDeltaPair {
    ToneDeltaPair {
        role_a: primary_container(),
        role_b: primary(),
        delta: 10.0,
        polarity: TonePolarity::Nearer,
        stay_together: false,
    }
}

pub fn primary() -> DynamicColor {
    DynamicColor::from_palette("primary", Palette::Primary, |s| {
        if is_monochrome(s) {
            dark_light(s, 100.0, 0.0)
        } else {
            dark_light(s, 80.0, 40.0)
        }
    })
    .as_background()
    .on(highest_surface, ACCENT)
    .with_tone_delta_pair(primary_pair)
}

pub fn on_primary() -> DynamicColor {
    DynamicColor::from_palette("onPrimary", Palette::Primary, |s| {
        if is_monochrome(s) {
            dark_light(s, 10.0, 90.0)
        } else {
            dark_light(s, 20.0, 100.0)
        }
    })
    .on(primary, TEXT)
}

pub fn primary_container() -> DynamicColor {
    DynamicColor::from_palette("primaryContainer", Palette::Primary, |s| {
        if is_fidelity(s) {
            s.source_color_hct.tone()
        } else if is_monochrome(s) {
            dark_light(s, 85.0, 25.0)
        } else {
            dark_light(s, 30.0, 90.0)
        }
    })
    .as_background()
    .on(highest_surface, CONTAINER)
    .with_tone_delta_pair(primary_pair)
}

pub fn on_primary_container() -> DynamicColor {
    DynamicColor::from_palette("onPrimaryContainer", Palette::Primary, |s| {
        if is_fidelity(s) {
            foreground_tone(primary_container().get_tone(s), 4.5)
        } else if is_monochrome(s) {
            dark_light(s, 0.0, 100.0)
        } else {
            dark_light(s, 90.0, 10.0)
        }
    })
    .on(primary_container, TEXT)
}

pub fn inverse_primary() -> DynamicColor {
    DynamicColor::from_palette("inversePrimary", Palette::Primary, |s| dark_light(s, 40.0, 80.0))
        .on(inverse_surface, ACCENT)
}

fn secondary_pair() -> ToneDeltaPair {
    ToneDeltaPair {
        role_a: secondary_container(),
        role_b: secondary(),
        delta: 10.0,
        polarity: TonePolarity::Nearer,
        stay_together: false,
    }
}

pub fn secondary() -> DynamicColor {
    DynamicColor::from_palette("secondary", Palette::Secondary, |s| dark_light(s, 80.0, 40.0))
        .as_background()
        .on(highest_surface, ACCENT)
        .with_tone_delta_pair(secondary_pair)
}

pub fn on_secondary() -> DynamicColor {
    DynamicColor::from_palette("onSecondary", Palette::Secondary, |s| {
        if is_monochrome(s) {
            dark_light(s, 10.0, 100.0)
        } else {
            dark_light(s, 20.0, 100.0)
        }
    })
    .on(secondary, TEXT)
}

pub fn secondary_container() -> DynamicColor {
    DynamicColor::from_palette("secondaryContainer", Palette::Secondary, |s| {
        let initial_tone = dark_light(s, 30.0, 90.0);
        if is_monochrome(s) {
            dark_light(s, 30.0, 85.0)
        } else if !is_fidelity(s) {
            initial_tone
        } else {
            find_desired_chroma_by_tone(
                s.secondary_palette.hue(),
                s.secondary_palette.chroma(),
                initial_tone,
                !s.is_dark,
            )
        }
    })
    .as_background()
    .on(highest_surface, CONTAINER)
    .with_tone_delta_pair(secondary_pair)
}

pub fn on_secondary_container() -> DynamicColor {
    DynamicColor::from_palette("onSecondaryContainer", Palette::Secondary, |s| {
        if is_fidelity(s) {
            foreground_tone(secondary_container().get_tone(s), 4.5)
        } else {
            dark_light(s, 90.0, 10.0)
        }
    })
    .on(secondary_container, TEXT)
}

fn tertiary_pair() -> ToneDeltaPair {
    ToneDeltaPair {
        role_a: tertiary_container(),
        role_b: tertiary(),
        delta: 10.0,
        polarity: TonePolarity::Nearer,
        stay_together: false,
    }
}

pub fn tertiary() -> DynamicColor {
    DynamicColor::from_palette("tertiary", Palette::Tertiary, |s| {
        if is_monochrome(s) {
            dark_light(s, 90.0, 25.0)
        } else {
            dark_light(s, 80.0, 40.0)
        }
    })
    .as_background()
    .on(highest_surface, ACCENT)
    .with_tone_delta_pair(tertiary_pair)
}

pub fn on_tertiary() -> DynamicColor {
    DynamicColor::from_palette("onTertiary", Palette::Tertiary, |s| {
        if is_monochrome(s) {
            dark_light(s, 10.0, 90.0)
        } else {
            dark_light(s, 20.0, 100.0)
        }
    })
    .on(tertiary, TEXT)
}

pub fn tertiary_container() -> DynamicColor {
    DynamicColor::from_palette("tertiaryContainer", Palette::Tertiary, |s| {
        if is_monochrome(s) {
            dark_light(s, 60.0, 49.0)
        } else if !is_fidelity(s) {
            dark_light(s, 30.0, 90.0)
        } else {
            let proposed = s.tertiary_palette.hct(s.source_color_hct.tone());
            dislike::fix_if_disliked(proposed).tone()
        }
    })
    .as_background()
    .on(highest_surface, CONTAINER)
    .with_tone_delta_pair(tertiary_pair)
}

pub fn on_tertiary_container() -> DynamicColor {
    DynamicColor::from_palette("onTertiaryContainer", Palette::Tertiary, |s| {
        if is_monochrome(s) {
            dark_light(s, 0.0, 100.0)
        } else if !is_fidelity(s) {
            dark_light(s, 90.0, 10.0)
        } else {
            foreground_tone(tertiary_container().get_tone(s), 4.5)
        }
    })
    .on(tertiary_container, TEXT)
}

fn error_pair() -> ToneDeltaPair {
    ToneDeltaPair {
        role_a: error_container(),
        role_b: error(),
        delta: 10.0,
        polarity: TonePolarity::Nearer,
        stay_together: false,
    }
}

pub fn error() -> DynamicColor {
    DynamicColor::from_palette("error", Palette::Error, |s| dark_light(s, 80.0, 40.0))
        .as_background()
        .on(highest_surface, ACCENT)
        .with_tone_delta_pair(error_pair)
}

pub fn on_error() -> DynamicColor {
    DynamicColor::from_palette("onError", Palette::Error, |s| dark_light(s, 20.0, 100.0)).on(error, TEXT)
}

pub fn error_container() -> DynamicColor {
    DynamicColor::from_palette("errorContainer", Palette::Error, |s| dark_light(s, 30.0, 90.0))
        .as_background()
        .on(highest_surface, CONTAINER)
        .with_tone_delta_pair(error_pair)
}

pub fn on_error_container() -> DynamicColor {
    DynamicColor::from_palette("onErrorContainer", Palette::Error, |s| dark_light(s, 90.0, 10.0))
        .on(error_container, TEXT)
}

fn primary_fixed_pair() -> ToneDeltaPair {
    ToneDeltaPair {
        role_a: primary_fixed(),
        role_b: primary_fixed_dim(),
        delta: 10.0,
        polarity: TonePolarity::Lighter,
        stay_together: true,
    }
}

pub fn primary_fixed() -> DynamicColor {
    DynamicColor::from_palette("primaryFixed", Palette::Primary, |s| {
        if is_monochrome(s) {
            40.0
        } else {
            90.0
        }
    })
    .as_background()
    .on(highest_surface, CONTAINER)
    .with_tone_delta_pair(primary_fixed_pair)
}

pub fn primary_fixed_dim() -> DynamicColor {
    DynamicColor::from_palette("primaryFixedDim", Palette::Primary, |s| {
        if is_monochrome(s) {
            30.0
        } else {
            80.0
        }
    })
    .as_background()
    .on(highest_surface, CONTAINER)
    .with_tone_delta_pair(primary_fixed_pair)
}

pub fn on_primary_fixed() -> DynamicColor {
    DynamicColor::from_palette("onPrimaryFixed", Palette::Primary, |s| {
        if is_monochrome(s) {
            100.0
        } else {
            10.0
        }
    })
    .on(primary_fixed_dim, TEXT)
    .with_second_background(primary_fixed)
}

pub fn on_primary_fixed_variant() -> DynamicColor {
    DynamicColor::from_palette("onPrimaryFixedVariant", Palette::Primary, |s| {
        if is_monochrome(s) {
            90.0
        } else {
            30.0
        }
    })
    .on(primary_fixed_dim, SUBTLE_TEXT)
    .with_second_background(primary_fixed)
}

fn secondary_fixed_pair() -> ToneDeltaPair {
    ToneDeltaPair {
        role_a: secondary_fixed(),
        role_b: secondary_fixed_dim(),
        delta: 10.0,
        polarity: TonePolarity::Lighter,
        stay_together: true,
    }
}

pub fn secondary_fixed() -> DynamicColor {
    DynamicColor::from_palette("secondaryFixed", Palette::Secondary, |s| {
        if is_monochrome(s) {
            80.0
        } else {
            90.0
        }
    })
    .as_background()
    .on(highest_surface, CONTAINER)
    .with_tone_delta_pair(secondary_fixed_pair)
}

pub fn secondary_fixed_dim() -> DynamicColor {
    DynamicColor::from_palette("secondaryFixedDim", Palette::Secondary, |s| {
        if is_monochrome(s) {
            70.0
        } else {
            80.0
        }
    })
    .as_background()
    .on(highest_surface, CONTAINER)
    .with_tone_delta_pair(secondary_fixed_pair)
}

pub fn on_secondary_fixed() -> DynamicColor {
    DynamicColor::from_palette("onSecondaryFixed", Palette::Secondary, |_| 10.0)
        .on(secondary_fixed_dim, TEXT)
        .with_second_background(secondary_fixed)
}

pub fn on_secondary_fixed_variant() -> DynamicColor {
    DynamicColor::from_palette("onSecondaryFixedVariant", Palette::Secondary, |s| {
        if is_monochrome(s) {
            25.0
        } else {
            30.0
        }
    })
    .on(secondary_fixed_dim, SUBTLE_TEXT)
    .with_second_background(secondary_fixed)
}

fn tertiary_fixed_pair() -> ToneDeltaPair {
    ToneDeltaPair {
        role_a: tertiary_fixed(),
        role_b: tertiary_fixed_dim(),
        delta: 10.0,
        polarity: TonePolarity::Lighter,
        stay_together: true,
    }
}

pub fn tertiary_fixed() -> DynamicColor {
    DynamicColor::from_palette("tertiaryFixed", Palette::Tertiary, |s| {
        if is_monochrome(s) {
            40.0
        } else {
            90.0
        }
    })
    .as_background()
    .on(highest_surface, CONTAINER)
    .with_tone_delta_pair(tertiary_fixed_pair)
}

pub fn tertiary_fixed_dim() -> DynamicColor {
    DynamicColor::from_palette("tertiaryFixedDim", Palette::Tertiary, |s| {
        if is_monochrome(s) {
            30.0
        } else {
            80.0
        }
    })
    .as_background()
    .on(highest_surface, CONTAINER)
    .with_tone_delta_pair(tertiary_fixed_pair)
}

pub fn on_tertiary_fixed() -> DynamicColor {
    DynamicColor::from_palette("onTertiaryFixed", Palette::Tertiary, |s| {
        if is_monochrome(s) {
            100.0
        } else {
            10.0
        }
    })
    .on(tertiary_fixed_dim, TEXT)
    .with_second_background(tertiary_fixed)
}

pub fn on_tertiary_fixed_variant() -> DynamicColor {
    DynamicColor::from_palette("onTertiaryFixedVariant", Palette::Tertiary, |s| {
        if is_monochrome(s) {
            90.0
        } else {
            30.0
        }
    })
    .on(tertiary_fixed_dim, SUBTLE_TEXT)
    .with_second_background(tertiary_fixed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_colors() {
        for (name, color) in ALL.iter().zip(all()) {
            assert_eq!(*name, color.name());
        }
        assert_eq!(all().count(), ALL.len());
    }

    #[test]
    fn test_names_are_unique() {
        let mut names = ALL.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("onSurface").map(|c| c.name()), Some("onSurface"));
        assert!(by_name("on_surface").is_none());
    }

    #[test]
    fn test_find_desired_chroma_by_tone_stays_in_range() {
        let tone = find_desired_chroma_by_tone(270.0, 120.0, 90.0, true);
        assert!((0.0..=90.0).contains(&tone));
    }
}
