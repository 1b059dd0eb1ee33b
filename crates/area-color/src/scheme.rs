//! Scheme variants and the palettes they derive from a source color.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dislike;
use crate::dynamic_color::Palette;
use crate::hct::Hct;
use crate::palette::TonalPalette;
use crate::roles;
use crate::temperature::TemperatureCache;
use crate::utils;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scheme variant: {0:?}")]
pub struct UnknownVariant(pub String);

/// How a source color is spread across the five tonal palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Variant {
    #[default]
    TonalSpot,
    Expressive,
    Neutral,
    Vibrant,
    Fidelity,
    Monochrome,
    Content,
    Rainbow,
    FruitSalad,
}

impl Variant {
    pub const ALL: [Variant; 9] = [
        Variant::TonalSpot,
        Variant::Expressive,
        Variant::Neutral,
        Variant::Vibrant,
        Variant::Fidelity,
        Variant::Monochrome,
        Variant::Content,
        Variant::Rainbow,
        Variant::FruitSalad,
    ];

    /// Name shown to users and stored in settings, e.g. "Tonal Spot".
    pub fn display_name(self) -> &'static str {
        match self {
            Variant::TonalSpot => "Tonal Spot",
            Variant::Expressive => "Expressive",
            Variant::Neutral => "Neutral",
            Variant::Vibrant => "Vibrant",
            Variant::Fidelity => "Fidelity",
            Variant::Monochrome => "Monochrome",
            Variant::Content => "Content",
            Variant::Rainbow => "Rainbow",
            Variant::FruitSalad => "Fruit Salad",
        }
    }

    /// `-t` argument for matugen. It has no vibrant scheme; tonal spot stands in.
    pub fn matugen_type(self) -> &'static str {
        match self {
            Variant::TonalSpot | Variant::Vibrant => "scheme-tonal-spot",
            Variant::Expressive => "scheme-expressive",
            Variant::Neutral => "scheme-neutral",
            Variant::Fidelity => "scheme-fidelity",
            Variant::Monochrome => "scheme-monochrome",
            Variant::Content => "scheme-content",
            Variant::Rainbow => "scheme-rainbow",
            Variant::FruitSalad => "scheme-fruit-salad",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Variant {
    type Err = UnknownVariant;

    /// Accepts "Tonal Spot", "tonal-spot", "tonal_spot" and "scheme-tonal-spot",
    /// in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let key = folded.strip_prefix("scheme").unwrap_or(&folded);
        Variant::ALL
            .into_iter()
            .find(|variant| variant.display_name().replace(' ', "").eq_ignore_ascii_case(key))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl TryFrom<String> for Variant {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Variant> for String {
    fn from(variant: Variant) -> Self {
        variant.display_name().to_string()
    }
}

const HUE_BREAKPOINTS: [f64; 9] = [0.0, 21.0, 51.0, 121.0, 151.0, 191.0, 271.0, 321.0, 360.0];
const EXPRESSIVE_SECONDARY_ROTATIONS: [f64; 9] = [45.0, 95.0, 45.0, 20.0, 45.0, 90.0, 45.0, 45.0, 45.0];
const EXPRESSIVE_TERTIARY_ROTATIONS: [f64; 9] = [120.0, 120.0, 20.0, 45.0, 20.0, 15.0, 20.0, 120.0, 120.0];
const VIBRANT_SECONDARY_ROTATIONS: [f64; 9] = [18.0, 15.0, 10.0, 12.0, 15.0, 18.0, 15.0, 12.0, 12.0];
const VIBRANT_TERTIARY_ROTATIONS: [f64; 9] = [35.0, 30.0, 20.0, 25.0, 30.0, 35.0, 30.0, 25.0, 25.0];

/// A source color expanded into palettes for one variant, brightness and
/// contrast level. Resolve roles against it with [`DynamicScheme::resolve_all`].
#[derive(Debug, Clone)]
pub struct DynamicScheme {
    pub source_color_hct: Hct,
    pub variant: Variant,
    pub is_dark: bool,
    /// -1.0 (reduced) to 1.0 (high); 0.0 is standard.
    pub contrast_level: f64,
    pub primary_palette: TonalPalette,
    pub secondary_palette: TonalPalette,
    pub tertiary_palette: TonalPalette,
    pub neutral_palette: TonalPalette,
    pub neutral_variant_palette: TonalPalette,
    pub error_palette: TonalPalette,
}

impl DynamicScheme {
    pub fn new(source_color_hct: Hct, variant: Variant, is_dark: bool, contrast_level: f64) -> Self {
        let hue = source_color_hct.hue();
        let chroma = source_color_hct.chroma();
        let palette = TonalPalette::from_hue_and_chroma;

        let (primary, secondary, tertiary, neutral, neutral_variant) = match variant {
            Variant::TonalSpot => (
                palette(hue, 36.0),
                palette(hue, 16.0),
                palette(utils::sanitize_degrees(hue + 60.0), 24.0),
                palette(hue, 6.0),
                palette(hue, 8.0),
            ),
            Variant::Expressive => (
                palette(utils::sanitize_degrees(hue + 240.0), 40.0),
                palette(rotated_hue(hue, &EXPRESSIVE_SECONDARY_ROTATIONS), 24.0),
                palette(rotated_hue(hue, &EXPRESSIVE_TERTIARY_ROTATIONS), 32.0),
                palette(utils::sanitize_degrees(hue + 15.0), 8.0),
                palette(utils::sanitize_degrees(hue + 15.0), 12.0),
            ),
            Variant::Neutral => (
                palette(hue, 12.0),
                palette(hue, 8.0),
                palette(hue, 16.0),
                palette(hue, 2.0),
                palette(hue, 2.0),
            ),
            Variant::Vibrant => (
                palette(hue, 200.0),
                palette(rotated_hue(hue, &VIBRANT_SECONDARY_ROTATIONS), 24.0),
                palette(rotated_hue(hue, &VIBRANT_TERTIARY_ROTATIONS), 32.0),
                palette(hue, 10.0),
                palette(hue, 12.0),
            ),
            Variant::Monochrome => (
                palette(hue, 0.0),
                palette(hue, 0.0),
                palette(hue, 0.0),
                palette(hue, 0.0),
                palette(hue, 0.0),
            ),
            Variant::Fidelity | Variant::Content => {
                let temperatures = TemperatureCache::new(source_color_hct);
                let tertiary = if variant == Variant::Fidelity {
                    temperatures.complement()
                } else {
                    temperatures.analogous(3, 6)[2]
                };
                (
                    palette(hue, chroma),
                    palette(hue, (chroma - 32.0).max(chroma * 0.5)),
                    TonalPalette::from_hct(dislike::fix_if_disliked(tertiary)),
                    palette(hue, chroma / 8.0),
                    palette(hue, chroma / 8.0 + 4.0),
                )
            }
            Variant::Rainbow => (
                palette(hue, 48.0),
                palette(hue, 16.0),
                palette(utils::sanitize_degrees(hue + 60.0), 24.0),
                palette(hue, 0.0),
                palette(hue, 0.0),
            ),
            Variant::FruitSalad => (
                palette(utils::sanitize_degrees(hue - 50.0), 48.0),
                palette(utils::sanitize_degrees(hue - 50.0), 36.0),
                palette(hue, 36.0),
                palette(hue, 10.0),
                palette(hue, 16.0),
            ),
        };

        Self {
            source_color_hct,
            variant,
            is_dark,
            contrast_level,
            primary_palette: primary,
            secondary_palette: secondary,
            tertiary_palette: tertiary,
            neutral_palette: neutral,
            neutral_variant_palette: neutral_variant,
            error_palette: palette(25.0, 84.0),
        }
    }

    pub fn from_argb(seed: u32, variant: Variant, is_dark: bool) -> Self {
        Self::new(Hct::from_argb(seed), variant, is_dark, 0.0)
    }

    pub fn palette(&self, palette: Palette) -> &TonalPalette {
        match palette {
            Palette::Primary => &self.primary_palette,
            Palette::Secondary => &self.secondary_palette,
            Palette::Tertiary => &self.tertiary_palette,
            Palette::Neutral => &self.neutral_palette,
            Palette::NeutralVariant => &self.neutral_variant_palette,
            Palette::Error => &self.error_palette,
        }
    }

    /// ARGB of the named role, or `None` for an unknown name.
    pub fn resolve(&self, role: &str) -> Option<u32> {
        roles::by_name(role).map(|color| color.get_argb(self))
    }

    /// Every role in [`roles::ALL`] order, paired with its ARGB value.
    pub fn resolve_all(&self) -> Vec<(&'static str, u32)> {
        roles::all().map(|color| (color.name(), color.get_argb(self))).collect()
    }
}

/// Rotate `hue` by the amount assigned to the breakpoint interval it falls in.
fn rotated_hue(hue: f64, rotations: &[f64; 9]) -> f64 {
    for i in 0..HUE_BREAKPOINTS.len() - 1 {
        if HUE_BREAKPOINTS[i] < hue && hue < HUE_BREAKPOINTS[i + 1] {
            return utils::sanitize_degrees(hue + rotations[i]);
        }
    }
    hue
}
