//! WCAG contrast ratios expressed in L* tones.

use crate::utils;

/// Contrast ratio of two relative luminances (0-100).
pub fn ratio_of_ys(y1: f64, y2: f64) -> f64 {
    let lighter = y1.max(y2);
    let darker = y1.min(y2);
    (lighter + 5.0) / (darker + 5.0)
}

pub fn ratio_of_tones(t1: f64, t2: f64) -> f64 {
    let t1 = t1.clamp(0.0, 100.0);
    let t2 = t2.clamp(0.0, 100.0);
    ratio_of_ys(utils::y_from_lstar(t1), utils::y_from_lstar(t2))
}

/// Tone at least `ratio` lighter than `tone`, or `None` if out of range.
pub fn lighter(tone: f64, ratio: f64) -> Option<f64> {
    if !(0.0..=100.0).contains(&tone) {
        return None;
    }
    let dark_y = utils::y_from_lstar(tone);
    let light_y = ratio * (dark_y + 5.0) - 5.0;
    let real_contrast = ratio_of_ys(light_y, dark_y);
    let delta = (real_contrast - ratio).abs();
    if real_contrast < ratio && delta > 0.04 {
        return None;
    }
    // Small offset so that rounding to 8-bit sRGB cannot drop below the ratio.
    let value = utils::lstar_from_y(light_y) + 0.4;
    (0.0..=100.0).contains(&value).then_some(value)
}

/// Tone at least `ratio` darker than `tone`, or `None` if out of range.
pub fn darker(tone: f64, ratio: f64) -> Option<f64> {
    if !(0.0..=100.0).contains(&tone) {
        return None;
    }
    let light_y = utils::y_from_lstar(tone);
    let dark_y = (light_y + 5.0) / ratio - 5.0;
    let real_contrast = ratio_of_ys(light_y, dark_y);
    let delta = (real_contrast - ratio).abs();
    if real_contrast < ratio && delta > 0.04 {
        return None;
    }
    let value = utils::lstar_from_y(dark_y) - 0.4;
    (0.0..=100.0).contains(&value).then_some(value)
}

/// Like [`lighter`] but falls back to white.
pub fn lighter_unsafe(tone: f64, ratio: f64) -> f64 {
    lighter(tone, ratio).unwrap_or(100.0)
}

/// Like [`darker`] but falls back to black.
pub fn darker_unsafe(tone: f64, ratio: f64) -> f64 {
    darker(tone, ratio).unwrap_or(0.0)
}
