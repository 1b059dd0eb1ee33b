//! Ranks quantized colors by how well they would serve as a theme seed.
//!
//! Colors are favored for covering a large share of the image (counting
//! neighboring hues) and for being close to a chroma of 48. Low chroma and
//! rare hues are filtered out.

use crate::hct::Hct;
use crate::utils;

const TARGET_CHROMA: f64 = 48.0;
const WEIGHT_PROPORTION: f64 = 0.7;
const WEIGHT_CHROMA_ABOVE: f64 = 0.3;
const WEIGHT_CHROMA_BELOW: f64 = 0.1;
const CUTOFF_CHROMA: f64 = 5.0;
const CUTOFF_EXCITED_PROPORTION: f64 = 0.01;

/// Google Blue, used when no color in the image qualifies.
pub const FALLBACK_SEED: u32 = 0xFF4285F4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreOptions {
    /// Upper bound on the number of colors returned.
    pub desired: usize,
    pub fallback: u32,
    /// Drop colors that are unsuitable as a theme source.
    pub filter: bool,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            desired: 4,
            fallback: FALLBACK_SEED,
            filter: true,
        }
    }
}

/// Rank `colors` (ARGB, pixel population), best first.
///
/// The result is never empty: when nothing qualifies it holds only
/// `options.fallback`. Ties keep the input order, so a deterministically
/// ordered input gives a deterministic ranking.
pub fn score(colors: &[(u32, u32)], options: ScoreOptions) -> Vec<u32> {
    let mut colors_hct = Vec::with_capacity(colors.len());
    let mut hue_population = [0u64; 360];
    let mut population_sum = 0u64;
    for &(argb, population) in colors {
        let hct = Hct::from_argb(argb);
        let hue = (hct.hue().floor() as usize).min(359);
        hue_population[hue] += population as u64;
        population_sum += population as u64;
        colors_hct.push(hct);
    }
    if population_sum == 0 {
        return vec![options.fallback];
    }

    let mut hue_excited_proportions = [0.0f64; 360];
    for (hue, population) in hue_population.iter().enumerate() {
        let proportion = *population as f64 / population_sum as f64;
        for neighbor in (hue as i32 - 14)..(hue as i32 + 16) {
            hue_excited_proportions[utils::sanitize_degrees_int(neighbor) as usize] += proportion;
        }
    }

    let mut scored: Vec<(Hct, f64)> = Vec::new();
    for hct in colors_hct {
        let hue = utils::sanitize_degrees_int(hct.hue().round() as i32) as usize;
        let proportion = hue_excited_proportions[hue];
        if options.filter && (hct.chroma() < CUTOFF_CHROMA || proportion <= CUTOFF_EXCITED_PROPORTION) {
            continue;
        }

        let proportion_score = proportion * 100.0 * WEIGHT_PROPORTION;
        let chroma_weight = if hct.chroma() < TARGET_CHROMA {
            WEIGHT_CHROMA_BELOW
        } else {
            WEIGHT_CHROMA_ABOVE
        };
        let chroma_score = (hct.chroma() - TARGET_CHROMA) * chroma_weight;
        scored.push((hct, proportion_score + chroma_score));
    }
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    // Demand wide hue separation first, relaxing until enough colors fit.
    let mut chosen: Vec<Hct> = Vec::new();
    for difference in (15..=90).rev() {
        chosen.clear();
        for (hct, _) in &scored {
            let duplicate = chosen
                .iter()
                .any(|c| utils::difference_degrees(hct.hue(), c.hue()) < difference as f64);
            if !duplicate {
                chosen.push(*hct);
            }
            if chosen.len() >= options.desired {
                break;
            }
        }
        if chosen.len() >= options.desired {
            break;
        }
    }

    if chosen.is_empty() {
        return vec![options.fallback];
    }
    chosen.iter().map(Hct::to_argb).collect()
}
