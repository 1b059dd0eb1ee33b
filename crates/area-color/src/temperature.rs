//! Warm/cool ranking of hues around a fixed chroma and tone.
//!
//! Used to pick complements and analogous colors that feel balanced rather
//! than mathematically opposite.

use crate::hct::Hct;
use crate::utils;

pub struct TemperatureCache {
    input: Hct,
    /// 361 entries: hue 0 through 360 inclusive, at the input's chroma and tone.
    by_hue: Vec<Hct>,
    coldest_temp: f64,
    warmest_temp: f64,
    coldest_hue: f64,
    warmest_hue: f64,
}

impl TemperatureCache {
    pub fn new(input: Hct) -> Self {
        let by_hue: Vec<Hct> = (0..=360)
            .map(|hue| Hct::new(hue as f64, input.chroma(), input.tone()))
            .collect();

        let mut coldest = (input, raw_temperature(&input));
        let mut warmest = coldest;
        for hct in &by_hue {
            let temp = raw_temperature(hct);
            if temp < coldest.1 {
                coldest = (*hct, temp);
            }
            if temp > warmest.1 {
                warmest = (*hct, temp);
            }
        }

        Self {
            input,
            by_hue,
            coldest_temp: coldest.1,
            warmest_temp: warmest.1,
            coldest_hue: coldest.0.hue(),
            warmest_hue: warmest.0.hue(),
        }
    }

    pub fn input(&self) -> Hct {
        self.input
    }

    /// Temperature of `hct` relative to the coldest (0.0) and warmest (1.0)
    /// colors at this chroma and tone.
    pub fn relative_temperature(&self, hct: &Hct) -> f64 {
        let range = self.warmest_temp - self.coldest_temp;
        if range == 0.0 {
            return 0.5;
        }
        (raw_temperature(hct) - self.coldest_temp) / range
    }

    /// The color on the opposite side of the temperature scale.
    pub fn complement(&self) -> Hct {
        let range = self.warmest_temp - self.coldest_temp;
        let start_is_cold_to_warm = is_between(self.input.hue(), self.coldest_hue, self.warmest_hue);
        let (start_hue, end_hue) = if start_is_cold_to_warm {
            (self.warmest_hue, self.coldest_hue)
        } else {
            (self.coldest_hue, self.warmest_hue)
        };

        let mut smallest_error = 1000.0;
        let mut answer = self.at_hue(self.input.hue().round());
        let complement_relative_temp = 1.0 - self.relative_temperature(&self.input);

        for addend in 0..=360 {
            let hue = utils::sanitize_degrees(start_hue + addend as f64);
            if !is_between(hue, start_hue, end_hue) {
                continue;
            }
            let candidate = self.at_hue(hue.round());
            let relative_temp = if range == 0.0 {
                0.5
            } else {
                (raw_temperature(&candidate) - self.coldest_temp) / range
            };
            let error = (complement_relative_temp - relative_temp).abs();
            if error < smallest_error {
                smallest_error = error;
                answer = candidate;
            }
        }
        answer
    }

    /// `count` colors spread evenly in temperature, centered on the input.
    ///
    /// The hue circle is split into `divisions` steps of equal temperature
    /// change; the input sits in the middle of the returned list.
    pub fn analogous(&self, count: usize, divisions: usize) -> Vec<Hct> {
        let start_hue = self.input.hue().round() as i32;
        let start_hct = self.at_hue(start_hue as f64);
        let mut last_temp = self.relative_temperature(&start_hct);
        let mut all_colors = vec![start_hct];

        let mut absolute_total_temp_delta = 0.0;
        for i in 0..360 {
            let hct = self.at_hue(utils::sanitize_degrees_int(start_hue + i) as f64);
            let temp = self.relative_temperature(&hct);
            absolute_total_temp_delta += (temp - last_temp).abs();
            last_temp = temp;
        }

        let temp_step = absolute_total_temp_delta / divisions as f64;
        let mut total_temp_delta = 0.0;
        let mut hue_addend = 1;
        last_temp = self.relative_temperature(&start_hct);
        while all_colors.len() < divisions {
            let hct = self.at_hue(utils::sanitize_degrees_int(start_hue + hue_addend) as f64);
            let temp = self.relative_temperature(&hct);
            total_temp_delta += (temp - last_temp).abs();

            let mut desired = all_colors.len() as f64 * temp_step;
            let mut index_satisfied = total_temp_delta >= desired;
            let mut index_addend = 1;
            while index_satisfied && all_colors.len() < divisions {
                all_colors.push(hct);
                desired = (all_colors.len() + index_addend) as f64 * temp_step;
                index_satisfied = total_temp_delta >= desired;
                index_addend += 1;
            }
            last_temp = temp;
            hue_addend += 1;

            if hue_addend > 360 {
                while all_colors.len() < divisions {
                    all_colors.push(hct);
                }
                break;
            }
        }

        let len = all_colors.len() as i64;
        let pick = |offset: i64| all_colors[offset.rem_euclid(len) as usize];

        let ccw_count = (count.saturating_sub(1) / 2) as i64;
        let cw_count = count as i64 - ccw_count - 1;
        let mut answers: Vec<Hct> = (1..=ccw_count).rev().map(|i| pick(-i)).collect();
        answers.push(self.input);
        answers.extend((1..=cw_count).map(pick));
        answers
    }

    fn at_hue(&self, hue: f64) -> Hct {
        let index = (hue as usize).min(self.by_hue.len() - 1);
        self.by_hue[index]
    }
}

/// Temperature on an arbitrary scale, from L*a*b* chroma and hue.
///
/// Roughly: -0.5 for the coldest blues, above 1.0 for saturated oranges.
pub fn raw_temperature(color: &Hct) -> f64 {
    let lab = utils::lab_from_argb(color.to_argb());
    let hue = utils::sanitize_degrees(lab[2].atan2(lab[1]).to_degrees());
    let chroma = lab[1].hypot(lab[2]);
    -0.5 + 0.02 * chroma.powf(1.07) * utils::sanitize_degrees(hue - 50.0).to_radians().cos()
}

fn is_between(angle: f64, a: f64, b: f64) -> bool {
    if a < b {
        a <= angle && angle <= b
    } else {
        a <= angle || angle <= b
    }
}
