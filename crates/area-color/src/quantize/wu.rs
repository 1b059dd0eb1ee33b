//! Wu's greedy variance-minimizing color quantizer.
//!
//! Builds a 3D histogram over a 33x33x33 RGB cube, then repeatedly splits
//! the box with the largest variance along the axis that maximizes the
//! between-box variance.

use std::collections::HashMap;
use std::ops::{Add, Sub};

use crate::utils;

const INDEX_BITS: u32 = 5;
const SIDE_LENGTH: usize = 33;
const TOTAL_SIZE: usize = SIDE_LENGTH * SIDE_LENGTH * SIDE_LENGTH;

#[derive(Debug, Clone, Copy, Default)]
struct Cube {
    r0: usize,
    r1: usize,
    g0: usize,
    g1: usize,
    b0: usize,
    b1: usize,
    vol: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Direction {
    Red,
    Green,
    Blue,
}

pub struct QuantizerWu {
    weights: Vec<i64>,
    moments_r: Vec<i64>,
    moments_g: Vec<i64>,
    moments_b: Vec<i64>,
    moments: Vec<f64>,
    cubes: Vec<Cube>,
}

impl QuantizerWu {
    /// Quantize to at most `max_colors` colors. Translucent pixels are ignored.
    pub fn quantize(pixels: &[u32], max_colors: usize) -> Vec<u32> {
        let mut counts: HashMap<u32, i64> = HashMap::new();
        for &pixel in pixels.iter().filter(|p| utils::is_opaque(**p)) {
            *counts.entry(pixel).or_insert(0) += 1;
        }
        if counts.is_empty() || max_colors == 0 {
            return Vec::new();
        }

        let mut wu = Self {
            weights: vec![0; TOTAL_SIZE],
            moments_r: vec![0; TOTAL_SIZE],
            moments_g: vec![0; TOTAL_SIZE],
            moments_b: vec![0; TOTAL_SIZE],
            moments: vec![0.0; TOTAL_SIZE],
            cubes: vec![Cube::default(); max_colors],
        };
        wu.construct_histogram(&counts);
        wu.create_moments();
        let color_count = wu.create_boxes(max_colors);
        wu.create_result(color_count)
    }

    fn construct_histogram(&mut self, counts: &HashMap<u32, i64>) {
        let bits_to_remove = 8 - INDEX_BITS;
        for (&pixel, &count) in counts {
            let red = utils::red_from_argb(pixel) as i64;
            let green = utils::green_from_argb(pixel) as i64;
            let blue = utils::blue_from_argb(pixel) as i64;
            let index = index_of(
                (red >> bits_to_remove) as usize + 1,
                (green >> bits_to_remove) as usize + 1,
                (blue >> bits_to_remove) as usize + 1,
            );
            self.weights[index] += count;
            self.moments_r[index] += count * red;
            self.moments_g[index] += count * green;
            self.moments_b[index] += count * blue;
            self.moments[index] += (count * (red * red + green * green + blue * blue)) as f64;
        }
    }

    /// Turn the histogram into cumulative moments so any box volume is an
    /// eight-term inclusion-exclusion sum.
    fn create_moments(&mut self) {
        for r in 1..SIDE_LENGTH {
            let mut area = [0i64; SIDE_LENGTH];
            let mut area_r = [0i64; SIDE_LENGTH];
            let mut area_g = [0i64; SIDE_LENGTH];
            let mut area_b = [0i64; SIDE_LENGTH];
            let mut area2 = [0f64; SIDE_LENGTH];
            for g in 1..SIDE_LENGTH {
                let mut line = 0i64;
                let mut line_r = 0i64;
                let mut line_g = 0i64;
                let mut line_b = 0i64;
                let mut line2 = 0f64;
                for b in 1..SIDE_LENGTH {
                    let index = index_of(r, g, b);
                    line += self.weights[index];
                    line_r += self.moments_r[index];
                    line_g += self.moments_g[index];
                    line_b += self.moments_b[index];
                    line2 += self.moments[index];

                    area[b] += line;
                    area_r[b] += line_r;
                    area_g[b] += line_g;
                    area_b[b] += line_b;
                    area2[b] += line2;

                    let previous = index_of(r - 1, g, b);
                    self.weights[index] = self.weights[previous] + area[b];
                    self.moments_r[index] = self.moments_r[previous] + area_r[b];
                    self.moments_g[index] = self.moments_g[previous] + area_g[b];
                    self.moments_b[index] = self.moments_b[previous] + area_b[b];
                    self.moments[index] = self.moments[previous] + area2[b];
                }
            }
        }
    }

    fn create_boxes(&mut self, max_colors: usize) -> usize {
        self.cubes[0] = Cube {
            r1: SIDE_LENGTH - 1,
            g1: SIDE_LENGTH - 1,
            b1: SIDE_LENGTH - 1,
            ..Cube::default()
        };

        let mut volume_variance = vec![0.0f64; max_colors];
        let mut next = 0;
        let mut generated = max_colors;
        let mut i = 1;
        while i < max_colors {
            let (one, two) = (self.cubes[next], self.cubes[i]);
            if let Some((one, two)) = self.cut(one, two) {
                self.cubes[next] = one;
                self.cubes[i] = two;
                volume_variance[next] = if one.vol > 1 { self.variance(&one) } else { 0.0 };
                volume_variance[i] = if two.vol > 1 { self.variance(&two) } else { 0.0 };
            } else {
                volume_variance[next] = 0.0;
                i -= 1;
            }

            next = 0;
            let mut temp = volume_variance[0];
            for (j, variance) in volume_variance.iter().enumerate().take(i + 1).skip(1) {
                if *variance > temp {
                    temp = *variance;
                    next = j;
                }
            }
            if temp <= 0.0 {
                generated = i + 1;
                break;
            }
            i += 1;
        }
        generated
    }

    fn create_result(&self, color_count: usize) -> Vec<u32> {
        self.cubes[..color_count]
            .iter()
            .filter_map(|cube| {
                let weight = volume(cube, &self.weights);
                if weight <= 0 {
                    return None;
                }
                let r = volume(cube, &self.moments_r) / weight;
                let g = volume(cube, &self.moments_g) / weight;
                let b = volume(cube, &self.moments_b) / weight;
                Some(utils::argb_from_rgb(r as u8, g as u8, b as u8))
            })
            .collect()
    }

    fn variance(&self, cube: &Cube) -> f64 {
        let dr = volume(cube, &self.moments_r) as f64;
        let dg = volume(cube, &self.moments_g) as f64;
        let db = volume(cube, &self.moments_b) as f64;
        let xx = volume(cube, &self.moments);
        let hypotenuse = dr * dr + dg * dg + db * db;
        let weight = volume(cube, &self.weights) as f64;
        xx - hypotenuse / weight
    }

    /// Split `one`, writing the upper half into `two`. `None` when `one`
    /// cannot be split any further.
    fn cut(&self, mut one: Cube, mut two: Cube) -> Option<(Cube, Cube)> {
        let whole_r = volume(&one, &self.moments_r);
        let whole_g = volume(&one, &self.moments_g);
        let whole_b = volume(&one, &self.moments_b);
        let whole_w = volume(&one, &self.weights);
        let whole = [whole_r, whole_g, whole_b, whole_w];

        let max_r = self.maximize(&one, Direction::Red, one.r0 + 1, one.r1, whole);
        let max_g = self.maximize(&one, Direction::Green, one.g0 + 1, one.g1, whole);
        let max_b = self.maximize(&one, Direction::Blue, one.b0 + 1, one.b1, whole);

        let direction = if max_r.1 >= max_g.1 && max_r.1 >= max_b.1 {
            max_r.0?;
            Direction::Red
        } else if max_g.1 >= max_r.1 && max_g.1 >= max_b.1 {
            Direction::Green
        } else {
            Direction::Blue
        };

        two.r1 = one.r1;
        two.g1 = one.g1;
        two.b1 = one.b1;

        match direction {
            Direction::Red => {
                one.r1 = max_r.0?;
                two.r0 = one.r1;
                two.g0 = one.g0;
                two.b0 = one.b0;
            }
            Direction::Green => {
                one.g1 = max_g.0?;
                two.r0 = one.r0;
                two.g0 = one.g1;
                two.b0 = one.b0;
            }
            Direction::Blue => {
                one.b1 = max_b.0?;
                two.r0 = one.r0;
                two.g0 = one.g0;
                two.b0 = one.b1;
            }
        }

        one.vol = (one.r1 - one.r0) * (one.g1 - one.g0) * (one.b1 - one.b0);
        two.vol = (two.r1 - two.r0) * (two.g1 - two.g0) * (two.b1 - two.b0);
        Some((one, two))
    }

    /// Best cut position along `direction` in `first..last`, with its score.
    fn maximize(
        &self,
        cube: &Cube,
        direction: Direction,
        first: usize,
        last: usize,
        whole: [i64; 4],
    ) -> (Option<usize>, f64) {
        let bottom_r = bottom(cube, direction, &self.moments_r);
        let bottom_g = bottom(cube, direction, &self.moments_g);
        let bottom_b = bottom(cube, direction, &self.moments_b);
        let bottom_w = bottom(cube, direction, &self.weights);

        let mut max = 0.0;
        let mut cut = None;
        for i in first..last {
            let mut half_r = bottom_r + top(cube, direction, i, &self.moments_r);
            let mut half_g = bottom_g + top(cube, direction, i, &self.moments_g);
            let mut half_b = bottom_b + top(cube, direction, i, &self.moments_b);
            let mut half_w = bottom_w + top(cube, direction, i, &self.weights);
            if half_w == 0 {
                continue;
            }
            let mut temp = sum_of_squares(half_r, half_g, half_b) / half_w as f64;

            half_r = whole[0] - half_r;
            half_g = whole[1] - half_g;
            half_b = whole[2] - half_b;
            half_w = whole[3] - half_w;
            if half_w == 0 {
                continue;
            }
            temp += sum_of_squares(half_r, half_g, half_b) / half_w as f64;

            if temp > max {
                max = temp;
                cut = Some(i);
            }
        }
        (cut, max)
    }
}

fn sum_of_squares(r: i64, g: i64, b: i64) -> f64 {
    let (r, g, b) = (r as f64, g as f64, b as f64);
    r * r + g * g + b * b
}

fn index_of(r: usize, g: usize, b: usize) -> usize {
    r * SIDE_LENGTH * SIDE_LENGTH + g * SIDE_LENGTH + b
}

fn volume<T>(cube: &Cube, moment: &[T]) -> T
where
    T: Copy + Add<Output = T> + Sub<Output = T>,
{
    moment[index_of(cube.r1, cube.g1, cube.b1)] - moment[index_of(cube.r1, cube.g1, cube.b0)]
        - moment[index_of(cube.r1, cube.g0, cube.b1)]
        + moment[index_of(cube.r1, cube.g0, cube.b0)]
        - moment[index_of(cube.r0, cube.g1, cube.b1)]
        + moment[index_of(cube.r0, cube.g1, cube.b0)]
        + moment[index_of(cube.r0, cube.g0, cube.b1)]
        - moment[index_of(cube.r0, cube.g0, cube.b0)]
}

fn bottom(cube: &Cube, direction: Direction, moment: &[i64]) -> i64 {
    match direction {
        Direction::Red => {
            -moment[index_of(cube.r0, cube.g1, cube.b1)]
                + moment[index_of(cube.r0, cube.g1, cube.b0)]
                + moment[index_of(cube.r0, cube.g0, cube.b1)]
                - moment[index_of(cube.r0, cube.g0, cube.b0)]
        }
        Direction::Green => {
            -moment[index_of(cube.r1, cube.g0, cube.b1)]
                + moment[index_of(cube.r1, cube.g0, cube.b0)]
                + moment[index_of(cube.r0, cube.g0, cube.b1)]
                - moment[index_of(cube.r0, cube.g0, cube.b0)]
        }
        Direction::Blue => {
            -moment[index_of(cube.r1, cube.g1, cube.b0)]
                + moment[index_of(cube.r1, cube.g0, cube.b0)]
                + moment[index_of(cube.r0, cube.g1, cube.b0)]
                - moment[index_of(cube.r0, cube.g0, cube.b0)]
        }
    }
}

fn top(cube: &Cube, direction: Direction, position: usize, moment: &[i64]) -> i64 {
    match direction {
        Direction::Red => {
            moment[index_of(position, cube.g1, cube.b1)] - moment[index_of(position, cube.g1, cube.b0)]
                - moment[index_of(position, cube.g0, cube.b1)]
                + moment[index_of(position, cube.g0, cube.b0)]
        }
        Direction::Green => {
            moment[index_of(cube.r1, position, cube.b1)] - moment[index_of(cube.r1, position, cube.b0)]
                - moment[index_of(cube.r0, position, cube.b1)]
                + moment[index_of(cube.r0, position, cube.b0)]
        }
        Direction::Blue => {
            moment[index_of(cube.r1, cube.g1, position)] - moment[index_of(cube.r1, cube.g0, position)]
                - moment[index_of(cube.r0, cube.g1, position)]
                + moment[index_of(cube.r0, cube.g0, position)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_color() {
        let pixels = vec![0xFF6750A4; 64];
        assert_eq!(QuantizerWu::quantize(&pixels, 128), vec![0xFF6750A4]);
    }

    #[test]
    fn test_two_colors_are_separated() {
        let mut pixels = vec![0xFF000000; 50];
        pixels.extend(vec![0xFFFFFFFF; 50]);
        let mut result = QuantizerWu::quantize(&pixels, 128);
        result.sort_unstable();
        assert_eq!(result, vec![0xFF000000, 0xFFFFFFFF]);
    }

    #[test]
    fn test_respects_max_colors() {
        let pixels: Vec<u32> = (0..4096u32)
            .map(|i| utils::argb_from_rgb((i % 256) as u8, (i / 16 % 256) as u8, (i * 7 % 256) as u8))
            .collect();
        let result = QuantizerWu::quantize(&pixels, 16);
        assert!(!result.is_empty());
        assert!(result.len() <= 16);
    }

    #[test]
    fn test_translucent_pixels_are_ignored() {
        assert!(QuantizerWu::quantize(&[0x80FF0000, 0x00000000], 8).is_empty());
    }
}
