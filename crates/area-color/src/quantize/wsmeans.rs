//! Weighted k-means in L*a*b*.
//!
//! Each distinct input color is one point weighted by its pixel count. The
//! cluster-to-cluster distance matrix lets a point skip clusters that cannot
//! be closer than its current one (triangle inequality).

use std::collections::HashMap;

use crate::utils;

const MAX_ITERATIONS: usize = 10;
const MIN_MOVEMENT_DISTANCE: f64 = 3.0;

pub struct QuantizerWsmeans;

impl QuantizerWsmeans {
    /// Cluster `pixels` into at most `max_colors` colors, seeded by
    /// `starting_clusters`. Returns ARGB mapped to pixel population.
    pub fn quantize(pixels: &[u32], starting_clusters: &[u32], max_colors: usize) -> HashMap<u32, u32> {
        let mut point_index: HashMap<u32, usize> = HashMap::new();
        let mut points: Vec<[f64; 3]> = Vec::new();
        let mut counts: Vec<u32> = Vec::new();
        for &pixel in pixels.iter().filter(|p| utils::is_opaque(**p)) {
            match point_index.get(&pixel) {
                Some(&index) => counts[index] += 1,
                None => {
                    point_index.insert(pixel, points.len());
                    points.push(utils::lab_from_argb(pixel));
                    counts.push(1);
                }
            }
        }

        let point_count = points.len();
        let mut cluster_count = max_colors.min(point_count);
        if !starting_clusters.is_empty() {
            cluster_count = cluster_count.min(starting_clusters.len());
        }
        if cluster_count == 0 {
            return HashMap::new();
        }

        let mut clusters: Vec<[f64; 3]> = if starting_clusters.is_empty() {
            // Evenly spaced distinct input colors.
            (0..cluster_count)
                .map(|i| points[i * point_count / cluster_count])
                .collect()
        } else {
            starting_clusters[..cluster_count]
                .iter()
                .map(|argb| utils::lab_from_argb(*argb))
                .collect()
        };

        let mut cluster_indices: Vec<usize> = points
            .iter()
            .map(|point| nearest(point, &clusters))
            .collect();

        let mut distances = vec![vec![0.0f64; cluster_count]; cluster_count];
        let mut pixel_count_sums = vec![0u64; cluster_count];

        for iteration in 0..MAX_ITERATIONS {
            for i in 0..cluster_count {
                for j in (i + 1)..cluster_count {
                    let distance = distance(&clusters[i], &clusters[j]);
                    distances[i][j] = distance;
                    distances[j][i] = distance;
                }
            }

            let mut points_moved = 0;
            for (i, point) in points.iter().enumerate() {
                let previous_index = cluster_indices[i];
                let previous_distance = distance(point, &clusters[previous_index]);
                let mut minimum_distance = previous_distance;
                let mut new_index = None;
                for (j, cluster) in clusters.iter().enumerate() {
                    if distances[previous_index][j] >= 4.0 * previous_distance {
                        continue;
                    }
                    let distance = distance(point, cluster);
                    if distance < minimum_distance {
                        minimum_distance = distance;
                        new_index = Some(j);
                    }
                }
                if let Some(new_index) = new_index {
                    let change = (minimum_distance.sqrt() - previous_distance.sqrt()).abs();
                    if change > MIN_MOVEMENT_DISTANCE {
                        points_moved += 1;
                        cluster_indices[i] = new_index;
                    }
                }
            }

            if points_moved == 0 && iteration != 0 {
                break;
            }

            let mut sums = vec![[0.0f64; 3]; cluster_count];
            pixel_count_sums.iter_mut().for_each(|sum| *sum = 0);
            for (i, point) in points.iter().enumerate() {
                let cluster = cluster_indices[i];
                let count = counts[i] as f64;
                pixel_count_sums[cluster] += counts[i] as u64;
                sums[cluster][0] += point[0] * count;
                sums[cluster][1] += point[1] * count;
                sums[cluster][2] += point[2] * count;
            }
            for (cluster, (sum, count)) in clusters.iter_mut().zip(sums.iter().zip(&pixel_count_sums)) {
                if *count == 0 {
                    *cluster = [0.0; 3];
                    continue;
                }
                let count = *count as f64;
                *cluster = [sum[0] / count, sum[1] / count, sum[2] / count];
            }
        }

        let mut result: HashMap<u32, u32> = HashMap::new();
        for (cluster, count) in clusters.iter().zip(&pixel_count_sums) {
            if *count == 0 {
                continue;
            }
            let argb = utils::argb_from_lab(*cluster);
            result.entry(argb).or_insert(*count as u32);
        }
        result
    }
}

fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dl = a[0] - b[0];
    let da = a[1] - b[1];
    let db = a[2] - b[2];
    dl * dl + da * da + db * db
}

fn nearest(point: &[f64; 3], clusters: &[[f64; 3]]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::MAX;
    for (i, cluster) in clusters.iter().enumerate() {
        let d = distance(point, cluster);
        if d < best_distance {
            best_distance = d;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_clusters() {
        let mut pixels = vec![0xFFFF0000; 30];
        pixels.extend(vec![0xFF0000FF; 70]);
        let result = QuantizerWsmeans::quantize(&pixels, &[0xFFFF0000, 0xFF0000FF], 8);
        assert_eq!(result.len(), 2);
        assert_eq!(result.get(&0xFFFF0000), Some(&30));
        assert_eq!(result.get(&0xFF0000FF), Some(&70));
    }

    #[test]
    fn test_population_is_preserved() {
        let pixels: Vec<u32> = (0..200u32)
            .map(|i| utils::argb_from_rgb((i * 3 % 256) as u8, (i * 5 % 256) as u8, (i * 11 % 256) as u8))
            .collect();
        let result = QuantizerWsmeans::quantize(&pixels, &[], 6);
        assert!(!result.is_empty());
        assert!(result.len() <= 6);
        // Distinct clusters can collapse onto one ARGB, so the total is an upper bound.
        assert!(result.values().map(|c| *c as usize).sum::<usize>() <= pixels.len());
    }

    #[test]
    fn test_empty_input() {
        assert!(QuantizerWsmeans::quantize(&[], &[0xFF000000], 4).is_empty());
    }
}
