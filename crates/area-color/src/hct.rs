//! HCT: CAM16 hue and chroma combined with L* tone.
//!
//! Tone is what makes HCT useful for theming: two colors whose tones differ by
//! a known amount have a known contrast ratio, regardless of hue.

use std::f64::consts::PI;

use crate::cam16::{Cam16, ViewingConditions};
use crate::utils::{self, signum};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hct {
    hue: f64,
    chroma: f64,
    tone: f64,
    argb: u32,
}

impl Hct {
    /// Closest in-gamut color with the requested hue and tone.
    ///
    /// Chroma is a request: when it cannot be reached at this hue and tone
    /// the result carries the highest achievable chroma instead.
    pub fn new(hue: f64, chroma: f64, tone: f64) -> Self {
        Self::from_argb(solve_to_argb(hue, chroma, tone))
    }

    pub fn from_argb(argb: u32) -> Self {
        let cam = Cam16::from_argb(argb);
        Self {
            hue: cam.hue,
            chroma: cam.chroma,
            tone: utils::lstar_from_argb(argb),
            argb,
        }
    }

    pub fn hue(&self) -> f64 {
        self.hue
    }

    pub fn chroma(&self) -> f64 {
        self.chroma
    }

    pub fn tone(&self) -> f64 {
        self.tone
    }

    pub fn to_argb(&self) -> u32 {
        self.argb
    }

    pub fn with_hue(&self, hue: f64) -> Self {
        Self::new(hue, self.chroma, self.tone)
    }

    pub fn with_chroma(&self, chroma: f64) -> Self {
        Self::new(self.hue, chroma, self.tone)
    }

    pub fn with_tone(&self, tone: f64) -> Self {
        Self::new(self.hue, self.chroma, tone)
    }
}

impl From<u32> for Hct {
    fn from(argb: u32) -> Self {
        Self::from_argb(argb)
    }
}

// ============================================================================
// Solver
// ============================================================================

const SCALED_DISCOUNT_FROM_LINRGB: [[f64; 3]; 3] = [
    [0.001200833568784504, 0.002389694492170889, 0.0002795742885861124],
    [0.0005891086651375999, 0.0029785502573438758, 0.0003270666104008398],
    [0.00010146692491640572, 0.0005364214359186694, 0.0032979401770712076],
];

const LINRGB_FROM_SCALED_DISCOUNT: [[f64; 3]; 3] = [
    [1373.2198709594231, -1100.4251190754821, -7.278681089101213],
    [-271.815969077903, 559.6580465940733, -32.46047482791194],
    [1.9622899599665666, -57.173814538844006, 308.7233197812385],
];

const Y_FROM_LINRGB: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Solve HCT to sRGB.
///
/// First tries Newton iteration on J, which succeeds whenever the requested
/// chroma is in gamut. Otherwise bisects along the boundary of the sRGB cube
/// at constant Y for the requested hue.
pub fn solve_to_argb(hue: f64, chroma: f64, lstar: f64) -> u32 {
    if chroma < 0.0001 || lstar < 0.0001 || lstar > 99.9999 {
        return utils::argb_from_lstar(lstar);
    }
    let hue_radians = utils::sanitize_degrees(hue).to_radians();
    let y = utils::y_from_lstar(lstar);
    if let Some(exact) = find_result_by_j(hue_radians, chroma, y) {
        return exact;
    }
    utils::argb_from_linrgb(bisect_to_limit(y, hue_radians))
}

fn sanitize_radians(angle: f64) -> f64 {
    (angle + PI * 8.0) % (PI * 2.0)
}

/// Delinearized component scaled to 0-255 without rounding.
fn true_delinearized(component: f64) -> f64 {
    let normalized = component / 100.0;
    let delinearized = if normalized <= 0.0031308 {
        normalized * 12.92
    } else {
        1.055 * normalized.powf(1.0 / 2.4) - 0.055
    };
    delinearized * 255.0
}

/// Linear RGB value at which the 8-bit sRGB value steps from `plane` to `plane + 1`.
fn critical_plane(plane: i32) -> f64 {
    let normalized = (plane as f64 + 0.5) / 255.0;
    if normalized <= 0.040449936 {
        normalized / 12.92 * 100.0
    } else {
        ((normalized + 0.055) / 1.055).powf(2.4) * 100.0
    }
}

fn chromatic_adaptation(component: f64) -> f64 {
    let af = component.abs().powf(0.42);
    signum(component) * 400.0 * af / (af + 27.13)
}

fn inverse_chromatic_adaptation(adapted: f64) -> f64 {
    let adapted_abs = adapted.abs();
    let base = (27.13 * adapted_abs / (400.0 - adapted_abs)).max(0.0);
    signum(adapted) * base.powf(1.0 / 0.42)
}

/// CAM16 hue in radians of a linear RGB color.
fn hue_of(linrgb: [f64; 3]) -> f64 {
    let scaled = utils::matrix_multiply(linrgb, &SCALED_DISCOUNT_FROM_LINRGB);
    let r_a = chromatic_adaptation(scaled[0]);
    let g_a = chromatic_adaptation(scaled[1]);
    let b_a = chromatic_adaptation(scaled[2]);
    let a = (11.0 * r_a - 12.0 * g_a + b_a) / 11.0;
    let b = (r_a + g_a - 2.0 * b_a) / 9.0;
    b.atan2(a)
}

fn are_in_cyclic_order(a: f64, b: f64, c: f64) -> bool {
    sanitize_radians(b - a) < sanitize_radians(c - a)
}

fn intercept(source: f64, mid: f64, target: f64) -> f64 {
    (mid - source) / (target - source)
}

fn lerp_point(source: [f64; 3], t: f64, target: [f64; 3]) -> [f64; 3] {
    [
        source[0] + (target[0] - source[0]) * t,
        source[1] + (target[1] - source[1]) * t,
        source[2] + (target[2] - source[2]) * t,
    ]
}

fn set_coordinate(source: [f64; 3], coordinate: f64, target: [f64; 3], axis: usize) -> [f64; 3] {
    let t = intercept(source[axis], coordinate, target[axis]);
    lerp_point(source, t, target)
}

fn is_bounded(x: f64) -> bool {
    (0.0..=100.0).contains(&x)
}

/// The nth of the 12 edges of the RGB cube, intersected with the plane of
/// constant `y`. `None` when that edge does not cross the plane.
fn nth_vertex(y: f64, n: usize) -> Option<[f64; 3]> {
    let [k_r, k_g, k_b] = Y_FROM_LINRGB;
    let coord_a = if n % 4 <= 1 { 0.0 } else { 100.0 };
    let coord_b = if n % 2 == 0 { 0.0 } else { 100.0 };
    let vertex = if n < 4 {
        let (g, b) = (coord_a, coord_b);
        [(y - g * k_g - b * k_b) / k_r, g, b]
    } else if n < 8 {
        let (b, r) = (coord_a, coord_b);
        [r, (y - r * k_r - b * k_b) / k_g, b]
    } else {
        let (r, g) = (coord_a, coord_b);
        [r, g, (y - r * k_r - g * k_g) / k_b]
    };
    vertex.iter().all(|c| is_bounded(*c)).then_some(vertex)
}

/// Two points on the constant-Y plane section of the cube whose hues bracket
/// `target_hue`.
fn bisect_to_segment(y: f64, target_hue: f64) -> ([f64; 3], [f64; 3]) {
    let mut left = [0.0; 3];
    let mut right = [0.0; 3];
    let mut left_hue = 0.0;
    let mut right_hue = 0.0;
    let mut initialized = false;
    let mut uncut = true;
    for n in 0..12 {
        let Some(mid) = nth_vertex(y, n) else {
            continue;
        };
        let mid_hue = hue_of(mid);
        if !initialized {
            left = mid;
            right = mid;
            left_hue = mid_hue;
            right_hue = mid_hue;
            initialized = true;
            continue;
        }
        if uncut || are_in_cyclic_order(left_hue, mid_hue, right_hue) {
            uncut = false;
            if are_in_cyclic_order(left_hue, target_hue, mid_hue) {
                right = mid;
                right_hue = mid_hue;
            } else {
                left = mid;
                left_hue = mid_hue;
            }
        }
    }
    (left, right)
}

fn midpoint(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0, (a[2] + b[2]) / 2.0]
}

fn critical_plane_below(x: f64) -> i32 {
    (x - 0.5).floor() as i32
}

fn critical_plane_above(x: f64) -> i32 {
    (x - 0.5).ceil() as i32
}

fn bisect_to_limit(y: f64, target_hue: f64) -> [f64; 3] {
    let (mut left, mut right) = bisect_to_segment(y, target_hue);
    let mut left_hue = hue_of(left);
    for axis in 0..3 {
        if left[axis] == right[axis] {
            continue;
        }
        let (mut l_plane, mut r_plane) = if left[axis] < right[axis] {
            (
                critical_plane_below(true_delinearized(left[axis])),
                critical_plane_above(true_delinearized(right[axis])),
            )
        } else {
            (
                critical_plane_above(true_delinearized(left[axis])),
                critical_plane_below(true_delinearized(right[axis])),
            )
        };
        for _ in 0..8 {
            if (r_plane - l_plane).abs() <= 1 {
                break;
            }
            let m_plane = ((l_plane + r_plane) as f64 / 2.0).floor() as i32;
            let mid = set_coordinate(left, critical_plane(m_plane), right, axis);
            let mid_hue = hue_of(mid);
            if are_in_cyclic_order(left_hue, target_hue, mid_hue) {
                right = mid;
                r_plane = m_plane;
            } else {
                left = mid;
                left_hue = mid_hue;
                l_plane = m_plane;
            }
        }
    }
    midpoint(left, right)
}

/// Newton's method on J. Returns `None` when the color is out of gamut.
fn find_result_by_j(hue_radians: f64, chroma: f64, y: f64) -> Option<u32> {
    // Initial estimate of J from Y; good enough to converge in a few rounds.
    let mut j = y.sqrt() * 11.0;

    let vc = ViewingConditions::standard();
    let t_inner_coeff = 1.0 / (1.64 - 0.29f64.powf(vc.n)).powf(0.73);
    let e_hue = 0.25 * ((hue_radians + 2.0).cos() + 3.8);
    let p1 = e_hue * (50000.0 / 13.0) * vc.nc * vc.ncb;
    let h_sin = hue_radians.sin();
    let h_cos = hue_radians.cos();

    for round in 0..5 {
        let j_normalized = j / 100.0;
        let alpha = if chroma == 0.0 || j == 0.0 {
            0.0
        } else {
            chroma / j_normalized.sqrt()
        };
        let t = (alpha * t_inner_coeff).powf(1.0 / 0.9);
        let ac = vc.aw * j_normalized.powf(1.0 / vc.c / vc.z);
        let p2 = ac / vc.nbb;
        let gamma = 23.0 * (p2 + 0.305) * t / (23.0 * p1 + 11.0 * t * h_cos + 108.0 * t * h_sin);
        let a = gamma * h_cos;
        let b = gamma * h_sin;
        let r_a = (460.0 * p2 + 451.0 * a + 288.0 * b) / 1403.0;
        let g_a = (460.0 * p2 - 891.0 * a - 261.0 * b) / 1403.0;
        let b_a = (460.0 * p2 - 220.0 * a - 6300.0 * b) / 1403.0;
        let scaled = [
            inverse_chromatic_adaptation(r_a),
            inverse_chromatic_adaptation(g_a),
            inverse_chromatic_adaptation(b_a),
        ];
        let linrgb = utils::matrix_multiply(scaled, &LINRGB_FROM_SCALED_DISCOUNT);
        if linrgb.iter().any(|c| *c < 0.0) {
            return None;
        }
        let fnj = Y_FROM_LINRGB[0] * linrgb[0] + Y_FROM_LINRGB[1] * linrgb[1] + Y_FROM_LINRGB[2] * linrgb[2];
        if fnj <= 0.0 {
            return None;
        }
        if round == 4 || (fnj - y).abs() < 0.002 {
            if linrgb.iter().any(|c| *c > 100.01) {
                return None;
            }
            return Some(utils::argb_from_linrgb(linrgb));
        }
        // Derivative of fn(j) is approximately 2 * fn(j) / j.
        j -= (fnj - y) * j / (2.0 * fnj);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_roundtrip_preserves_components() {
        let hct = Hct::from_argb(0xFF6750A4);
        assert_eq!(hct.to_argb(), 0xFF6750A4);
        let solved = Hct::new(hct.hue(), hct.chroma(), hct.tone());
        assert_eq!(solved.to_argb(), 0xFF6750A4);
    }

    #[test]
    fn test_tone_is_respected() {
        for tone in [10.0, 25.0, 40.0, 60.0, 80.0, 95.0] {
            for hue in [0.0, 60.0, 120.0, 209.0, 282.0, 330.0] {
                let hct = Hct::new(hue, 48.0, tone);
                assert!(
                    (hct.tone() - tone).abs() < 1.0,
                    "hue {hue} tone {tone} solved to {}",
                    hct.tone()
                );
            }
        }
    }

    #[test]
    fn test_chroma_is_capped_by_gamut() {
        let hct = Hct::new(282.0, 200.0, 50.0);
        assert!(hct.chroma() < 200.0);
        assert!(hct.chroma() > 40.0);
        assert!((hct.tone() - 50.0).abs() < 0.6);
    }

    #[test]
    fn test_extreme_tones_are_black_and_white() {
        assert_eq!(Hct::new(120.0, 50.0, 0.0).to_argb(), 0xFF000000);
        assert_eq!(Hct::new(120.0, 50.0, 100.0).to_argb(), 0xFFFFFFFF);
        let gray = Hct::new(120.0, 0.0, 50.0);
        assert!(gray.chroma() < 2.5, "chroma {}", gray.chroma());
        assert!((gray.tone() - 50.0).abs() < 0.5);
    }

    #[test]
    fn test_critical_planes_match_srgb_steps() {
        assert!((critical_plane(0) - 0.015176349177441876).abs() < 1e-12);
        assert!((critical_plane(254) - 99.55452497210776).abs() < 1e-6);
    }
}
