//! CAM16 color appearance model.

use std::f64::consts::PI;
use std::sync::OnceLock;

use crate::utils::{self, signum};

/// XYZ to cone responses (CAM16 adaptation matrix).
pub(crate) const CAM16RGB_FROM_XYZ: [[f64; 3]; 3] = [
    [0.401288, 0.650173, -0.051461],
    [-0.250268, 1.204414, 0.045854],
    [-0.002079, 0.048952, 0.953127],
];

/// Environment in which a color is viewed.
///
/// Most of the fields are intermediate values of the CAM16 forward model that
/// only depend on the environment, so they are computed once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewingConditions {
    pub n: f64,
    pub aw: f64,
    pub nbb: f64,
    pub ncb: f64,
    pub c: f64,
    pub nc: f64,
    pub rgb_d: [f64; 3],
    pub fl: f64,
    pub fl_root: f64,
    pub z: f64,
}

impl ViewingConditions {
    /// Build viewing conditions.
    ///
    /// * `white_point` - XYZ of the reference white
    /// * `adapting_luminance` - luminance of the adapting field, in lux
    /// * `background_lstar` - L* of the background
    /// * `surround` - 0.0 (dark room) to 2.0 (average)
    /// * `discounting_illuminant` - whether the eye fully adapts to the illuminant
    pub fn make(
        white_point: [f64; 3],
        adapting_luminance: f64,
        background_lstar: f64,
        surround: f64,
        discounting_illuminant: bool,
    ) -> Self {
        let background_lstar = background_lstar.max(0.1);
        let [r_w, g_w, b_w] = utils::matrix_multiply(white_point, &CAM16RGB_FROM_XYZ);

        let f = 0.8 + surround / 10.0;
        let c = if f >= 0.9 {
            utils::lerp(0.59, 0.69, (f - 0.9) * 10.0)
        } else {
            utils::lerp(0.525, 0.59, (f - 0.8) * 10.0)
        };
        let d = if discounting_illuminant {
            1.0
        } else {
            f * (1.0 - (1.0 / 3.6) * ((-adapting_luminance - 42.0) / 92.0).exp())
        }
        .clamp(0.0, 1.0);
        let nc = f;
        let rgb_d = [
            d * (100.0 / r_w) + 1.0 - d,
            d * (100.0 / g_w) + 1.0 - d,
            d * (100.0 / b_w) + 1.0 - d,
        ];

        let k = 1.0 / (5.0 * adapting_luminance + 1.0);
        let k4 = k * k * k * k;
        let k4f = 1.0 - k4;
        let fl = k4 * adapting_luminance + 0.1 * k4f * k4f * (5.0 * adapting_luminance).cbrt();

        let n = utils::y_from_lstar(background_lstar) / white_point[1];
        let z = 1.48 + n.sqrt();
        let nbb = 0.725 / n.powf(0.2);
        let ncb = nbb;

        let adapted = [
            (fl * rgb_d[0] * r_w / 100.0).powf(0.42),
            (fl * rgb_d[1] * g_w / 100.0).powf(0.42),
            (fl * rgb_d[2] * b_w / 100.0).powf(0.42),
        ];
        let rgb_a = adapted.map(|f| 400.0 * f / (f + 27.13));
        let aw = (2.0 * rgb_a[0] + rgb_a[1] + 0.05 * rgb_a[2]) * nbb;

        Self {
            n,
            aw,
            nbb,
            ncb,
            c,
            nc,
            rgb_d,
            fl,
            fl_root: fl.powf(0.25),
            z,
        }
    }

    /// sRGB-like viewing conditions, shared process-wide.
    pub fn standard() -> &'static ViewingConditions {
        static STANDARD: OnceLock<ViewingConditions> = OnceLock::new();
        STANDARD.get_or_init(|| {
            ViewingConditions::make(
                utils::WHITE_POINT_D65,
                200.0 / PI * utils::y_from_lstar(50.0) / 100.0,
                50.0,
                2.0,
                false,
            )
        })
    }
}

impl Default for ViewingConditions {
    fn default() -> Self {
        *Self::standard()
    }
}

/// A color in CAM16, including the CAM16-UCS coordinates used for distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cam16 {
    pub hue: f64,
    pub chroma: f64,
    pub j: f64,
    pub q: f64,
    pub m: f64,
    pub s: f64,
    pub jstar: f64,
    pub astar: f64,
    pub bstar: f64,
}

impl Cam16 {
    pub fn from_argb(argb: u32) -> Self {
        Self::from_argb_in(argb, ViewingConditions::standard())
    }

    pub fn from_argb_in(argb: u32, vc: &ViewingConditions) -> Self {
        let [x, y, z] = utils::xyz_from_argb(argb);
        Self::from_xyz_in(x, y, z, vc)
    }

    pub fn from_xyz_in(x: f64, y: f64, z: f64, vc: &ViewingConditions) -> Self {
        let [r_c, g_c, b_c] = utils::matrix_multiply([x, y, z], &CAM16RGB_FROM_XYZ);

        let r_d = vc.rgb_d[0] * r_c;
        let g_d = vc.rgb_d[1] * g_c;
        let b_d = vc.rgb_d[2] * b_c;

        let r_af = (vc.fl * r_d.abs() / 100.0).powf(0.42);
        let g_af = (vc.fl * g_d.abs() / 100.0).powf(0.42);
        let b_af = (vc.fl * b_d.abs() / 100.0).powf(0.42);
        let r_a = signum(r_d) * 400.0 * r_af / (r_af + 27.13);
        let g_a = signum(g_d) * 400.0 * g_af / (g_af + 27.13);
        let b_a = signum(b_d) * 400.0 * b_af / (b_af + 27.13);

        // Redness-greenness and yellowness-blueness.
        let a = (11.0 * r_a - 12.0 * g_a + b_a) / 11.0;
        let b = (r_a + g_a - 2.0 * b_a) / 9.0;

        let u = (20.0 * r_a + 20.0 * g_a + 21.0 * b_a) / 20.0;
        let p2 = (40.0 * r_a + 20.0 * g_a + b_a) / 20.0;

        let atan_degrees = b.atan2(a).to_degrees();
        let hue = if atan_degrees < 0.0 {
            atan_degrees + 360.0
        } else if atan_degrees >= 360.0 {
            atan_degrees - 360.0
        } else {
            atan_degrees
        };
        let hue_radians = hue.to_radians();

        let ac = p2 * vc.nbb;
        let j = 100.0 * (ac / vc.aw).powf(vc.c * vc.z);
        let q = 4.0 / vc.c * (j / 100.0).sqrt() * (vc.aw + 4.0) * vc.fl_root;

        let hue_prime = if hue < 20.14 { hue + 360.0 } else { hue };
        let e_hue = 0.25 * ((hue_prime.to_radians() + 2.0).cos() + 3.8);
        let p1 = 50000.0 / 13.0 * e_hue * vc.nc * vc.ncb;
        let t = p1 * a.hypot(b) / (u + 0.305);
        let alpha = (1.64 - 0.29f64.powf(vc.n)).powf(0.73) * t.powf(0.9);
        let chroma = alpha * (j / 100.0).sqrt();
        let m = chroma * vc.fl_root;
        let s = 50.0 * (alpha * vc.c / (vc.aw + 4.0)).sqrt();

        let jstar = (1.0 + 100.0 * 0.007) * j / (1.0 + 0.007 * j);
        let mstar = 1.0 / 0.0228 * (0.0228 * m).ln_1p();

        Self {
            hue,
            chroma,
            j,
            q,
            m,
            s,
            jstar,
            astar: mstar * hue_radians.cos(),
            bstar: mstar * hue_radians.sin(),
        }
    }

    pub fn from_jch(j: f64, chroma: f64, hue: f64) -> Self {
        Self::from_jch_in(j, chroma, hue, ViewingConditions::standard())
    }

    pub fn from_jch_in(j: f64, chroma: f64, hue: f64, vc: &ViewingConditions) -> Self {
        let q = 4.0 / vc.c * (j / 100.0).sqrt() * (vc.aw + 4.0) * vc.fl_root;
        let m = chroma * vc.fl_root;
        let alpha = chroma / (j / 100.0).sqrt();
        let s = 50.0 * (alpha * vc.c / (vc.aw + 4.0)).sqrt();

        let hue_radians = hue.to_radians();
        let jstar = (1.0 + 100.0 * 0.007) * j / (1.0 + 0.007 * j);
        let mstar = 1.0 / 0.0228 * (0.0228 * m).ln_1p();

        Self {
            hue,
            chroma,
            j,
            q,
            m,
            s,
            jstar,
            astar: mstar * hue_radians.cos(),
            bstar: mstar * hue_radians.sin(),
        }
    }

    pub fn to_argb(&self) -> u32 {
        self.viewed(ViewingConditions::standard())
    }

    /// Inverse model: the sRGB color that produces this appearance under `vc`.
    pub fn viewed(&self, vc: &ViewingConditions) -> u32 {
        let alpha = if self.chroma == 0.0 || self.j == 0.0 {
            0.0
        } else {
            self.chroma / (self.j / 100.0).sqrt()
        };

        let t = (alpha / (1.64 - 0.29f64.powf(vc.n)).powf(0.73)).powf(1.0 / 0.9);
        let h_rad = self.hue.to_radians();

        let e_hue = 0.25 * ((h_rad + 2.0).cos() + 3.8);
        let ac = vc.aw * (self.j / 100.0).powf(1.0 / vc.c / vc.z);
        let p1 = e_hue * (50000.0 / 13.0) * vc.nc * vc.ncb;
        let p2 = ac / vc.nbb;

        let h_sin = h_rad.sin();
        let h_cos = h_rad.cos();

        let gamma = 23.0 * (p2 + 0.305) * t / (23.0 * p1 + 11.0 * t * h_cos + 108.0 * t * h_sin);
        let a = gamma * h_cos;
        let b = gamma * h_sin;
        let r_a = (460.0 * p2 + 451.0 * a + 288.0 * b) / 1403.0;
        let g_a = (460.0 * p2 - 891.0 * a - 261.0 * b) / 1403.0;
        let b_a = (460.0 * p2 - 220.0 * a - 6300.0 * b) / 1403.0;

        let unadapt = |adapted: f64| {
            let base = (27.13 * adapted.abs() / (400.0 - adapted.abs())).max(0.0);
            signum(adapted) * (100.0 / vc.fl) * base.powf(1.0 / 0.42)
        };
        let r_f = unadapt(r_a) / vc.rgb_d[0];
        let g_f = unadapt(g_a) / vc.rgb_d[1];
        let b_f = unadapt(b_a) / vc.rgb_d[2];

        let x = 1.86206786 * r_f - 1.01125463 * g_f + 0.14918677 * b_f;
        let y = 0.38752654 * r_f + 0.62144744 * g_f - 0.00897398 * b_f;
        let z = -0.01584150 * r_f - 0.03412294 * g_f + 1.04996444 * b_f;

        utils::argb_from_xyz(x, y, z)
    }

    /// Perceptual distance in CAM16-UCS.
    pub fn distance(&self, other: &Cam16) -> f64 {
        let d_j = self.jstar - other.jstar;
        let d_a = self.astar - other.astar;
        let d_b = self.bstar - other.bstar;
        let d_e_prime = (d_j * d_j + d_a * d_a + d_b * d_b).sqrt();
        1.41 * d_e_prime.powf(0.63)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_red_appearance() {
        let cam = Cam16::from_argb(0xFFFF0000);
        assert!((cam.hue - 27.408).abs() < 0.01, "hue {}", cam.hue);
        assert!((cam.chroma - 113.357).abs() < 0.01, "chroma {}", cam.chroma);
        assert!((cam.j - 46.445).abs() < 0.01, "j {}", cam.j);
    }

    #[test]
    fn test_gray_chroma_under_default_conditions() {
        // The adapted white point is not neutral, so grays keep a little chroma
        let cam = Cam16::from_argb(0xFF808080);
        assert!((cam.chroma - 1.896).abs() < 1e-3, "chroma {}", cam.chroma);
        assert!((cam.hue - 209.494).abs() < 1e-2, "hue {}", cam.hue);
        let white = Cam16::from_argb(0xFFFFFFFF);
        assert!((white.chroma - 2.869).abs() < 1e-2, "chroma {}", white.chroma);
    }

    #[test]
    fn test_forward_inverse_roundtrip() {
        for argb in [0xFFFF0000, 0xFF00FF00, 0xFF0000FF, 0xFF6750A4, 0xFFFFFFFF, 0xFF202020] {
            let cam = Cam16::from_argb(argb);
            assert_eq!(cam.to_argb(), argb, "argb {:08X}", argb);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Cam16::from_argb(0xFF6750A4);
        let b = Cam16::from_argb(0xFF625B71);
        assert!((a.distance(&b) - b.distance(&a)).abs() < 1e-12);
        assert_eq!(a.distance(&a), 0.0);
    }
}
