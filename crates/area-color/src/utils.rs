//! Color space conversions and small numeric helpers.
//!
//! Everything here works on packed ARGB `u32` values (`0xAARRGGBB`) and on
//! linear RGB / XYZ components scaled to `0.0..=100.0`.

pub const SRGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.41233895, 0.35762064, 0.18051042],
    [0.2126, 0.7152, 0.0722],
    [0.01932141, 0.11916382, 0.95034478],
];

pub const XYZ_TO_SRGB: [[f64; 3]; 3] = [
    [3.2413774792388685, -1.5376652402851851, -0.49885366846268053],
    [-0.9691452513005321, 1.8758853451067872, 0.04156585616912061],
    [0.05562093689691305, -0.20395524564742123, 1.0571799111220335],
];

/// D65 standard illuminant, Y normalized to 100.
pub const WHITE_POINT_D65: [f64; 3] = [95.047, 100.0, 108.883];

// ============================================================================
// ARGB packing
// ============================================================================

pub fn argb_from_rgb(red: u8, green: u8, blue: u8) -> u32 {
    0xFF00_0000 | (red as u32) << 16 | (green as u32) << 8 | blue as u32
}

pub fn alpha_from_argb(argb: u32) -> u8 {
    (argb >> 24) as u8
}

pub fn red_from_argb(argb: u32) -> u8 {
    (argb >> 16) as u8
}

pub fn green_from_argb(argb: u32) -> u8 {
    (argb >> 8) as u8
}

pub fn blue_from_argb(argb: u32) -> u8 {
    argb as u8
}

pub fn is_opaque(argb: u32) -> bool {
    alpha_from_argb(argb) == 255
}

/// Format as `#RRGGBB`, dropping alpha.
pub fn hex_from_argb(argb: u32) -> String {
    format!("#{:06X}", argb & 0x00FF_FFFF)
}

/// Parse `#RRGGBB` or `RRGGBB` into an opaque ARGB value.
pub fn argb_from_hex(hex: &str) -> Option<u32> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16)
        .ok()
        .map(|rgb| 0xFF00_0000 | rgb)
}

// ============================================================================
// Linear RGB
// ============================================================================

/// sRGB component (0-255) to linear RGB (0-100).
pub fn linearized(component: u8) -> f64 {
    let normalized = component as f64 / 255.0;
    if normalized <= 0.040449936 {
        normalized / 12.92 * 100.0
    } else {
        ((normalized + 0.055) / 1.055).powf(2.4) * 100.0
    }
}

/// Linear RGB (0-100) to sRGB component (0-255), clamped and rounded.
pub fn delinearized(component: f64) -> u8 {
    let normalized = component / 100.0;
    let delinearized = if normalized <= 0.0031308 {
        normalized * 12.92
    } else {
        1.055 * normalized.powf(1.0 / 2.4) - 0.055
    };
    (delinearized * 255.0).round().clamp(0.0, 255.0) as u8
}

pub fn argb_from_linrgb(linrgb: [f64; 3]) -> u32 {
    argb_from_rgb(
        delinearized(linrgb[0]),
        delinearized(linrgb[1]),
        delinearized(linrgb[2]),
    )
}

// ============================================================================
// XYZ / L*a*b*
// ============================================================================

pub fn argb_from_xyz(x: f64, y: f64, z: f64) -> u32 {
    let linrgb = matrix_multiply([x, y, z], &XYZ_TO_SRGB);
    argb_from_linrgb(linrgb)
}

pub fn xyz_from_argb(argb: u32) -> [f64; 3] {
    let linrgb = [
        linearized(red_from_argb(argb)),
        linearized(green_from_argb(argb)),
        linearized(blue_from_argb(argb)),
    ];
    matrix_multiply(linrgb, &SRGB_TO_XYZ)
}

pub fn lab_from_argb(argb: u32) -> [f64; 3] {
    let [x, y, z] = xyz_from_argb(argb);
    let fx = lab_f(x / WHITE_POINT_D65[0]);
    let fy = lab_f(y / WHITE_POINT_D65[1]);
    let fz = lab_f(z / WHITE_POINT_D65[2]);
    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

pub fn argb_from_lab(lab: [f64; 3]) -> u32 {
    let fy = (lab[0] + 16.0) / 116.0;
    let fx = lab[1] / 500.0 + fy;
    let fz = fy - lab[2] / 200.0;
    let x = lab_invf(fx) * WHITE_POINT_D65[0];
    let y = lab_invf(fy) * WHITE_POINT_D65[1];
    let z = lab_invf(fz) * WHITE_POINT_D65[2];
    argb_from_xyz(x, y, z)
}

/// Gray with the given L*.
pub fn argb_from_lstar(lstar: f64) -> u32 {
    let component = delinearized(y_from_lstar(lstar));
    argb_from_rgb(component, component, component)
}

pub fn lstar_from_argb(argb: u32) -> f64 {
    let y = xyz_from_argb(argb)[1];
    116.0 * lab_f(y / 100.0) - 16.0
}

/// L* (0-100) to relative luminance Y (0-100).
pub fn y_from_lstar(lstar: f64) -> f64 {
    100.0 * lab_invf((lstar + 16.0) / 116.0)
}

pub fn lstar_from_y(y: f64) -> f64 {
    lab_f(y / 100.0) * 116.0 - 16.0
}

fn lab_f(t: f64) -> f64 {
    let e = 216.0 / 24389.0;
    let kappa = 24389.0 / 27.0;
    if t > e {
        t.cbrt()
    } else {
        (kappa * t + 16.0) / 116.0
    }
}

fn lab_invf(ft: f64) -> f64 {
    let e = 216.0 / 24389.0;
    let kappa = 24389.0 / 27.0;
    let ft3 = ft * ft * ft;
    if ft3 > e {
        ft3
    } else {
        (116.0 * ft - 16.0) / kappa
    }
}

// ============================================================================
// Math
// ============================================================================

pub fn signum(value: f64) -> f64 {
    if value < 0.0 {
        -1.0
    } else if value == 0.0 {
        0.0
    } else {
        1.0
    }
}

pub fn lerp(start: f64, stop: f64, amount: f64) -> f64 {
    (1.0 - amount) * start + amount * stop
}

pub fn sanitize_degrees_int(degrees: i32) -> i32 {
    degrees.rem_euclid(360)
}

pub fn sanitize_degrees(degrees: f64) -> f64 {
    let degrees = degrees % 360.0;
    if degrees < 0.0 {
        degrees + 360.0
    } else {
        degrees
    }
}

/// +1.0 when the shortest path from `from` to `to` is increasing, else -1.0.
pub fn rotation_direction(from: f64, to: f64) -> f64 {
    let increasing = sanitize_degrees(to - from);
    if increasing <= 180.0 {
        1.0
    } else {
        -1.0
    }
}

/// Angular distance between two hues, in `0.0..=180.0`.
pub fn difference_degrees(a: f64, b: f64) -> f64 {
    180.0 - ((a - b).abs() - 180.0).abs()
}

pub fn matrix_multiply(row: [f64; 3], matrix: &[[f64; 3]; 3]) -> [f64; 3] {
    [
        row[0] * matrix[0][0] + row[1] * matrix[0][1] + row[2] * matrix[0][2],
        row[0] * matrix[1][0] + row[1] * matrix[1][1] + row[2] * matrix[1][2],
        row[0] * matrix[2][0] + row[1] * matrix[2][1] + row[2] * matrix[2][2],
    ]
}
