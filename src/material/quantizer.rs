//! Wallpaper decoding and quantization

use std::path::Path;

use area_color::{QuantizerCelebi, QuantizerResult};
use image::imageops::FilterType;
use tracing::debug;

use super::error::{MaterialError, Result};

/// Quantized wallpaper colors with pixel populations, most common first
pub type ColorPalette = QuantizerResult;

/// Scale `(width, height)` down so the long edge fits in `max_edge`,
/// keeping the aspect ratio. Images that already fit are left alone.
pub fn optimal_size(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let long_edge = width.max(height);
    if long_edge <= max_edge || long_edge == 0 {
        return (width, height);
    }
    let scale = max_edge as f64 / long_edge as f64;
    let scaled = |edge: u32| ((edge as f64 * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}

/// Decode `path` and return its pixels as ARGB, downscaled to `max_edge`
pub fn load_pixels(path: &Path, max_edge: u32) -> Result<Vec<u32>> {
    let image = image::open(path).map_err(|source| MaterialError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;

    let (width, height) = (image.width(), image.height());
    let (new_width, new_height) = optimal_size(width, height, max_edge);
    let image = if new_width < width || new_height < height {
        debug!("Resizing {:?} from {}x{} to {}x{}", path, width, height, new_width, new_height);
        image.resize_exact(new_width, new_height, FilterType::CatmullRom)
    } else {
        image
    };

    Ok(image
        .to_rgba8()
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
        })
        .collect())
}

/// Decode, downscale and quantize an image into at most `max_colors` colors
pub fn quantize_image(path: &Path, max_colors: usize, max_edge: u32) -> Result<ColorPalette> {
    let pixels = load_pixels(path, max_edge)?;
    let palette = QuantizerCelebi::quantize(&pixels, max_colors);
    debug!("Quantized {:?}: {} pixels -> {} colors", path, pixels.len(), palette.len());
    Ok(palette)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, width: u32, height: u32, pixel: impl Fn(u32, u32) -> [u8; 4]) {
        let img = image::RgbaImage::from_fn(width, height, |x, y| image::Rgba(pixel(x, y)));
        img.save(path).unwrap();
    }

    #[test]
    fn optimal_size_keeps_aspect() {
        assert_eq!(optimal_size(1920, 1080, 128), (128, 72));
        assert_eq!(optimal_size(1080, 1920, 128), (72, 128));
        assert_eq!(optimal_size(100, 50, 128), (100, 50));
        assert_eq!(optimal_size(4000, 10, 128), (128, 1));
        assert_eq!(optimal_size(0, 0, 128), (0, 0));
    }

    #[test]
    fn load_pixels_downscales() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        write_png(&path, 512, 256, |_, _| [10, 20, 30, 255]);
        let pixels = load_pixels(&path, 128).unwrap();
        assert_eq!(pixels.len(), 128 * 64);
        assert!(pixels.iter().all(|p| *p == 0xFF0A141E));
    }

    #[test]
    fn quantize_checkerboard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checker.png");
        write_png(&path, 16, 16, |x, y| {
            if (x + y) % 2 == 0 { [0, 0, 0, 255] } else { [255, 255, 255, 255] }
        });
        let palette = quantize_image(&path, 128, 128).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.population(0xFF000000), Some(128));
        assert_eq!(palette.population(0xFFFFFFFF), Some(128));
    }

    #[test]
    fn transparent_pixels_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("half.png");
        write_png(&path, 8, 8, |x, _| if x < 4 { [200, 30, 30, 255] } else { [30, 30, 200, 0] });
        let palette = quantize_image(&path, 128, 128).unwrap();
        assert_eq!(palette.entries(), &[(0xFFC81E1E, 32)]);
    }

    #[test]
    fn missing_file_is_decode_error() {
        let err = quantize_image(Path::new("/nonexistent/wallpaper.png"), 128, 128).unwrap_err();
        assert!(matches!(err, MaterialError::ImageDecode { .. }));
    }

    #[test]
    fn garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(matches!(
            quantize_image(&path, 128, 128),
            Err(MaterialError::ImageDecode { .. })
        ));
    }
}
