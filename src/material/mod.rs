//! Material You theming pipeline
//!
//! Wallpaper pixels are quantized into a palette, a seed color is scored out
//! of it and expanded into a full scheme of named roles. Schemes are cached
//! per (image, dark mode, variant) and rendered into theme templates.

pub mod blur;
pub mod cache;
pub mod error;
pub mod external;
pub mod quantizer;
pub mod scheme;
pub mod scss;
pub mod seed;
pub mod service;
pub mod template;

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

pub use scheme::ColorScheme;

/// Write `contents` to `path` through a temp file in the same directory, so
/// readers never see a partially written file.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)?;
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.css");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        // No stray temp files left behind
        assert_eq!(std::fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }
}
