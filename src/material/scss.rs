//! SCSS variable prelude for the shell stylesheet

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use area_color::roles;

use super::error::{MaterialError, Result};
use super::scheme::ColorScheme;
use super::write_atomic;

pub const PRELUDE_FILE: &str = "colors.scss";

/// `$darkmode`, one variable per role, then the opacity levels. Translucent
/// surfaces only make sense with blur behind them, so without blur every
/// opacity is 1.
pub fn prelude(scheme: &ColorScheme, dark: bool, blur: bool) -> String {
    let mut out = String::new();
    push_var(&mut out, "darkmode", if dark { "true" } else { "false" });
    for role in roles::ALL {
        if let Some(hex) = scheme.get(role) {
            push_var(&mut out, role, hex);
        }
    }

    let (high, medium, low) = if blur { ("0.7", "0.5", "0.3") } else { ("1", "1", "1") };
    push_var(&mut out, "opacity-high", high);
    push_var(&mut out, "opacity-medium", medium);
    push_var(&mut out, "opacity-low", low);
    out
}

/// Write the prelude to `<out_dir>/colors.scss`
pub fn write_prelude(out_dir: &Path, scheme: &ColorScheme, dark: bool, blur: bool) -> Result<PathBuf> {
    let path = out_dir.join(PRELUDE_FILE);
    write_atomic(&path, prelude(scheme, dark, blur).as_bytes()).map_err(|source| MaterialError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn push_var(out: &mut String, name: &str, value: &str) {
    let _ = writeln!(out, "${name}: {value};");
}
