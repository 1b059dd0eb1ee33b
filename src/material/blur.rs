//! Compositor blur toggle
//!
//! Blur is switched by sourcing (or not) a blur snippet from the
//! compositor's main config file.

use std::path::Path;

use tracing::{debug, info};

use super::error::{MaterialError, Result};
use super::write_atomic;

/// Add or remove the `source=<blur_conf>` line in `compositor_config`.
///
/// A missing config file is left alone. Returns whether the file changed.
pub fn apply_blur(compositor_config: &Path, blur_conf: &Path, enabled: bool) -> Result<bool> {
    if !compositor_config.is_file() {
        debug!("Compositor config {:?} not found, skipping blur toggle", compositor_config);
        return Ok(false);
    }

    let io_err = |source| MaterialError::Io {
        path: compositor_config.to_path_buf(),
        source,
    };
    let content = std::fs::read_to_string(compositor_config).map_err(io_err)?;
    let updated = toggle_source_line(&content, &format!("source={}", blur_conf.display()), enabled);
    if updated == content {
        return Ok(false);
    }

    write_atomic(compositor_config, updated.as_bytes()).map_err(io_err)?;
    info!("Blur {} in {:?}", if enabled { "enabled" } else { "disabled" }, compositor_config);
    Ok(true)
}

fn toggle_source_line(content: &str, source_line: &str, enabled: bool) -> String {
    let mut lines: Vec<&str> = content
        .split_inclusive('\n')
        .filter(|line| !line.trim().contains(source_line))
        .collect();

    let mut out = String::with_capacity(content.len() + source_line.len() + 2);
    if enabled && lines.last().is_none_or(|line| !line.ends_with('\n')) {
        lines.push("\n");
    }
    for line in lines {
        out.push_str(line);
    }
    if enabled {
        out.push_str(source_line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "source=/home/u/.config/area/material/blur.conf";

    #[test]
    fn enable_appends_once() {
        let once = toggle_source_line("monitor=,preferred,auto,1\n", LINE, true);
        assert_eq!(once, format!("monitor=,preferred,auto,1\n{LINE}\n"));
        assert_eq!(toggle_source_line(&once, LINE, true), once);
    }

    #[test]
    fn enable_adds_missing_newline() {
        let out = toggle_source_line("exec-once=waybar", LINE, true);
        assert_eq!(out, format!("exec-once=waybar\n{LINE}\n"));
    }

    #[test]
    fn disable_removes_line() {
        let content = format!("a=1\n{LINE}\nb=2\n");
        assert_eq!(toggle_source_line(&content, LINE, false), "a=1\nb=2\n");
        assert_eq!(toggle_source_line("a=1\n", LINE, false), "a=1\n");
    }

    #[test]
    fn apply_blur_on_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("hyprland.conf");
        let blur = dir.path().join("blur.conf");
        std::fs::write(&config, "general {}\n").unwrap();

        assert!(apply_blur(&config, &blur, true).unwrap());
        assert!(!apply_blur(&config, &blur, true).unwrap());
        let content = std::fs::read_to_string(&config).unwrap();
        assert!(content.ends_with(&format!("source={}\n", blur.display())));

        assert!(apply_blur(&config, &blur, false).unwrap());
        assert_eq!(std::fs::read_to_string(&config).unwrap(), "general {}\n");
    }

    #[test]
    fn missing_config_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("hyprland.conf");
        assert!(!apply_blur(&config, &dir.path().join("blur.conf"), true).unwrap());
        assert!(!config.exists());
    }
}
