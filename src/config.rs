//! Configuration for the Area material theming daemon
//!
//! Loads configuration from TOML file at `~/.config/area/material.toml`
//! Auto-generates default config file on first run if missing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::material::{cache, template};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub cache: CacheConfig,
    pub quantizer: QuantizerConfig,
    pub matugen: MatugenConfig,
    pub blur: BlurConfig,
    pub hooks: HooksConfig,
}

impl Config {
    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load from an explicit path; missing files produce (and write) defaults
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found at {:?}, using defaults", config_path);
            // Auto-generate default config file
            if let Err(e) = Self::save_default(config_path) {
                warn!("Failed to create default config file: {}", e);
            }
            return Ok(Self::default().expanded());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {:?}", config_path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", config_path))?;

        info!("Configuration loaded from {:?}", config_path);
        debug!("Config: {:?}", config);

        Ok(config.expanded())
    }

    /// Get the path to the config file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("area");

        Ok(config_dir.join("material.toml"))
    }

    /// Save default configuration to file
    fn save_default(path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(&Self::default())
            .context("Failed to serialize default config")?;

        fs::write(path, toml_string)
            .context("Failed to write default config file")?;

        info!("Created default config file at {:?}", path);
        Ok(())
    }

    /// Resolve `~/` in every configured path
    pub fn expanded(mut self) -> Self {
        for path in [
            &mut self.paths.templates_dir,
            &mut self.paths.output_dir,
            &mut self.paths.default_wallpaper,
            &mut self.matugen.binary,
            &mut self.blur.compositor_config,
            &mut self.blur.blur_conf,
        ] {
            *path = expand_tilde(path);
        }
        self
    }
}

/// Replace a leading `~/` with the user's home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Filesystem locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory of theme templates, each rendered with the active and dark schemes
    pub templates_dir: PathBuf,
    /// Where rendered templates and `colors.scss` go
    pub output_dir: PathBuf,
    /// Used when no wallpaper is set or the current one cannot be read
    pub default_wallpaper: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("~/.config/area/material/templates"),
            output_dir: PathBuf::from("~/.cache/area/material"),
            default_wallpaper: PathBuf::from("/usr/share/backgrounds/area/default.png"),
        }
    }
}

/// Cache sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Generated schemes kept before the oldest half is dropped
    pub max_entries: usize,
    /// Rendered template outputs remembered to skip identical rewrites
    pub template_memo_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: cache::DEFAULT_CEILING,
            template_memo_entries: template::DEFAULT_MEMO_CEILING,
        }
    }
}

/// Wallpaper quantization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantizerConfig {
    /// Palette size cap
    pub max_colors: usize,
    /// Long edge in pixels the wallpaper is downscaled to before quantizing
    pub max_edge: u32,
}

impl Default for QuantizerConfig {
    fn default() -> Self {
        Self {
            max_colors: 128,
            max_edge: 128,
        }
    }
}

/// matugen integration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatugenConfig {
    /// Run matugen after wallpaper and scheme changes
    pub enabled: bool,
    pub binary: PathBuf,
}

impl Default for MatugenConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            binary: PathBuf::from("/usr/bin/matugen"),
        }
    }
}

/// Compositor blur toggle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    /// Compositor config the blur `source=` line is added to
    pub compositor_config: PathBuf,
    /// Blur snippet to source
    pub blur_conf: PathBuf,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            compositor_config: PathBuf::from("~/.config/hypr/hyprland.conf"),
            blur_conf: PathBuf::from("~/.config/area/material/blur.conf"),
        }
    }
}

/// Shell commands, run with `sh -c`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Run after every publish
    pub reload: Vec<String>,
    /// Run once at startup when no saved colors were found
    pub colors_not_found: Vec<String>,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            reload: vec!["pkill -SIGUSR1 kitty".to_string()],
            colors_not_found: vec!["hyprctl reload".to_string()],
        }
    }
}
