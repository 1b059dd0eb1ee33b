//! Persisted user options and the last published colors

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use area_color::Variant;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::material::ColorScheme;

/// What survives a restart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialState {
    pub dark_mode: bool,
    pub color_scheme: Variant,
    pub blur_enabled: bool,
    pub wallpaper: Option<PathBuf>,
    /// Active scheme of the last publish
    pub colors: ColorScheme,
}

impl Default for MaterialState {
    fn default() -> Self {
        Self {
            dark_mode: true,
            color_scheme: Variant::TonalSpot,
            blur_enabled: true,
            wallpaper: None,
            colors: ColorScheme::default(),
        }
    }
}

/// JSON file holding [`MaterialState`]
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// `<data_dir>/area/material/state.json`
    pub fn default_location() -> Result<Self> {
        let dir = dirs::data_dir()
            .context("Failed to get data directory")?
            .join("area")
            .join("material");
        Ok(Self::at(dir.join("state.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved state. A missing or unreadable file yields defaults.
    pub fn load(&self) -> MaterialState {
        if !self.path.exists() {
            info!("No saved state at {:?}, using defaults", self.path);
            return MaterialState::default();
        }
        match self.try_load() {
            Ok(state) => state,
            Err(e) => {
                warn!("Ignoring saved state: {:#}", e);
                MaterialState::default()
            }
        }
    }

    fn try_load(&self) -> Result<MaterialState> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {:?}", self.path))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", self.path))
    }

    pub fn save(&self, state: &MaterialState) -> Result<()> {
        let json = serde_json::to_vec_pretty(state).context("Failed to serialize state")?;
        crate::material::write_atomic(&self.path, &json)
            .with_context(|| format!("Failed to write {:?}", self.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::at(dir.path().join("state.json"));
        let state = store.load();
        assert_eq!(state, MaterialState::default());
        assert!(state.dark_mode);
        assert!(state.blur_enabled);
        assert_eq!(state.color_scheme, Variant::TonalSpot);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::at(dir.path().join("material").join("state.json"));
        let state = MaterialState {
            dark_mode: false,
            color_scheme: Variant::FruitSalad,
            blur_enabled: false,
            wallpaper: Some(PathBuf::from("/walls/a.png")),
            colors: [("primary".to_string(), "#6750A4".to_string())].into_iter().collect(),
        };
        store.save(&state).unwrap();
        assert_eq!(store.load(), state);
    }

    #[test]
    fn unknown_variant_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::at(dir.path().join("state.json"));
        std::fs::write(store.path(), r#"{"dark_mode": false, "color_scheme": "Nonexistent"}"#).unwrap();
        assert_eq!(store.load(), MaterialState::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::at(dir.path().join("state.json"));
        std::fs::write(store.path(), r#"{"color_scheme": "Content"}"#).unwrap();
        let state = store.load();
        assert_eq!(state.color_scheme, Variant::Content);
        assert!(state.dark_mode);
        assert!(state.colors.is_empty());
    }
}
