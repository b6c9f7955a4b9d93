/// User settings persisted between sessions
///
/// Stored as JSON in the user's config directory:
/// - Linux: ~/.config/dm-image-presenter/settings.json
/// - macOS: ~/Library/Application Support/dm-image-presenter/settings.json
/// - Windows: %APPDATA%\dm-image-presenter\settings.json
///
/// Staged selections are deliberately not part of this file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{PresenterError, Result};
use crate::imaging::thumbnail::DEFAULT_THUMBNAIL_SIZE;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Edge length of list thumbnails in pixels
    pub thumbnail_size: u32,

    /// Folder opened last time; rescanned on startup when it still exists
    pub last_folder: Option<PathBuf>,

    /// Initial size of the separate display window
    pub display_width: u32,
    pub display_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            last_folder: None,
            display_width: 1280,
            display_height: 720,
        }
    }
}

impl Settings {
    /// Path of the settings file for the current user
    pub fn default_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().ok_or(PresenterError::NoConfigDir)?;
        path.push("dm-image-presenter");
        path.push("settings.json");
        Ok(path)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load from the default location, falling back to defaults on any error
    pub fn load() -> Self {
        match Self::default_path().and_then(|path| Self::load_from(&path)) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("⚠️  Using default settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save to the default location, logging failures
    pub fn save(&self) {
        if let Err(e) = Self::default_path().and_then(|path| self.save_to(&path)) {
            tracing::warn!("⚠️  Could not save settings: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.thumbnail_size, 128);
    }

    #[test]
    fn test_save_creates_parent_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = Settings {
            last_folder: Some(PathBuf::from("/campaigns/curse_of_strahd")),
            display_width: 1920,
            display_height: 1080,
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "thumbnail_size": 64 }"#).unwrap();
        assert_eq!(settings.thumbnail_size, 64);
        assert_eq!(settings.last_folder, None);
        assert_eq!(settings.display_width, 1280);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Settings::load_from(&path),
            Err(PresenterError::Settings { .. })
        ));
    }
}
