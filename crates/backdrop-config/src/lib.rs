//! Persisted configuration for the backdrop terminal app.
//!
//! The file lives at `<config dir>/config.toml` and is optional: a missing file
//! yields [`Config::default`], and keys this version does not know are ignored.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use backdrop_core::{SettingValue, Settings};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const QUALIFIER: &str = "";
const ORGANISATION: &str = "";
const APPLICATION: &str = "backdrop";
const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_BACKGROUND: &str = "crackinjection";
pub const DEFAULT_FPS: u32 = 30;
const MAX_FPS: u32 = 120;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directories searched for `<key>.js` background sources.
    pub source_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key of the background shown at startup.
    pub background: String,
    pub fps: u32,
    pub export: ExportConfig,
    /// Settings tables keyed by background key.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, Settings>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND.to_string(),
            fps: DEFAULT_FPS,
            export: ExportConfig::default(),
            settings: BTreeMap::new(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION)
}

/// `<config dir>/config.toml`, if the platform has a home directory.
pub fn default_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Directory for logs and other generated files.
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

impl Config {
    /// Read the config at `path`, or the defaults when it doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Write the config to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self)?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, text).map_err(write_err)?;
        tracing::info!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Saved settings for `background`, empty if there are none.
    pub fn settings_for(&self, background: &str) -> Settings {
        self.settings.get(background).cloned().unwrap_or_default()
    }

    pub fn set_setting(&mut self, background: &str, key: &str, value: impl Into<SettingValue>) {
        self.settings
            .entry(background.to_string())
            .or_default()
            .set(key, value);
    }

    /// Time between frames, with the rate clamped to `1..=120`.
    pub fn frame_interval(&self) -> Duration {
        let fps = self.fps.clamp(1, MAX_FPS);
        Duration::from_secs_f64(1.0 / f64::from(fps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.background, "crackinjection");
        assert_eq!(config.fps, 30);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config {
            background: "snow".to_string(),
            fps: 60,
            ..Config::default()
        };
        config.export.source_dirs.push(PathBuf::from("/srv/backgrounds"));
        config.set_setting("snow", "flakeCount", 250.0);
        config.set_setting("crackinjection", "crackColor", "#ff8800");
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.settings_for("snow").count("flakeCount", 0), 250);
        assert!(loaded.settings_for("ripple").is_empty());
    }

    #[test]
    fn test_partial_file_and_unknown_keys() {
        let config = Config::from_toml_str(
            r#"
            background = "dots"
            theme = "dark"

            [settings.dots]
            spacing = 32
            "#,
        )
        .unwrap();
        assert_eq!(config.background, "dots");
        assert_eq!(config.fps, DEFAULT_FPS);
        assert_eq!(config.settings_for("dots").number("spacing", 0.0), 32.0);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "fps = \"fast\"").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_frame_interval_clamps() {
        let mut config = Config::default();
        assert_eq!(config.frame_interval(), Duration::from_secs_f64(1.0 / 30.0));
        config.fps = 0;
        assert_eq!(config.frame_interval(), Duration::from_secs(1));
        config.fps = 1000;
        assert_eq!(config.frame_interval(), Duration::from_secs_f64(1.0 / 120.0));
    }
}
