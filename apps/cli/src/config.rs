//! Runner settings file support.
//!
//! Precedence, highest first:
//! 1. CLI arguments (handled by clap)
//! 2. Environment variables (`TRAINBOX_ML_ROOT`, `TRAINBOX_TRAINER`)
//! 3. Settings file (`--settings PATH`, else `./.trainboxrc`)
//! 4. Defaults

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ML_ROOT_ENV: &str = "TRAINBOX_ML_ROOT";
pub const TRAINER_ENV: &str = "TRAINBOX_TRAINER";

/// Runner settings as read from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerSettings {
    /// Root of the conventional input/model layout
    #[serde(default)]
    pub ml_root: Option<PathBuf>,

    /// Default trainer id
    #[serde(default)]
    pub trainer: Option<String>,

    /// Dataset field delimiter
    #[serde(default)]
    pub delimiter: Option<char>,

    /// Log level
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Settings loading errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file not found.
    #[error("Settings file not found: {0}")]
    NotFound(String),

    /// Failed to read settings file.
    #[error("Failed to read settings file: {0}")]
    ReadError(String),

    /// Failed to parse settings file.
    #[error("Failed to parse settings file: {0}")]
    ParseError(String),

    /// Invalid settings value.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

impl RunnerSettings {
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            return Err(SettingsError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::ReadError(format!("{}: {}", path.display(), e)))?;

        let settings: Self = toml::from_str(&content)
            .map_err(|e| SettingsError::ParseError(format!("{}: {}", path.display(), e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn default_local_path() -> PathBuf {
        PathBuf::from(".trainboxrc")
    }

    /// Load `explicit` if given (it must exist), else the local file when
    /// present, else defaults. Environment overrides are applied last.
    pub fn discover(explicit: Option<&Path>) -> SettingsResult<Self> {
        let mut settings = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => {
                let local = Self::default_local_path();
                if local.exists() { Self::load_from_file(&local)? } else { Self::default() }
            }
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Override fields from environment variables, looked up through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(root) = lookup(ML_ROOT_ENV).filter(|v| !v.is_empty()) {
            self.ml_root = Some(PathBuf::from(root));
        }
        if let Some(trainer) = lookup(TRAINER_ENV).filter(|v| !v.is_empty()) {
            self.trainer = Some(trainer);
        }
    }

    fn validate(&self) -> SettingsResult<()> {
        if let Some(delimiter) = self.delimiter {
            delimiter_byte(delimiter)?;
        }
        Ok(())
    }
}

/// Datasets are read byte-wise, so the delimiter must be a single ASCII character.
pub fn delimiter_byte(delimiter: char) -> SettingsResult<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| SettingsError::InvalidValue(format!("delimiter must be an ASCII character, got {delimiter:?}")))
}
