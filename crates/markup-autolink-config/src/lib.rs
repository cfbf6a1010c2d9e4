use markup_autolink_engine::{DetectorOptions, ReconcileOptions, ScanScope};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Engine options as stored on disk. Every field is optional in the file;
/// missing ones take the engine defaults.
///
/// ```toml
/// style_sync = true
/// scan_scope = "edited-blocks"
///
/// [detectors]
/// phone = false
/// min_phone_digits = 8
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub style_sync: bool,
    pub scan_scope: ScanScope,
    pub detectors: DetectorOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self::from(ReconcileOptions::default())
    }
}

impl From<ReconcileOptions> for Config {
    fn from(options: ReconcileOptions) -> Self {
        Self {
            style_sync: options.style_sync,
            scan_scope: options.scan_scope,
            detectors: options.detectors,
        }
    }
}

impl Config {
    /// Where [`Config::load`] looks, before tilde expansion.
    pub const DEFAULT_PATH: &'static str = "~/.config/markup-autolink/config.toml";

    /// Reads and parses `config_path`. A missing file is `Ok(None)` so callers
    /// can fall back to defaults.
    pub fn load_from_path(config_path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        let content = match std::fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::ConfigReadError {
                    config_path: config_path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    /// Writes the config as TOML, creating missing parent directories.
    pub fn save_to_path(&self, config_path: impl AsRef<Path>) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        let content = toml::to_string_pretty(self)?;
        if let Some(dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        std::fs::write(config_path, content)
            .with_context(|| format!("failed to write {}", config_path.display()))
    }

    pub fn config_path() -> PathBuf {
        PathBuf::from(shellexpand::tilde(Self::DEFAULT_PATH).into_owned())
    }

    /// Expands `~` and environment variables in a user-supplied path, such as
    /// a `--config` argument. Returns `None` if a variable is undefined.
    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        shellexpand::full(&path.to_string_lossy())
            .ok()
            .map(|expanded| PathBuf::from(expanded.into_owned()))
    }

    /// The reconciler options this configuration describes.
    pub fn options(&self) -> ReconcileOptions {
        ReconcileOptions {
            detectors: self.detectors.clone(),
            style_sync: self.style_sync,
            scan_scope: self.scan_scope,
        }
    }
}
