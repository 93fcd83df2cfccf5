//! Host configuration loaded from `config.toml`.
//!
//! Every section is optional; missing keys fall back to their defaults.
//!
//! ```toml
//! [search]
//! policy = "fallback"
//! timeout_seconds = 8
//!
//! [assets]
//! ttl_days = 7
//!
//! [ambient]
//! interval_ms = 800
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use appicon_search::{Region, SearchConfig};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Top-level configuration for the host application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Catalog search settings, passed through to [`appicon_search`].
    pub search: SearchConfig,
    /// Ambient icon pool settings.
    pub assets: AssetConfig,
    /// Icon download settings.
    pub download: DownloadConfig,
    /// Falling-icon backdrop settings.
    pub ambient: AmbientConfig,
}

/// Ambient icon pool (the warmed catalog of popular app icons).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Maintain the pool at all. When `false`, warming is skipped and the
    /// pool stays empty.
    pub enabled: bool,
    /// Age in days after which persisted icon URLs are re-fetched.
    pub ttl_days: u32,
    /// Storefront region the catalog names are resolved in.
    pub region: Region,
    /// Directory for the persisted slots. `None` uses the platform cache dir.
    pub dir: Option<PathBuf>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_days: 7,
            region: Region::Us,
            dir: None,
        }
    }
}

impl AssetConfig {
    /// Freshness window as a [`chrono::Duration`].
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.ttl_days))
    }

    /// Directory holding the persisted slots.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(crate::app_dirs::asset_cache_dir)
    }
}

/// Where and how downloaded icons are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Destination directory. `None` uses the platform download dir.
    pub dir: Option<PathBuf>,
    /// Appended to the sanitized app name to form the file name.
    pub suffix: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dir: None,
            suffix: "-icon.png".to_owned(),
        }
    }
}

impl DownloadConfig {
    /// Destination directory.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(crate::app_dirs::downloads_dir)
    }
}

/// Falling-icon backdrop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    /// Milliseconds between two spawned icons.
    pub interval_ms: u64,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self { interval_ms: 800 }
    }
}

impl AmbientConfig {
    /// Spawn interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise return the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::from_file(path) {
            Ok(config) => Ok(config),
            Err(AppError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.search
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;
        if self.assets.ttl_days == 0 {
            return Err(AppError::Config("assets.ttl_days must be at least 1".into()));
        }
        if self.ambient.interval_ms == 0 {
            return Err(AppError::Config(
                "ambient.interval_ms must be greater than 0".into(),
            ));
        }
        if self.download.suffix.contains(['/', '\\']) {
            return Err(AppError::Config(
                "download.suffix must not contain path separators".into(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> PathBuf {
        crate::app_dirs::config_file()
    }
}
