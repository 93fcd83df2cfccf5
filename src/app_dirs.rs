//! Centralized application directory paths for AppIcon.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! # Directory Layout
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Data | `~/Library/Application Support/appicon/` | `~/.local/share/appicon/` |
//! | Config | `~/Library/Application Support/appicon/` | `~/.config/appicon/` |
//! | Cache | `~/Library/Caches/appicon/` | `~/.cache/appicon/` |
//!
//! # Environment Overrides
//!
//! - `APPICON_DATA_DIR`: overrides [`data_dir`]
//! - `APPICON_CONFIG_DIR`: overrides [`config_dir`]
//! - `APPICON_CACHE_DIR`: overrides [`cache_dir`]

use std::path::PathBuf;

/// Application data root directory.
///
/// Resolves to `dirs::data_dir()/appicon/` by default. Override with
/// the `APPICON_DATA_DIR` environment variable.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("APPICON_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("appicon"))
        .unwrap_or_else(|| PathBuf::from("/tmp/appicon-data"))
}

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/appicon/` by default. Override with
/// the `APPICON_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("APPICON_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("appicon"))
        .unwrap_or_else(|| PathBuf::from("/tmp/appicon-config"))
}

/// Application cache directory.
///
/// Holds the persisted asset cache slots. Resolves to
/// `dirs::cache_dir()/appicon/` by default. Override with the
/// `APPICON_CACHE_DIR` environment variable.
#[must_use]
pub fn cache_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("APPICON_CACHE_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::cache_dir()
        .map(|d| d.join("appicon"))
        .unwrap_or_else(|| PathBuf::from("/tmp/appicon-cache"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Asset cache slot directory (`cache_dir()/assets/`).
#[must_use]
pub fn asset_cache_dir() -> PathBuf {
    cache_dir().join("assets")
}

/// Default destination for saved icons.
///
/// The user's download directory when the platform has one, otherwise
/// `data_dir()/icons/`.
#[must_use]
pub fn downloads_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| data_dir().join("icons"))
}
