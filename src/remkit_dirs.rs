//! Centralized filesystem paths for remkit.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Data | `~/Library/Application Support/remkit/` | `~/.local/share/remkit/` |
//! | Config | `~/Library/Application Support/remkit/` | `~/.config/remkit/` |
//!
//! # Environment Overrides
//!
//! - `REMKIT_DATA_DIR` overrides [`data_dir`]
//! - `REMKIT_CONFIG_DIR` overrides [`config_dir`]

use std::path::PathBuf;

/// Application data root, home of the reminder store file.
///
/// Resolves to `dirs::data_dir()/remkit/` by default. Override with
/// the `REMKIT_DATA_DIR` environment variable.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("REMKIT_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("remkit"))
        .unwrap_or_else(|| PathBuf::from("/tmp/remkit-data"))
}

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/remkit/` by default. Override with
/// the `REMKIT_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("REMKIT_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("remkit"))
        .unwrap_or_else(|| PathBuf::from("/tmp/remkit-config"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Default reminder store path (`data_dir()/reminders.json`).
#[must_use]
pub fn store_file() -> PathBuf {
    data_dir().join("reminders.json")
}
