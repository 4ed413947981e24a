//! Configuration types for the remkit host.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{RemkitError, Result};
use crate::mutation::{AllowAll, SandboxPolicy, WritePolicy};
use crate::query::QueryLimits;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemkitConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Storage backend settings.
    pub store: StoreConfig,
    /// Write restrictions.
    pub policy: PolicyConfig,
    /// Result-size limits for reads.
    pub query: QueryConfig,
}

impl Default for RemkitConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            store: StoreConfig::default(),
            policy: PolicyConfig::default(),
            query: QueryConfig::default(),
        }
    }
}

/// Which backend holds reminders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Persistent JSON document on disk.
    #[default]
    File,
    /// In-memory store, lost on exit.
    Memory,
}

/// Storage backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Store document location. `None` uses [`crate::remkit_dirs::store_file`].
    pub path: Option<PathBuf>,
    /// Name of the list created when the store is empty.
    pub default_list_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File,
            path: None,
            default_list_name: "Reminders".to_owned(),
        }
    }
}

impl StoreConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(crate::remkit_dirs::store_file)
    }
}

/// Write policy configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// List names writes may target. Empty means unrestricted.
    pub allowed_lists: Vec<String>,
}

impl PolicyConfig {
    /// Build the write policy this section describes.
    pub fn build(&self) -> Arc<dyn WritePolicy> {
        if self.allowed_lists.iter().all(|s| s.trim().is_empty()) {
            Arc::new(AllowAll)
        } else {
            Arc::new(SandboxPolicy::new(self.allowed_lists.iter().cloned()))
        }
    }
}

/// Query limit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        let limits = QueryLimits::default();
        Self {
            default_limit: limits.default_limit,
            max_limit: limits.max_limit,
        }
    }
}

impl QueryConfig {
    pub fn limits(&self) -> QueryLimits {
        QueryLimits {
            default_limit: self.default_limit,
            max_limit: self.max_limit,
        }
    }
}

impl RemkitConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails [`RemkitConfig::validate`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            RemkitError::Config(format!("invalid config {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| RemkitError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `<config_dir>/remkit/config.toml`.
    pub fn default_config_path() -> PathBuf {
        crate::remkit_dirs::config_file()
    }

    /// Reject limits that cannot produce results.
    pub fn validate(&self) -> Result<()> {
        if self.query.max_limit == 0 {
            return Err(RemkitError::Config("query.max_limit must be at least 1".into()));
        }
        if self.query.default_limit == 0 {
            return Err(RemkitError::Config(
                "query.default_limit must be at least 1".into(),
            ));
        }
        if self.store.default_list_name.trim().is_empty() {
            return Err(RemkitError::Config(
                "store.default_list_name cannot be empty".into(),
            ));
        }
        Ok(())
    }
}
