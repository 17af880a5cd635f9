//! Configuration for bundle loading.
//!
//! Dandelion reads a single TOML file describing where bundle definitions live and
//! how strictly the storage treats unresolvable names:
//!
//! ```toml
//! # Directories scanned for *.json bundle definitions
//! bundle_locations = ["bundles", "~/shared/bundles"]
//!
//! # Same, but the bundles are flagged as vendor bundles and loaded first
//! vendor_bundle_locations = ["$VENDOR_HOME/bundles"]
//!
//! # Fail on unknown bundles and dangling dependencies
//! strict = false
//!
//! # Rebuild the storage on every access
//! dev_mode = false
//! ```
//!
//! # Locating the File
//!
//! 1. The path given explicitly (the `--config` flag)
//! 2. The `DANDELION_CONFIG` environment variable
//! 3. `dandelion.toml` in the current directory
//!
//! If none of these exists the default configuration is used: no locations,
//! lenient, no development mode.
//!
//! # Locations
//!
//! `~` and `$VAR` references are expanded. Relative locations are resolved against
//! the directory holding the configuration file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "DANDELION_CONFIG";

/// Configuration file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "dandelion.toml";

/// Bundle loading configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DandelionConfig {
    /// Directories scanned for bundle definitions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bundle_locations: Vec<String>,

    /// Directories scanned for vendor bundle definitions.
    ///
    /// Vendor bundles are loaded before the bundles of `bundle_locations`, which
    /// may therefore redefine them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vendor_bundle_locations: Vec<String>,

    /// Treat unknown bundles and dangling dependencies as errors.
    #[serde(default)]
    pub strict: bool,

    /// Rebuild the storage on every access.
    #[serde(default)]
    pub dev_mode: bool,

    /// Directory relative locations are resolved against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl DandelionConfig {
    /// Load the configuration, see the [module documentation](self) for the lookup
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An explicitly given file does not exist
    /// - The file exists but cannot be read
    /// - The file contains invalid TOML or unknown value types
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let explicit = path.is_some();
        match config_path(path, std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from)) {
            Some(path) if path.exists() => Self::load_from(&path).await,
            Some(path) if explicit => Err(crate::core::DandelionError::ConfigNotFound {
                path: path.display().to_string(),
            }
            .into()),
            Some(path) => {
                debug!("no configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Load the configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf);

        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`DandelionError::TomlError`](crate::core::DandelionError::TomlError)
    /// if the text is not a valid configuration.
    pub fn from_toml_str(content: &str) -> crate::core::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Expanded bundle locations.
    pub fn bundle_paths(&self) -> Vec<PathBuf> {
        self.bundle_locations.iter().map(|location| self.expand(location)).collect()
    }

    /// Expanded vendor bundle locations.
    pub fn vendor_bundle_paths(&self) -> Vec<PathBuf> {
        self.vendor_bundle_locations.iter().map(|location| self.expand(location)).collect()
    }

    fn expand(&self, location: &str) -> PathBuf {
        // Unset variables are left in place rather than failing the whole config
        let expanded = shellexpand::full(location)
            .map_or_else(|_| PathBuf::from(location), |expanded| PathBuf::from(expanded.as_ref()));

        match &self.base_dir {
            Some(base) if expanded.is_relative() => base.join(expanded),
            _ => expanded,
        }
    }
}

/// Pick the configuration file: explicit path, then the environment variable, then
/// `dandelion.toml` in the current directory.
fn config_path(explicit: Option<PathBuf>, from_env: Option<PathBuf>) -> Option<PathBuf> {
    explicit
        .or(from_env)
        .or_else(|| std::env::current_dir().ok().map(|dir| dir.join(DEFAULT_CONFIG_FILE)))
}
