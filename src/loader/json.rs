//! JSON bundle definitions.
//!
//! [`JsonBundleLoader`] walks a directory for `*.json` files. Each file holds either
//! a single bundle or an array of bundles:
//!
//! ```json
//! [
//!   { "bundle": "jquery", "assets": [{ "locations": { "webapp": "/js/jquery.js" } }] },
//!   { "bundle": "app", "dependencies": ["jquery"] }
//! ]
//! ```
//!
//! Files are read in path order, so a bundle defined twice in one directory is
//! taken from the file that sorts last.

use crate::bundle::BundleStorageUnit;
use crate::core::DandelionError;
use crate::loader::BundleLoader;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Content of one definition file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BundleFile {
    Many(Vec<BundleStorageUnit>),
    One(BundleStorageUnit),
}

impl BundleFile {
    fn into_units(self) -> Vec<BundleStorageUnit> {
        match self {
            BundleFile::Many(units) => units,
            BundleFile::One(unit) => vec![unit],
        }
    }
}

/// Loader reading bundle definitions from `*.json` files below a directory.
#[derive(Debug, Clone)]
pub struct JsonBundleLoader {
    name: String,
    location: PathBuf,
    vendor: bool,
}

impl JsonBundleLoader {
    /// Create a loader for the definitions below `location`.
    ///
    /// The loader is named `json:<location>`.
    pub fn new(location: impl Into<PathBuf>) -> Self {
        let location = location.into();
        Self {
            name: format!("json:{}", location.display()),
            location,
            vendor: false,
        }
    }

    /// Create a loader whose bundles are vendor bundles.
    ///
    /// The loader is named `vendor-json:<location>`.
    pub fn vendor(location: impl Into<PathBuf>) -> Self {
        let location = location.into();
        Self {
            name: format!("vendor-json:{}", location.display()),
            location,
            vendor: true,
        }
    }

    fn definition_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.location).follow_links(false).sort_by_file_name() {
            let entry = entry.with_context(|| {
                format!("Failed to read directory entry in: {}", self.location.display())
            })?;

            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }
}

/// Parse the bundles of one definition file.
///
/// # Errors
///
/// - Return [`DandelionError::BundleParseError`] if the content is not a bundle or an
///   array of bundles.
pub fn parse_bundles(content: &str, file: &Path) -> crate::core::Result<Vec<BundleStorageUnit>> {
    serde_json::from_str::<BundleFile>(content).map(BundleFile::into_units).map_err(|e| {
        DandelionError::BundleParseError {
            file: file.display().to_string(),
            reason: e.to_string(),
        }
    })
}

impl BundleLoader for JsonBundleLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_vendor(&self) -> bool {
        self.vendor
    }

    fn load_bundles(&self) -> Result<Vec<BundleStorageUnit>> {
        if !self.location.exists() {
            warn!("bundle location {} does not exist, skipping", self.location.display());
            return Ok(Vec::new());
        }

        let mut units = Vec::new();
        for file in self.definition_files()? {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read bundle definition {}", file.display()))?;
            let parsed = parse_bundles(&content, &file)?;
            debug!("{} bundle(s) read from {}", parsed.len(), file.display());
            units.extend(parsed);
        }

        Ok(units)
    }
}
