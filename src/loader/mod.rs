//! Bundle loaders.
//!
//! A [`BundleLoader`] produces [`BundleStorageUnit`] values from some source. The
//! storage context runs its loaders in registration order, so a bundle defined by
//! a later loader overrides a bundle with the same name from an earlier one. Vendor
//! loaders are registered first for that reason: application bundles may redefine
//! vendor bundles, never the other way around.
//!
//! Loaders are registered explicitly on a
//! [`BundleStorageContext`](crate::storage::BundleStorageContext); there is no
//! discovery at runtime.
//!
//! # Available Loaders
//!
//! - [`JsonBundleLoader`] - reads `*.json` bundle definitions from a directory
//! - [`StaticBundleLoader`] - hands out bundles built in code

pub mod json;

pub use json::JsonBundleLoader;

use crate::bundle::BundleStorageUnit;

use anyhow::Result;

/// Source of bundle definitions.
pub trait BundleLoader: Send + Sync {
    /// Name recorded as the origin of every bundle this loader produces.
    fn name(&self) -> &str;

    /// Whether the bundles of this loader are vendor bundles.
    fn is_vendor(&self) -> bool {
        false
    }

    /// Load all bundle definitions.
    ///
    /// Called once per storage build, so in development mode on every access.
    fn load_bundles(&self) -> Result<Vec<BundleStorageUnit>>;
}

/// Loader over a fixed set of bundles built in code.
#[derive(Debug, Clone, Default)]
pub struct StaticBundleLoader {
    name: String,
    vendor: bool,
    bundles: Vec<BundleStorageUnit>,
}

impl StaticBundleLoader {
    /// Create a loader handing out `bundles`.
    pub fn new(name: impl Into<String>, bundles: impl IntoIterator<Item = BundleStorageUnit>) -> Self {
        Self {
            name: name.into(),
            vendor: false,
            bundles: bundles.into_iter().collect(),
        }
    }

    /// Mark the bundles of this loader as vendor bundles.
    #[must_use]
    pub fn vendor(mut self) -> Self {
        self.vendor = true;
        self
    }
}

impl BundleLoader for StaticBundleLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_vendor(&self) -> bool {
        self.vendor
    }

    fn load_bundles(&self) -> Result<Vec<BundleStorageUnit>> {
        Ok(self.bundles.clone())
    }
}
