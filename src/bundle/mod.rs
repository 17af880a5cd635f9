//! Bundle definitions.
//!
//! A __bundle__ is a named group of assets plus the ordered list of other bundles
//! it depends on. [`BundleStorageUnit`] is the value stored at each vertex of the
//! [`BundleDag`](crate::storage::BundleDag).
//!
//! # JSON Layout
//!
//! Bundle loaders read units from JSON documents shaped like this:
//!
//! ```json
//! {
//!   "bundle": "app",
//!   "dependencies": ["jquery"],
//!   "assets": [
//!     { "name": "app", "type": "js", "locations": { "webapp": "/js/app.js" } }
//!   ]
//! }
//! ```
//!
//! Names are case-insensitive. Storage lowercases the bundle name and every
//! dependency name on insertion, see [`BundleStorageUnit::normalized`].

use crate::core::{Asset, DandelionError, Result};

use serde::{Deserialize, Serialize};

/// A named bundle: dependency names, assets, and provenance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleStorageUnit {
    /// Bundle name, unique within a storage once lowercased.
    #[serde(rename = "bundle", alias = "name")]
    pub name: String,

    /// Names of the bundles this bundle depends on, in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,

    /// Assets of the bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<Vec<Asset>>,

    /// Name of the loader that produced this bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_loader_origin: Option<String>,

    /// Whether this bundle was produced by a vendor loader.
    #[serde(default)]
    pub vendor: bool,
}

impl BundleStorageUnit {
    /// Create an empty bundle.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the dependency list, replacing any previous one.
    #[must_use]
    pub fn with_dependencies(
        mut self,
        dependencies: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.dependencies = Some(dependencies.into_iter().map(Into::into).collect());
        self
    }

    /// Add an asset, see [`add_asset`](Self::add_asset).
    #[must_use]
    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.add_asset(asset);
        self
    }

    /// Add an asset, replacing an existing asset with the same name and type.
    pub fn add_asset(&mut self, asset: Asset) {
        let assets = self.assets.get_or_insert_with(Vec::new);
        match assets.iter_mut().find(|existing| existing.is_same_asset(&asset)) {
            Some(existing) => *existing = asset,
            None => assets.push(asset),
        }
    }

    /// Declared dependency names, empty when absent.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        self.dependencies.as_deref().unwrap_or_default()
    }

    /// Assets of the bundle, empty when absent.
    #[must_use]
    pub fn assets(&self) -> &[Asset] {
        self.assets.as_deref().unwrap_or_default()
    }

    /// Whether the dependency list names `name`, ignoring case.
    #[must_use]
    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies().iter().any(|dependency| dependency.eq_ignore_ascii_case(name))
    }

    /// Lowercase the bundle name and all dependency names.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.name = normalize_name(&self.name);
        if let Some(dependencies) = self.dependencies.as_mut() {
            for dependency in dependencies.iter_mut() {
                *dependency = normalize_name(dependency);
            }
        }
        self
    }

    /// Stamp provenance onto the bundle and complete its assets.
    ///
    /// Sets the loader origin and vendor flag on the bundle, then copies the bundle
    /// name, origin and vendor flag onto every asset. A missing asset name is
    /// inferred from the first location's file name, a missing type from its
    /// extension.
    ///
    /// # Errors
    ///
    /// - Return [`DandelionError::InvalidAsset`] if an asset has no type and none can
    ///   be inferred.
    pub fn post_process(&mut self, origin: &str, vendor: bool) -> Result<()> {
        self.bundle_loader_origin = Some(origin.to_string());
        self.vendor = vendor;

        let bundle_name = normalize_name(&self.name);
        for asset in self.assets.iter_mut().flatten() {
            if asset.name.is_none() {
                asset.name = asset.inferred_name();
            }
            if asset.asset_type.is_none() {
                asset.asset_type = asset.inferred_type();
            }
            if asset.asset_type.is_none() {
                return Err(DandelionError::InvalidAsset {
                    bundle: bundle_name,
                    reason: format!(
                        "the type of asset '{}' cannot be deduced from its locations",
                        asset.name.as_deref().unwrap_or("<unnamed>")
                    ),
                });
            }

            asset.bundle = Some(bundle_name.clone());
            asset.bundle_loader_origin = Some(origin.to_string());
            asset.vendor = vendor;
        }

        Ok(())
    }
}

/// Canonical form of a bundle name.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
