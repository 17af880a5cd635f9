//! Asset descriptors attached to bundles.
//!
//! The bundle graph never interprets assets; they are the payload carried by each
//! vertex and handed to the rendering layer in resolution order. The only logic
//! here is the small amount of inference done while post-processing loaded
//! bundles: a missing name or type is derived from the asset's first location.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of web asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// JavaScript file, rendered as a `<script>` element
    Js,

    /// Stylesheet, rendered as a `<link>` element
    Css,
}

impl AssetType {
    /// Infer the asset type from a location's file extension.
    ///
    /// Query strings and fragments are ignored, the comparison is case-insensitive.
    #[must_use]
    pub fn from_location(location: &str) -> Option<Self> {
        let file_name = file_name(location);
        let (_, extension) = file_name.rsplit_once('.')?;
        extension.parse().ok()
    }

    /// Default placement of this asset type in the HTML document.
    #[must_use]
    pub const fn default_dom_position(&self) -> AssetDomPosition {
        match self {
            AssetType::Js => AssetDomPosition::Body,
            AssetType::Css => AssetDomPosition::Head,
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetType::Js => write!(f, "js"),
            AssetType::Css => write!(f, "css"),
        }
    }
}

impl std::str::FromStr for AssetType {
    type Err = crate::core::DandelionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "js" | "javascript" => Ok(AssetType::Js),
            "css" | "stylesheet" => Ok(AssetType::Css),
            _ => Err(crate::core::DandelionError::Other {
                message: format!("Unknown asset type: {s}"),
            }),
        }
    }
}

/// Placement of an asset in the rendered HTML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetDomPosition {
    /// Inside `<head>`
    Head,

    /// At the end of `<body>`
    Body,
}

/// A single web asset belonging to a bundle.
///
/// Two assets are considered the same asset when their name and type match, see
/// [`Asset::is_same_asset`]. Bundles use this to keep their asset list free of
/// duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset name, inferred from the first location when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Asset version, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Asset type, inferred from the first location's extension when absent.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<AssetType>,

    /// Placement in the HTML document, defaults per asset type.
    #[serde(default, rename = "dom", skip_serializing_if = "Option::is_none")]
    pub dom_position: Option<AssetDomPosition>,

    /// Locations keyed by location kind, e.g. `webapp` or `cdn`.
    #[serde(default)]
    pub locations: BTreeMap<String, String>,

    /// Owning bundle, filled in during post-processing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<String>,

    /// Loader that produced the owning bundle, filled in during post-processing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_loader_origin: Option<String>,

    /// Whether the owning bundle came from a vendor loader.
    #[serde(default)]
    pub vendor: bool,
}

impl Asset {
    /// Create an asset with an explicit name and type.
    pub fn new(name: impl Into<String>, asset_type: AssetType) -> Self {
        Self {
            name: Some(name.into()),
            asset_type: Some(asset_type),
            ..Self::default()
        }
    }

    /// Add a location under the given location key.
    #[must_use]
    pub fn with_location(mut self, key: impl Into<String>, location: impl Into<String>) -> Self {
        self.locations.insert(key.into(), location.into());
        self
    }

    /// First location in location-key order.
    #[must_use]
    pub fn first_location(&self) -> Option<&str> {
        self.locations.values().next().map(String::as_str)
    }

    /// Name derived from the first location: its file name without extension.
    #[must_use]
    pub fn inferred_name(&self) -> Option<String> {
        let file_name = file_name(self.first_location()?);
        let stem = file_name.rsplit_once('.').map_or(file_name, |(stem, _)| stem);
        (!stem.is_empty()).then(|| stem.to_string())
    }

    /// Type derived from the first location's file extension.
    #[must_use]
    pub fn inferred_type(&self) -> Option<AssetType> {
        AssetType::from_location(self.first_location()?)
    }

    /// Effective placement: the declared one, or the type's default.
    #[must_use]
    pub fn effective_dom_position(&self) -> Option<AssetDomPosition> {
        self.dom_position.or_else(|| self.asset_type.map(|t| t.default_dom_position()))
    }

    /// Whether `other` denotes the same asset (same name and type).
    #[must_use]
    pub fn is_same_asset(&self, other: &Asset) -> bool {
        self.name == other.name && self.asset_type == other.asset_type
    }
}

/// Last path segment of a location, without query string or fragment.
fn file_name(location: &str) -> &str {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    let path = &location[..end];
    path.rsplit('/').next().unwrap_or(path)
}
