//! Bundle storage.
//!
//! [`BundleStorage`] owns a [`BundleDag`] and is the entry point used by the rest
//! of the crate: loaders register bundles through
//! [`store_bundles`](BundleStorage::store_bundles), the rendering side asks for
//! [`bundles_for`](BundleStorage::bundles_for) a requested bundle.
//!
//! # Registration
//!
//! Every call to `store_bundles` is all-or-nothing. Units are inserted into a
//! working copy of the graph, re-registered names replace the previous definition
//! outright, and the whole graph is validated before the copy replaces the live
//! graph. A cycle anywhere fails the call and leaves the storage untouched.
//!
//! # Strictness
//!
//! With [`Strictness::Lenient`] (the default) dependencies on unknown bundles are
//! ignored and an unknown bundle resolves to nothing. [`Strictness::Strict`] turns
//! both into errors.
//!
//! # See Also
//!
//! - [`context`] for lazy construction and rebuilding from loaders

pub mod context;
pub mod dag;

pub use context::BundleStorageContext;
pub use dag::BundleDag;

use crate::bundle::{BundleStorageUnit, normalize_name};
use crate::core::{Asset, DandelionError, Result};

use serde::{Deserialize, Serialize};
use strsim::levenshtein;
use tracing::{debug, info, warn};

/// Maximum edit distance for "did you mean" suggestions, as a percentage of the
/// requested name's length.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// How unresolvable names are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Unknown bundles resolve to nothing, dangling dependencies are skipped.
    #[default]
    Lenient,

    /// Unknown bundles and dangling dependencies are errors.
    Strict,
}

/// Registry of bundles with dependency-ordered resolution.
#[derive(Debug, Clone, Default)]
pub struct BundleStorage {
    dag: BundleDag,
    strictness: Strictness,
}

impl BundleStorage {
    /// Create an empty, lenient storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty storage with the given strictness.
    pub fn with_strictness(strictness: Strictness) -> Self {
        Self {
            dag: BundleDag::new(),
            strictness,
        }
    }

    /// Current strictness.
    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Register bundles, replacing bundles that already exist under the same name.
    ///
    /// Units may come in any order and may repeat a name; the last one wins. The
    /// graph is validated once all units are inserted.
    ///
    /// # Errors
    ///
    /// - Return [`DandelionError::CycleDetected`] if the resulting graph has a cycle.
    /// - Return [`DandelionError::DanglingDependency`] in strict mode if a bundle
    ///   depends on a bundle that is not registered.
    ///
    /// On error the storage keeps its previous contents.
    pub fn store_bundles(&mut self, units: impl IntoIterator<Item = BundleStorageUnit>) -> Result<()> {
        let mut working = self.dag.clone();
        let mut stored = 0usize;

        for unit in units {
            if let Some(previous) = working.add_vertex(unit)
                && let Some(current) = working.vertex(&previous.name)
            {
                let from = current.bundle_loader_origin.as_deref().unwrap_or("<unknown>");
                let replaced = previous.bundle_loader_origin.as_deref().unwrap_or("<unknown>");
                if loaders_collide(&previous, current) {
                    warn!("bundle '{}' from {from} overrides the definition from {replaced}", previous.name);
                } else {
                    debug!("bundle '{}' from {from} replaces the definition from {replaced}", previous.name);
                }
            }
            stored += 1;
        }

        working.detect_cycles()?;

        let dangling = working.dangling_dependencies();
        if let Some((bundle, dependency)) = dangling.first() {
            match self.strictness {
                Strictness::Strict => {
                    return Err(DandelionError::DanglingDependency {
                        bundle: bundle.to_string(),
                        dependency: dependency.to_string(),
                    });
                }
                Strictness::Lenient => {
                    for (bundle, dependency) in &dangling {
                        debug!("bundle '{bundle}' depends on unknown bundle '{dependency}'");
                    }
                }
            }
        }

        info!("stored {stored} bundle(s), {} registered in total", working.node_count());
        self.dag = working;
        Ok(())
    }

    /// Bundles needed to render `name`, dependencies first and `name` last.
    ///
    /// # Errors
    ///
    /// - Return [`DandelionError::UnknownBundle`] in strict mode if `name` is not
    ///   registered. Lenient mode returns an empty list instead.
    pub fn bundles_for(&self, name: &str) -> Result<Vec<&BundleStorageUnit>> {
        self.bundles_for_all([name])
    }

    /// Bundles needed to render all of `names`, see [`BundleDag::bundles_for_all`].
    ///
    /// # Errors
    ///
    /// - Return [`DandelionError::UnknownBundle`] in strict mode for the first name
    ///   that is not registered.
    pub fn bundles_for_all(
        &self,
        names: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Vec<&BundleStorageUnit>> {
        let names: Vec<String> = names.into_iter().map(|name| normalize_name(name.as_ref())).collect();

        if self.strictness == Strictness::Strict
            && let Some(unknown) = names.iter().find(|name| !self.dag.contains(name))
        {
            return Err(DandelionError::UnknownBundle {
                name: unknown.clone(),
                suggestion: self.closest_name(unknown),
            });
        }

        Ok(self.dag.bundles_for_all(&names))
    }

    /// Assets of the bundles needed for `names`, in bundle resolution order.
    ///
    /// Bundles named in `excluded` are resolved as usual (their dependencies are
    /// kept) but contribute no assets.
    ///
    /// # Errors
    ///
    /// Same as [`bundles_for_all`](Self::bundles_for_all).
    pub fn assets_for(
        &self,
        names: impl IntoIterator<Item = impl AsRef<str>>,
        excluded: &[impl AsRef<str>],
    ) -> Result<Vec<&Asset>> {
        let excluded: Vec<String> = excluded.iter().map(|name| normalize_name(name.as_ref())).collect();

        Ok(self
            .bundles_for_all(names)?
            .into_iter()
            .filter(|unit| !excluded.contains(&unit.name))
            .flat_map(BundleStorageUnit::assets)
            .collect())
    }

    /// Read access to the underlying graph.
    pub fn bundle_dag(&self) -> &BundleDag {
        &self.dag
    }

    fn closest_name(&self, target: &str) -> Option<String> {
        self.dag
            .names()
            .map(|name| (name, levenshtein(target, name)))
            .filter(|(_, distance)| *distance <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .min_by_key(|(_, distance)| *distance)
            .map(|(name, _)| name.to_string())
    }
}

/// Whether replacing `previous` with `current` is a clash between two application
/// loaders. Vendor bundles are meant to be overridden, and a loader may redefine
/// its own bundles.
fn loaders_collide(previous: &BundleStorageUnit, current: &BundleStorageUnit) -> bool {
    !previous.vendor && !current.vendor && previous.bundle_loader_origin != current.bundle_loader_origin
}
