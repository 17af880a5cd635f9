//! Storage lifecycle.
//!
//! [`BundleStorageContext`] owns the registered loaders and the storage built from
//! them. The host application constructs it once and shares it; nothing here is
//! global. The storage is built on first access and handed out as an immutable
//! [`Arc`] snapshot, so resolution never waits on a lock held by a reader.
//!
//! In development mode every access rebuilds the storage from the loaders, which
//! picks up edited bundle definitions without a restart. Readers holding an older
//! snapshot keep using it.

use crate::config::DandelionConfig;
use crate::loader::{BundleLoader, JsonBundleLoader};
use crate::storage::{BundleStorage, Strictness};

use anyhow::{Context, Result};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Owner of the bundle loaders and of the storage built from them.
pub struct BundleStorageContext {
    loaders: Vec<Box<dyn BundleLoader>>,
    strictness: Strictness,
    dev_mode: bool,
    storage: Mutex<Option<Arc<BundleStorage>>>,
}

impl BundleStorageContext {
    /// Create a context without loaders.
    pub fn new(strictness: Strictness) -> Self {
        Self {
            loaders: Vec::new(),
            strictness,
            dev_mode: false,
            storage: Mutex::new(None),
        }
    }

    /// Create a context with the JSON loaders described by `config`.
    ///
    /// Vendor locations are registered before regular locations.
    pub fn from_config(config: &DandelionConfig) -> Self {
        let strictness = if config.strict {
            Strictness::Strict
        } else {
            Strictness::Lenient
        };

        let mut context = Self::new(strictness).with_dev_mode(config.dev_mode);
        for location in config.vendor_bundle_paths() {
            context = context.with_loader(JsonBundleLoader::vendor(location));
        }
        for location in config.bundle_paths() {
            context = context.with_loader(JsonBundleLoader::new(location));
        }
        context
    }

    /// Register a loader after all loaders registered so far.
    #[must_use]
    pub fn with_loader(mut self, loader: impl BundleLoader + 'static) -> Self {
        self.loaders.push(Box::new(loader));
        self
    }

    /// Enable or disable rebuilding on every access.
    #[must_use]
    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    /// Names of the registered loaders, in registration order.
    pub fn loader_names(&self) -> Vec<&str> {
        self.loaders.iter().map(|loader| loader.name()).collect()
    }

    /// Whether a storage has been built and not reset since.
    pub fn is_initialized(&self) -> bool {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Build the storage now, replacing any storage built before.
    ///
    /// # Errors
    ///
    /// Fails if a loader fails, an asset cannot be completed, or the combined
    /// bundles form a cycle (or, in strict mode, have dangling dependencies). The
    /// previously built storage, if any, stays in place.
    pub fn init(&self) -> Result<Arc<BundleStorage>> {
        let mut slot = self.storage.lock().unwrap_or_else(PoisonError::into_inner);
        let storage = Arc::new(self.build()?);
        *slot = Some(Arc::clone(&storage));
        Ok(storage)
    }

    /// Current storage, building it on first access.
    ///
    /// In development mode the storage is rebuilt on every call. Concurrent first
    /// accesses build only once.
    ///
    /// # Errors
    ///
    /// Same as [`init`](Self::init).
    pub fn storage(&self) -> Result<Arc<BundleStorage>> {
        let mut slot = self.storage.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.dev_mode
            && let Some(storage) = slot.as_ref()
        {
            return Ok(Arc::clone(storage));
        }

        let storage = Arc::new(self.build()?);
        *slot = Some(Arc::clone(&storage));
        Ok(storage)
    }

    /// Drop the built storage; the next access rebuilds it.
    pub fn reset(&self) {
        debug!("reset bundle storage");
        *self.storage.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    #[instrument(skip(self), level = "debug")]
    fn build(&self) -> Result<BundleStorage> {
        let started = Instant::now();
        let mut units = Vec::new();

        for loader in &self.loaders {
            let mut loaded = loader
                .load_bundles()
                .with_context(|| format!("Failed to load bundles with loader {}", loader.name()))?;
            for unit in &mut loaded {
                unit.post_process(loader.name(), loader.is_vendor())?;
            }
            debug!("loader {} produced {} bundle(s)", loader.name(), loaded.len());
            units.extend(loaded);
        }

        let mut storage = BundleStorage::with_strictness(self.strictness);
        storage.store_bundles(units).context("Failed to store bundles")?;

        info!(
            "bundle storage built from {} loader(s) in {:?}",
            self.loaders.len(),
            started.elapsed()
        );
        Ok(storage)
    }
}

impl std::fmt::Debug for BundleStorageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleStorageContext")
            .field("loaders", &self.loader_names())
            .field("strictness", &self.strictness)
            .field("dev_mode", &self.dev_mode)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
