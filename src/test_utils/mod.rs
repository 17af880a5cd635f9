//! Test utilities shared by unit and integration tests.
//!
//! Available to the crate's own tests and, through the `test-utils` feature, to
//! the integration tests.

use crate::bundle::BundleStorageUnit;
use crate::storage::BundleStorage;

use std::path::Path;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Target of every event this crate emits.
const LOG_TARGET: &str = env!("CARGO_CRATE_NAME");

static TEST_SUBSCRIBER: Once = Once::new();

/// Route this crate's tracing output to the test harness.
///
/// `RUST_LOG` wins when it is set and valid. Otherwise `level` enables the
/// `dandelion` target alone at that level. With neither, nothing is installed.
/// Only the first call has an effect.
///
/// ```bash
/// RUST_LOG=dandelion::storage=trace cargo test --features test-utils
/// ```
pub fn init_test_logging(level: Option<Level>) {
    TEST_SUBSCRIBER.call_once(|| {
        let filter = match (EnvFilter::try_from_default_env(), level) {
            (Ok(filter), _) => filter,
            (Err(_), Some(level)) => EnvFilter::new(crate_directive(level)),
            (Err(_), None) => return,
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .compact()
            .try_init();
    });
}

fn crate_directive(level: Level) -> String {
    format!("{LOG_TARGET}={}", level.as_str().to_lowercase())
}

/// Bundle named `name` depending on `dependencies`, without assets.
pub fn bundle(name: &str, dependencies: &[&str]) -> BundleStorageUnit {
    BundleStorageUnit::new(name).with_dependencies(dependencies.iter().copied())
}

/// Lenient storage holding `bundles`.
///
/// # Panics
///
/// Panics if the bundles cannot be stored.
pub fn storage_with(bundles: &[(&str, &[&str])]) -> BundleStorage {
    let mut storage = BundleStorage::new();
    storage
        .store_bundles(bundles.iter().map(|(name, dependencies)| bundle(name, dependencies)))
        .expect("test bundles should store");
    storage
}

/// Names of resolved bundles, in order.
pub fn names(units: Vec<&BundleStorageUnit>) -> Vec<&str> {
    units.into_iter().map(|unit| unit.name.as_str()).collect()
}

/// Write a bundle definition file below `dir`, creating parent directories.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_bundle_file(dir: &Path, file: &str, content: &str) {
    let path = dir.join(file);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("bundle directory should be creatable");
    }
    std::fs::write(&path, content).expect("bundle file should be writable");
}
