//! Dandelion - web asset bundles and their dependency graph
//!
//! A __bundle__ is a named group of web assets (scripts and stylesheets) that may
//! depend on other bundles. Dandelion keeps all known bundles in a directed acyclic
//! graph and answers one question: which bundles, in which order, are needed to
//! render a given bundle. Every dependency comes before the bundles that need it,
//! each bundle appears once, and the requested bundle comes last.
//!
//! # Architecture Overview
//!
//! ```text
//! loaders ──► post-processing ──► BundleStorage::store_bundles ──► BundleDag
//!                                                                     │
//!                         rendering ◄── bundles_for / assets_for ◄────┘
//! ```
//!
//! - [`loader`] - [`BundleLoader`](loader::BundleLoader) implementations producing
//!   bundle definitions (JSON files, in-memory)
//! - [`storage`] - [`BundleStorage`](storage::BundleStorage), the validated registry,
//!   its [`BundleDag`](storage::BundleDag), and the
//!   [`BundleStorageContext`](storage::BundleStorageContext) that builds it lazily
//! - [`bundle`] - [`BundleStorageUnit`](bundle::BundleStorageUnit), the value stored
//!   at each vertex
//! - [`core`] - assets, errors and the user-facing error reporting
//! - [`config`] - the `dandelion.toml` configuration
//! - [`cli`] - the `dandelion` binary
//!
//! # Guarantees
//!
//! - Names are case-insensitive.
//! - Registering a bundle under an existing name replaces it; nothing is merged.
//! - Registration is all-or-nothing: a call that would introduce a cycle fails
//!   with [`DandelionError::CycleDetected`](core::DandelionError::CycleDetected)
//!   and leaves the storage unchanged.
//! - Resolution is a pure read and repeatable.
//!
//! # Example
//!
//! ```rust
//! use dandelion::bundle::BundleStorageUnit;
//! use dandelion::storage::BundleStorage;
//!
//! let mut storage = BundleStorage::new();
//! storage.store_bundles([
//!     BundleStorageUnit::new("jquery"),
//!     BundleStorageUnit::new("forms").with_dependencies(["jquery"]),
//!     BundleStorageUnit::new("app").with_dependencies(["forms", "jquery"]),
//! ])?;
//!
//! let names: Vec<_> = storage.bundles_for("app")?.iter().map(|unit| unit.name.as_str()).collect();
//! assert_eq!(names, ["jquery", "forms", "app"]);
//! # Ok::<(), dandelion::core::DandelionError>(())
//! ```

pub mod bundle;
pub mod cli;
pub mod config;
pub mod core;
pub mod loader;
pub mod storage;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
