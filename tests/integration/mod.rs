//! Integration test suite for Dandelion
//!
//! End-to-end tests of the public API and the `dandelion` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **resolution**: resolution order and registration scenarios on `BundleStorage`
//! - **context**: building storage from JSON bundle directories through `BundleStorageContext`
//! - **cli**: the `dandelion` binary

mod cli;
mod context;
mod resolution;
