//! Core types and error handling for Dandelion
//!
//! This module holds the pieces every other module depends on:
//!
//! - [`error`] - [`DandelionError`], [`ErrorContext`] and [`user_friendly_error`]
//! - [`asset`] - [`Asset`] descriptors carried as bundle payload
//!
//! Graph operations return [`Result`], which fails with a typed [`DandelionError`].
//! The loader, configuration and CLI layers use `anyhow::Result` and attach
//! context; [`user_friendly_error`] finds the typed error again anywhere in the
//! chain when the binary reports a failure.

pub mod asset;
pub mod error;

pub use asset::{Asset, AssetDomPosition, AssetType};
pub use error::{DandelionError, ErrorContext, Result, user_friendly_error};
