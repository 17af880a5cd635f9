//! Display the dependency tree of a bundle.

use crate::storage::{BundleStorage, BundleStorageContext};

use anyhow::Result;
use clap::Args;
use colored::Colorize;

/// Command to display a bundle's dependency tree.
///
/// Dependencies appear in declaration order. A bundle that already appeared
/// elsewhere in the tree is marked `(*)` and not expanded again; a dependency on
/// an unknown bundle is marked `(missing)`.
#[derive(Args, Debug)]
pub struct TreeCommand {
    /// Root bundle of the tree
    #[arg(value_name = "BUNDLE")]
    pub bundle: String,
}

impl TreeCommand {
    /// Print the tree of the requested bundle.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be built, or in strict mode if the
    /// bundle is unknown.
    pub fn execute(self, context: &BundleStorageContext) -> Result<()> {
        let storage = context.storage()?;
        let tree = self.render(&storage)?;

        if tree.is_empty() {
            eprintln!("{} Bundle '{}' is not registered", "⚠".yellow(), self.bundle);
        } else {
            print!("{tree}");
        }
        Ok(())
    }

    /// Render the tree, empty for an unknown bundle in lenient mode.
    ///
    /// # Errors
    ///
    /// Returns an error in strict mode if the bundle is unknown.
    pub fn render(&self, storage: &BundleStorage) -> Result<String> {
        // Surfaces the unknown-bundle error in strict mode
        storage.bundles_for(&self.bundle)?;
        Ok(storage.bundle_dag().to_tree_string(&self.bundle))
    }
}
