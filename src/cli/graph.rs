//! Print the whole bundle graph.

use crate::storage::{BundleStorage, BundleStorageContext};

use anyhow::Result;
use clap::Args;

/// Command to print the bundle graph.
///
/// By default the graph is printed in Graphviz dot format, edges pointing from a
/// bundle to its dependencies. With `--order` the bundle names are printed one per
/// line instead, every bundle after all of its dependencies.
#[derive(Args, Debug)]
pub struct GraphCommand {
    /// Print bundle names in dependency order instead of dot
    #[arg(long)]
    pub order: bool,
}

impl GraphCommand {
    /// Print the graph of the context's storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be built.
    pub fn execute(self, context: &BundleStorageContext) -> Result<()> {
        let storage = context.storage()?;
        print!("{}", self.render(&storage)?);
        Ok(())
    }

    /// Render the graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph has a cycle.
    pub fn render(&self, storage: &BundleStorage) -> Result<String> {
        let dag = storage.bundle_dag();
        if !self.order {
            return Ok(dag.to_dot());
        }

        Ok(dag.topological_order()?.iter().map(|unit| format!("{}\n", unit.name)).collect())
    }
}
