//! Command-line interface for Dandelion.
//!
//! The `dandelion` binary loads bundle definitions from the locations named in the
//! configuration file and answers questions about the resulting graph.
//!
//! # Commands
//!
//! - `resolve` - bundles (or assets) needed to render one or more bundles
//! - `tree` - dependency tree of a bundle
//! - `graph` - the whole graph in Graphviz dot format, or in dependency order
//! - `validate` - load everything and report cycles and dangling dependencies
//!
//! # Global Options
//!
//! - `--config <path>` - configuration file, see [`crate::config`]
//! - `--strict` - treat unknown bundles and dangling dependencies as errors
//! - `--verbose` / `--quiet` - debug logging / no logging
//!
//! Logs go to stderr, command output to stdout. `RUST_LOG` overrides the level
//! picked by `--verbose` and `--quiet`.
//!
//! # Examples
//!
//! ```bash
//! dandelion resolve app
//! dandelion resolve app admin --exclude jquery --format json
//! dandelion resolve app --assets
//! dandelion tree app
//! dandelion graph | dot -Tsvg > bundles.svg
//! dandelion --strict validate
//! ```

mod graph;
mod resolve;
mod tree;
mod validate;

pub use graph::GraphCommand;
pub use resolve::ResolveCommand;
pub use tree::TreeCommand;
pub use validate::ValidateCommand;

use crate::config::DandelionConfig;
use crate::storage::BundleStorageContext;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

/// Output format of the reporting commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,

    /// Pretty-printed JSON
    Json,
}

/// Top-level command line of the `dandelion` binary.
#[derive(Parser, Debug)]
#[command(
    name = "dandelion",
    about = "Dandelion - resolve web asset bundles and their dependencies",
    version,
    long_about = "Dandelion loads bundle definitions, checks the bundle dependency graph, and \
                  resolves bundles into the ordered list of bundles and assets they need."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    ///
    /// Defaults to $DANDELION_CONFIG, then ./dandelion.toml.
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Fail on unknown bundles and dangling dependencies
    #[arg(long, global = true)]
    strict: bool,
}

/// Subcommands of the `dandelion` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve bundles into dependency order
    Resolve(ResolveCommand),

    /// Show the dependency tree of a bundle
    Tree(TreeCommand),

    /// Print the bundle graph
    Graph(GraphCommand),

    /// Check the bundle definitions
    Validate(ValidateCommand),
}

impl Cli {
    /// Log filter directive selected by `--verbose` and `--quiet`.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "off"
        } else {
            "info"
        }
    }

    /// Load the configuration and run the selected command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the command fails.
    pub async fn execute(self) -> Result<()> {
        let mut config = DandelionConfig::load_with_optional(self.config).await?;
        if self.strict {
            config.strict = true;
        }
        debug!("running with {config:?}");

        let context = BundleStorageContext::from_config(&config);
        match self.command {
            Commands::Resolve(cmd) => cmd.execute(&context),
            Commands::Tree(cmd) => cmd.execute(&context),
            Commands::Graph(cmd) => cmd.execute(&context),
            Commands::Validate(cmd) => cmd.execute(&context),
        }
    }
}
