//! Validate bundle definitions.
//!
//! Loads every configured location into a fresh storage. Loading fails on
//! unparseable files, assets without a type, and dependency cycles; in strict mode
//! also on dangling dependencies. In lenient mode dangling dependencies are
//! reported as warnings.

use crate::cli::OutputFormat;
use crate::storage::{BundleStorage, BundleStorageContext};

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;

/// Command to validate bundle definitions.
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Outcome of a validation run.
#[derive(Debug, Default, Serialize)]
pub struct ValidationResult {
    /// Whether the definitions loaded without errors.
    pub valid: bool,

    /// Number of bundles.
    pub bundles: usize,

    /// Number of declared dependency edges.
    pub edges: usize,

    /// Errors that prevented loading.
    pub errors: Vec<String>,

    /// Dependencies on bundles that are not defined.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Summarize a successfully built storage.
    pub fn from_storage(storage: &BundleStorage) -> Self {
        let dag = storage.bundle_dag();
        Self {
            valid: true,
            bundles: dag.node_count(),
            edges: dag.edge_count(),
            errors: Vec::new(),
            warnings: dag
                .dangling_dependencies()
                .into_iter()
                .map(|(bundle, dependency)| {
                    format!("bundle '{bundle}' depends on unknown bundle '{dependency}'")
                })
                .collect(),
        }
    }

    fn render_text(&self) -> Result<String> {
        let mut output = String::new();
        for error in &self.errors {
            writeln!(output, "{} {error}", "✗".red())?;
        }
        for warning in &self.warnings {
            writeln!(output, "{} {warning}", "⚠".yellow())?;
        }
        if self.valid {
            writeln!(
                output,
                "{} {} bundle(s), {} dependency edge(s), no cycles",
                "✓".green(),
                self.bundles,
                self.edges
            )?;
        }
        Ok(output)
    }
}

impl ValidateCommand {
    /// Build the storage and report the outcome.
    ///
    /// # Errors
    ///
    /// Returns the loading error if the definitions are invalid.
    pub fn execute(self, context: &BundleStorageContext) -> Result<()> {
        match context.init() {
            Ok(storage) => {
                print!("{}", self.render(&ValidationResult::from_storage(&storage))?);
                Ok(())
            }
            Err(error) => {
                // The error itself is reported on stderr by the caller
                if self.format == OutputFormat::Json {
                    let result = ValidationResult {
                        errors: vec![format!("{error:#}")],
                        ..ValidationResult::default()
                    };
                    print!("{}", self.render(&result)?);
                }
                Err(error)
            }
        }
    }

    /// Render a validation result in the requested format.
    ///
    /// # Errors
    ///
    /// Returns an error if the result cannot be serialized.
    pub fn render(&self, result: &ValidationResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(result)?)),
            OutputFormat::Text => result.render_text(),
        }
    }
}
