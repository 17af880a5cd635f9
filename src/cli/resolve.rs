//! Resolve bundles into the ordered list of bundles or assets they need.

use crate::bundle::normalize_name;
use crate::cli::OutputFormat;
use crate::storage::{BundleStorage, BundleStorageContext};

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fmt::Write;

/// Command to resolve bundles.
///
/// Prints every bundle needed by the given bundles, dependencies first, together
/// with its assets. With `--assets` only the assets are printed.
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Bundles to resolve, in order
    #[arg(required = true, value_name = "BUNDLE")]
    pub bundles: Vec<String>,

    /// Leave out a bundle's own output but keep its dependencies (repeatable)
    #[arg(short, long, value_name = "BUNDLE")]
    pub exclude: Vec<String>,

    /// Print assets only
    #[arg(long)]
    pub assets: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ResolveCommand {
    /// Resolve against the context's storage and print the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be built, or in strict mode if a
    /// requested bundle is unknown.
    pub fn execute(self, context: &BundleStorageContext) -> Result<()> {
        let storage = context.storage()?;
        print!("{}", self.render(&storage)?);
        Ok(())
    }

    /// Render the resolution of the requested bundles.
    ///
    /// # Errors
    ///
    /// Returns an error in strict mode if a requested bundle is unknown.
    pub fn render(&self, storage: &BundleStorage) -> Result<String> {
        if self.assets {
            return self.render_assets(storage);
        }

        let excluded: Vec<String> = self.exclude.iter().map(|name| normalize_name(name)).collect();
        let units: Vec<_> = storage
            .bundles_for_all(&self.bundles)?
            .into_iter()
            .filter(|unit| !excluded.contains(&unit.name))
            .collect();

        if self.format == OutputFormat::Json {
            return Ok(format!("{}\n", serde_json::to_string_pretty(&units)?));
        }

        let mut output = String::new();
        for unit in units {
            let marker = if unit.vendor {
                " (vendor)".dimmed().to_string()
            } else {
                String::new()
            };
            writeln!(output, "{}{marker}", unit.name.bold())?;
            for asset in unit.assets() {
                writeln!(
                    output,
                    "  {:<4}{}",
                    asset.asset_type.map(|t| t.to_string()).unwrap_or_default(),
                    asset.first_location().unwrap_or("-")
                )?;
            }
        }
        Ok(output)
    }

    fn render_assets(&self, storage: &BundleStorage) -> Result<String> {
        let assets = storage.assets_for(&self.bundles, self.exclude.as_slice())?;

        if self.format == OutputFormat::Json {
            return Ok(format!("{}\n", serde_json::to_string_pretty(&assets)?));
        }

        let mut output = String::new();
        for asset in assets {
            writeln!(output, "{}", asset.first_location().unwrap_or("-"))?;
        }
        Ok(output)
    }
}
