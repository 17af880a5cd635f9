//! Error handling for Dandelion
//!
//! This module provides the error types and user-friendly error reporting for the
//! bundle registry. The error system is designed around two core principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`DandelionError`] - Enumerated error types for all failure cases
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Error Categories
//!
//! - **Graph**: [`DandelionError::CycleDetected`], [`DandelionError::UnknownBundle`],
//!   [`DandelionError::DanglingDependency`]
//! - **Bundle definitions**: [`DandelionError::InvalidAsset`], [`DandelionError::BundleParseError`]
//! - **Configuration**: [`DandelionError::ConfigError`], [`DandelionError::ConfigNotFound`]
//! - **Conversions**: [`toml::de::Error`] from configuration parsing
//!
//! The graph errors are the only ones raised by the storage itself. In lenient mode
//! an unknown bundle or a dangling dependency is not an error at all; strict mode
//! turns both into hard failures.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dandelion::core::{DandelionError, ErrorContext};
//!
//! let error = DandelionError::CycleDetected {
//!     vertex: "b1".to_string(),
//!     chain: "b1 → b2 → b1".to_string(),
//! };
//! let context = ErrorContext::new(error)
//!     .with_suggestion("Remove one of the dependencies forming the cycle");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for Dandelion operations.
///
/// # Error Categories
///
/// ## Bundle Graph
/// - [`CycleDetected`] - a dependency cycle exists between bundles
/// - [`UnknownBundle`] - a bundle was requested that no loader registered (strict mode)
/// - [`DanglingDependency`] - a bundle depends on an unregistered bundle (strict mode)
///
/// ## Bundle Definitions
/// - [`InvalidAsset`] - an asset's type can neither be read nor inferred
/// - [`BundleParseError`] - a bundle definition file is malformed
///
/// ## Configuration
/// - [`ConfigError`] - configuration values are invalid
/// - [`ConfigNotFound`] - an explicitly requested configuration file is missing
///
/// [`CycleDetected`]: DandelionError::CycleDetected
/// [`UnknownBundle`]: DandelionError::UnknownBundle
/// [`DanglingDependency`]: DandelionError::DanglingDependency
/// [`InvalidAsset`]: DandelionError::InvalidAsset
/// [`BundleParseError`]: DandelionError::BundleParseError
/// [`ConfigError`]: DandelionError::ConfigError
/// [`ConfigNotFound`]: DandelionError::ConfigNotFound
#[derive(Error, Debug)]
pub enum DandelionError {
    /// Circular dependency detected in the bundle graph
    ///
    /// Raised when bundles depend on each other in a cycle, making it impossible
    /// to compute a load order. Fatal for the registration call that caused it.
    ///
    /// # Fields
    /// - `vertex`: The bundle at which the cycle was closed
    /// - `chain`: The dependency path forming the cycle, e.g. `b1 → b2 → b1`
    #[error("Circular dependency detected involving bundle '{vertex}': {chain}")]
    CycleDetected {
        /// Name of one bundle on the cycle
        vertex: String,
        /// Rendering of the cycle path
        chain: String,
    },

    /// Requested bundle is not registered
    #[error("Bundle '{name}' not found")]
    UnknownBundle {
        /// The requested bundle name
        name: String,
        /// Closest registered bundle name, if any is close enough
        suggestion: Option<String>,
    },

    /// Bundle depends on a bundle that is not registered
    #[error("Bundle '{bundle}' depends on unknown bundle '{dependency}'")]
    DanglingDependency {
        /// The dependent bundle
        bundle: String,
        /// The dependency name that does not resolve
        dependency: String,
    },

    /// Asset definition cannot be completed
    #[error("Invalid asset in bundle '{bundle}': {reason}")]
    InvalidAsset {
        /// Bundle that owns the asset
        bundle: String,
        /// Why the asset is invalid
        reason: String,
    },

    /// Bundle definition file is malformed
    #[error("Invalid bundle definition in {file}")]
    BundleParseError {
        /// Path to the definition file
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Config file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path to the configuration file that was not found
        path: String,
    },

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for DandelionError {
    fn clone(&self) -> Self {
        match self {
            Self::CycleDetected {
                vertex,
                chain,
            } => Self::CycleDetected {
                vertex: vertex.clone(),
                chain: chain.clone(),
            },
            Self::UnknownBundle {
                name,
                suggestion,
            } => Self::UnknownBundle {
                name: name.clone(),
                suggestion: suggestion.clone(),
            },
            Self::DanglingDependency {
                bundle,
                dependency,
            } => Self::DanglingDependency {
                bundle: bundle.clone(),
                dependency: dependency.clone(),
            },
            Self::InvalidAsset {
                bundle,
                reason,
            } => Self::InvalidAsset {
                bundle: bundle.clone(),
                reason: reason.clone(),
            },
            Self::BundleParseError {
                file,
                reason,
            } => Self::BundleParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::ConfigNotFound {
                path,
            } => Self::ConfigNotFound {
                path: path.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that adds suggestions and details to a [`DandelionError`].
///
/// When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context about the error in yellow (optional)
/// 3. **Suggestion**: Actionable steps to resolve the issue in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: DandelionError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: DandelionError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions.
///
/// Recognizes [`DandelionError`] anywhere in the error chain, then IO, JSON and TOML
/// errors, and falls back to a generic context that carries the full error chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(dandelion_error) = cause.downcast_ref::<DandelionError>() {
            return create_error_context(dandelion_error);
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(DandelionError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check the permissions of the bundle directories and the configuration file");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(DandelionError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the configured bundle locations exist and the paths are correct");
            }
            _ => {}
        }
    }

    if let Some(json_error) = error.downcast_ref::<serde_json::Error>() {
        return ErrorContext::new(DandelionError::BundleParseError {
            file: "unknown".to_string(),
            reason: json_error.to_string(),
        })
        .with_suggestion("Check the JSON syntax of your bundle definition files")
        .with_details(format!("Parsing stopped at line {}, column {}", json_error.line(), json_error.column()));
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(DandelionError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax in your dandelion.toml file. Verify quotes, brackets, and key names");
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(DandelionError::Other {
        message,
    })
}

/// Map each [`DandelionError`] variant to a context with tailored suggestions.
fn create_error_context(error: &DandelionError) -> ErrorContext {
    match error {
        DandelionError::CycleDetected { vertex, chain } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Remove one of the dependencies forming the cycle through bundle '{vertex}'"
            ))
            .with_details(format!(
                "Dependency chain: {chain}. Bundles cannot depend on themselves directly or indirectly"
            )),

        DandelionError::UnknownBundle { name, suggestion } => {
            let context = ErrorContext::new(error.clone());
            match suggestion {
                Some(closest) => context.with_suggestion(format!("Did you mean '{closest}'?")),
                None => context.with_suggestion(format!(
                    "Define a bundle named '{name}' in one of the configured bundle locations"
                )),
            }
        }

        DandelionError::DanglingDependency { bundle, dependency } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Define bundle '{dependency}' or remove it from the dependencies of '{bundle}'"
            ))
            .with_details("Strict mode rejects dependencies on bundles that no loader registered"),

        DandelionError::InvalidAsset { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Declare the asset type explicitly, or use a location ending in .js or .css"),

        DandelionError::BundleParseError { file, reason } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Check the JSON syntax and field names in {file}"))
            .with_details(reason.clone()),

        DandelionError::TomlError(_) => ErrorContext::new(error.clone())
            .with_suggestion("Check the TOML syntax in your dandelion.toml file. Verify quotes, brackets, and key names"),

        DandelionError::ConfigNotFound { path } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Create {path} or point --config at an existing file")),

        _ => ErrorContext::new(error.clone()),
    }
}

/// Result alias for operations that fail with a [`DandelionError`].
pub type Result<T, E = DandelionError> = std::result::Result<T, E>;
