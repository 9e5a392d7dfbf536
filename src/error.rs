//! Error types for cloudcost
//!
//! This module defines the error handling strategy for cloudcost. There are
//! two error types: `CloudCostError` (main error enum) and `ConfigError`
//! (configuration-specific).
//!
//! ## Error Handling Philosophy
//!
//! Library code uses `crate::error::Result<T>` which returns `CloudCostError`.
//! CLI code uses `anyhow::Result<T>` for top-level error handling. The
//! conversion happens at the CLI boundary using `anyhow::Error::from` to
//! preserve error chains.
//!
//! This split exists because:
//! - Library code benefits from structured error types for programmatic handling
//! - CLI code benefits from `anyhow`'s context chains and user-friendly display
//!
//! ## When to Use Which Error
//!
//! - `ConfigError`: Configuration parsing and validation issues
//!   - Automatically converted to `CloudCostError::Config` via `#[from]`
//!
//! - `InvalidInput`: User-supplied values the engine refuses to compute with
//!   (negative quantities, unparsable commitment terms). Surfaced to the
//!   caller, not retried, never fatal to the session.
//!
//! - `DataLoad`: A CSV source could not be read or contained no usable
//!   rows. `Catalog::load` recovers from it by falling back to the sample
//!   catalog; the variant surfaces only from `Catalog::from_csv_path`.
//!
//! - `MissingOffering`: A scenario line references an offering absent from
//!   the catalog. Scenario resolution handles this as a logged removal, so
//!   the variant only surfaces when a caller asks for a single offering
//!   directly.

use thiserror::Error;

/// Main error type for cloudcost
#[derive(Error, Debug)]
pub enum CloudCostError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Failed to load pricing data from {path}: {message}")]
    DataLoad { path: String, message: String },

    #[error("No offering matches {selector} in the current catalog")]
    MissingOffering { selector: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CloudCostError>;

impl CloudCostError {
    /// Shorthand for the `InvalidInput` variant.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CloudCostError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
