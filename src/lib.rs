//! Catalog-Ripple: a retailer catalog harvester
//!
//! This crate walks a retailer's category menu into a leveled workbook and then
//! pages through the product-catalog API for a chosen level of that menu,
//! writing tabular product output and a markdown digest.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod menu;
pub mod output;
pub mod state;

use thiserror::Error;

/// Placeholder rendered for any missing or malformed field at output time
pub const SENTINEL: &str = "N/A";

/// Main error type for Catalog-Ripple operations
///
/// Every variant is fatal to the run. Recoverable failures (a single request,
/// a single category) are logged and recorded in the run state instead.
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch menu payload from {url}")]
    MenuPayload { url: String },

    #[error("Could not find products root menu in nav response")]
    MenuRootNotFound,

    #[error("Menu file not found: {0}")]
    MenuFileNotFound(String),

    #[error("Column '{column}' not found in sheet '{sheet}' of {path}")]
    MissingColumn {
        column: String,
        sheet: String,
        path: String,
    },

    #[error("No categories available to scrape")]
    NoCategories,

    #[error("Invalid category transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CategoryPhase,
        to: state::CategoryPhase,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Catalog-Ripple operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::{CategoryInfo, ProductRecord, Scalar};
pub use config::Config;
pub use menu::{CategoryRef, CategoryRow};
pub use state::{CategoryPhase, RunState};
