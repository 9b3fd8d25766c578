//! Configuration module for Catalog-Ripple
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Command-line flags are layered on top by the binary.
//!
//! # Example
//!
//! ```no_run
//! use catalog_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ripple.toml")).unwrap();
//! println!("Collecting level {} categories", config.collection.level);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    parse_summary_path, CollectionConfig, Config, EndpointConfig, HttpConfig, OutputConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
