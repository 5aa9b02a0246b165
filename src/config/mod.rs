//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use letterboxd_catalog::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Listing: {}{}", config.site.base_url, config.site.list_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CacheConfig, CatalogConfig, Config, FailurePolicy, HttpConfig, SiteConfig, UserAgentConfig,
    MAX_RECORD_AGE_HOURS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
