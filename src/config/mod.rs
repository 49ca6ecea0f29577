//! Configuration module for Forum-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A missing file is not an error for callers that start from `Config::default()`.
//!
//! # Example
//!
//! ```no_run
//! use forum_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Retries per request: {}", config.scraper.max_retries);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, OutputConfig, ScraperConfig, SelectorConfig, SiteConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
