//! Forum-Sweep: a paginated forum search scraper
//!
//! This crate discovers how many listing pages a board search returns,
//! fetches them concurrently, extracts the post rows from each page and
//! writes the aggregate, in page order, to a CSV table.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Forum-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Network or body failure after the retry budget was spent
    #[error("Fetch failed for {url} after {attempts} attempt(s): {message}")]
    Fetch {
        url: String,
        attempts: u32,
        message: String,
    },

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("No element matching '{selector}' found at {url}")]
    MissingIndicator { url: String, selector: String },

    #[error("Failed to parse {field} from '{value}'")]
    FieldParse { field: &'static str, value: String },

    #[error("Failed to write table to {path}: {message}")]
    Write { path: String, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

    #[error("Invalid selector '{selector}' for {field}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
    },
}

/// Result type alias for Forum-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_scrape, RowRecord, ScrapeReport};
pub use output::{discard_table, write_table};
pub use crate::url::{normalize_keyword, SearchContext};
