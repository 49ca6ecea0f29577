//! Crawler module for listing discovery, fetching and extraction
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with retry logic
//! - Page-count discovery by downward probing
//! - Concurrent page aggregation in page order
//! - Listing row extraction
//! - Overall run coordination

mod aggregator;
mod coordinator;
mod discovery;
mod document;
mod fetcher;
mod parser;

pub use aggregator::{aggregate_pages, Aggregate, PageOutcome};
pub use coordinator::{run_scrape, ScrapeReport, Scraper};
pub use discovery::{discover_page_count, page_estimate, read_result_count};
pub use document::{ListingDocument, ListingSelectors};
pub use fetcher::{
    build_http_client, fetch_once, fetch_url, fetch_with_retry, FetchResult, HttpSource,
    PageSource,
};
pub use parser::{extract_page, extract_rows, parse_count, RowRecord};
