//! Scrape coordinator - top-level run orchestration
//!
//! This module ties the phases of one run together:
//! - Building the search for a keyword
//! - Discovering the page count (fatal on failure)
//! - Aggregating all pages (page failures are isolated)
//! - Writing the table (fatal on failure)

use crate::config::{validate, Config};
use crate::crawler::aggregator::aggregate_pages;
use crate::crawler::discovery::discover_page_count;
use crate::crawler::document::ListingSelectors;
use crate::crawler::fetcher::{HttpSource, PageSource};
use crate::output::write_table;
use crate::url::SearchContext;
use crate::SweepError;
use std::path::PathBuf;
use std::sync::Arc;

/// Outcome of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeReport {
    /// Where the table was written
    pub table_path: PathBuf,

    /// Keyword as sent to the site
    pub keyword: String,

    /// Page count found by discovery
    pub pages_discovered: u32,

    /// Pages whose rows are missing from the table
    pub failed_pages: Vec<u32>,

    /// Data rows written (header excluded)
    pub rows_written: usize,
}

impl ScrapeReport {
    /// Returns true if the table holds every discovered page
    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty()
    }
}

/// Main scraper structure
pub struct Scraper<S> {
    config: Config,
    source: Arc<S>,
    selectors: Arc<ListingSelectors>,
}

impl Scraper<HttpSource> {
    /// Creates a scraper that talks HTTP to the configured site
    pub fn new(config: Config) -> Result<Self, SweepError> {
        let source = HttpSource::new(&config.user_agent, &config.scraper)?;
        Self::with_source(config, source)
    }
}

impl<S: PageSource + 'static> Scraper<S> {
    /// Creates a scraper over any page source
    ///
    /// The configuration is validated here, so library callers get the
    /// same checks as the command line.
    pub fn with_source(config: Config, source: S) -> Result<Self, SweepError> {
        validate(&config)?;
        let selectors = ListingSelectors::compile(&config.selectors)?;

        Ok(Self {
            config,
            source: Arc::new(source),
            selectors: Arc::new(selectors),
        })
    }

    /// Runs one scrape for `keyword` and writes the table
    ///
    /// Discovery and write failures abort the run and leave no table
    /// behind. Failed pages only shrink the table; they are listed in the
    /// returned report.
    pub async fn run(&self, keyword: &str) -> Result<ScrapeReport, SweepError> {
        let search = SearchContext::new(&self.config.site, keyword)?;
        tracing::info!(
            "Searching {}/{} for '{}'",
            self.config.site.board_name,
            self.config.site.board_id,
            search.keyword()
        );

        let page_count = discover_page_count(
            self.source.as_ref(),
            &search,
            &self.config.scraper,
            &self.selectors,
        )
        .await
        .map_err(|e| {
            tracing::error!("Page discovery failed: {}", e);
            e
        })?;
        tracing::info!("{} page(s) found", page_count);

        let aggregate = aggregate_pages(
            Arc::clone(&self.source),
            &search,
            page_count,
            &self.config.scraper,
            Arc::clone(&self.selectors),
        )
        .await;

        if !aggregate.is_complete() {
            tracing::warn!(
                "{} of {} page(s) failed and are missing from the table: {:?}",
                aggregate.failed_pages.len(),
                page_count,
                aggregate.failed_pages
            );
        }

        let table_path = PathBuf::from(&self.config.output.table_path);
        write_table(&aggregate.rows, &table_path).map_err(|e| {
            tracing::error!("Writing table failed: {}", e);
            e
        })?;

        tracing::info!(
            "Wrote {} row(s) to {}",
            aggregate.rows.len(),
            table_path.display()
        );

        Ok(ScrapeReport {
            table_path,
            keyword: search.keyword().to_string(),
            pages_discovered: page_count,
            failed_pages: aggregate.failed_pages,
            rows_written: aggregate.rows.len(),
        })
    }
}

/// Runs a complete scrape over HTTP
///
/// This is the entry point used by front ends: it takes the raw keyword,
/// performs the whole run and returns where the table was written. The
/// table is transient; callers remove it with
/// [`discard_table`](crate::output::discard_table) once it was served.
///
/// # Example
///
/// ```no_run
/// use forum_sweep::config::Config;
/// use forum_sweep::crawler::run_scrape;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_scrape(Config::default(), "gold saucer").await?;
/// println!("{} rows in {}", report.rows_written, report.table_path.display());
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: Config, keyword: &str) -> Result<ScrapeReport, SweepError> {
    let scraper = Scraper::new(config)?;
    scraper.run(keyword).await
}
