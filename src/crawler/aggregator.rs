//! Parallel page aggregation
//!
//! One task per listing page fetches and parses that page. Every task
//! reports exactly once over a shared channel; the collector owns all rows
//! once they arrive and restores page order with a single stable sort.

use crate::config::ScraperConfig;
use crate::crawler::document::ListingSelectors;
use crate::crawler::fetcher::{fetch_with_retry, PageSource};
use crate::crawler::parser::{extract_page, RowRecord};
use crate::url::SearchContext;
use crate::SweepError;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use url::Url;

/// What a page task sends back to the collector
#[derive(Debug)]
pub struct PageOutcome {
    pub page: u32,
    pub result: Result<Vec<RowRecord>, SweepError>,
}

/// All rows of a search, in page order, with per-page bookkeeping
#[derive(Debug, Default)]
pub struct Aggregate {
    /// Rows sorted by page; within a page, in listing order
    pub rows: Vec<RowRecord>,

    /// Number of page tasks launched
    pub pages_requested: u32,

    /// Pages that contributed no rows because their task failed, ascending
    pub failed_pages: Vec<u32>,
}

impl Aggregate {
    /// Returns true if every requested page was scraped
    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty()
    }
}

/// Scrapes pages `1..=page_count` concurrently and merges their rows
///
/// At most `config.max_concurrent_pages` tasks fetch at the same time; 0
/// lifts the cap so every page starts at once. A page whose fetch exhausts
/// its retries is logged and skipped; it never affects the other pages.
pub async fn aggregate_pages<S>(
    source: Arc<S>,
    search: &SearchContext,
    page_count: u32,
    config: &ScraperConfig,
    selectors: Arc<ListingSelectors>,
) -> Aggregate
where
    S: PageSource + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<PageOutcome>();
    let limiter =
        (config.max_concurrent_pages > 0).then(|| Arc::new(Semaphore::new(config.max_concurrent_pages)));

    for page in 1..=page_count {
        let tx = tx.clone();
        let source = Arc::clone(&source);
        let selectors = Arc::clone(&selectors);
        let limiter = limiter.clone();
        let url = search.page_url(page);
        let max_retries = config.max_retries;

        tokio::spawn(async move {
            let _permit = match limiter {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };

            let result = scrape_page(source.as_ref(), &url, page, max_retries, &selectors).await;
            // The collector only goes away once it has every report
            let _ = tx.send(PageOutcome { page, result });
        });
    }
    drop(tx);

    let mut reported = vec![false; page_count as usize];
    let mut failed_pages = Vec::new();
    let mut rows = Vec::new();
    let mut received = 0u32;

    while received < page_count {
        let Some(outcome) = rx.recv().await else {
            // Remaining senders were dropped by panicking tasks
            break;
        };
        received += 1;

        if let Some(slot) = reported.get_mut(outcome.page as usize - 1) {
            *slot = true;
        }

        match outcome.result {
            Ok(page_rows) => {
                tracing::debug!("Page {} yielded {} row(s)", outcome.page, page_rows.len());
                rows.extend(page_rows);
            }
            Err(e) => {
                tracing::warn!("Page {} skipped: {}", outcome.page, e);
                failed_pages.push(outcome.page);
            }
        }
    }

    for (index, seen) in reported.iter().enumerate() {
        if !seen {
            let page = index as u32 + 1;
            tracing::warn!("Page {} never reported back", page);
            failed_pages.push(page);
        }
    }

    failed_pages.sort_unstable();
    rows.sort_by_key(|row| row.page);

    Aggregate {
        rows,
        pages_requested: page_count,
        failed_pages,
    }
}

/// Fetches one page with retries and extracts its rows
async fn scrape_page<S: PageSource>(
    source: &S,
    url: &Url,
    page: u32,
    max_retries: u32,
    selectors: &ListingSelectors,
) -> Result<Vec<RowRecord>, SweepError> {
    tracing::info!("Requesting page {}: {}", page, url);
    let body = fetch_with_retry(source, url, max_retries).await?;
    Ok(extract_page(&body, page, selectors))
}
