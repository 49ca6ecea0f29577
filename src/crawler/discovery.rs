//! Page-count discovery
//!
//! The site shows the newest post number on page 1, which bounds how many
//! listing pages can exist. That bound overcounts whenever posts were
//! filtered or deleted, so the last page is confirmed by probing downward
//! until a page actually lists results.

use crate::config::ScraperConfig;
use crate::crawler::document::{ListingDocument, ListingSelectors};
use crate::crawler::fetcher::{fetch_once, fetch_with_retry, PageSource};
use crate::crawler::parser::parse_count;
use crate::url::SearchContext;
use crate::{Result, SweepError};

/// Determines how many listing pages the search really has
///
/// # Algorithm
///
/// 1. Fetch page 1 once. Any failure, including a non-2xx status, is fatal.
/// 2. Read the result-count indicator; its absence is fatal.
/// 3. Estimate `total / rows_per_page + 1` pages, capped at `max_pages`.
/// 4. Probe from the estimate down to 1. Each probe is retried like a
///    normal page fetch; the first page that loads and does not show the
///    no-results marker is the page count.
///
/// # Returns
///
/// * `Ok(n)` - Number of pages to scrape, 0 if no probe succeeded
/// * `Err(SweepError)` - Page 1 could not be fetched or read
pub async fn discover_page_count<S: PageSource>(
    source: &S,
    search: &SearchContext,
    config: &ScraperConfig,
    selectors: &ListingSelectors,
) -> Result<u32> {
    let first_url = search.page_url(1);
    let body = fetch_once(source, &first_url).await?;
    let total = read_result_count(&body, first_url.as_str(), selectors)?;

    let mut estimate = page_estimate(total, config.rows_per_page);
    tracing::debug!(
        "Result count {} gives an estimate of {} page(s)",
        total,
        estimate
    );
    if estimate > config.max_pages {
        tracing::warn!(
            "Estimate of {} page(s) exceeds max-pages, probing from page {}",
            estimate,
            config.max_pages
        );
        estimate = config.max_pages;
    }

    for page in (1..=estimate).rev() {
        if is_page_available(source, search, page, config.max_retries, selectors).await {
            return Ok(page);
        }
        tracing::debug!("Page {} has no results", page);
    }

    Ok(0)
}

/// Reads the result-count indicator from the first page's body
pub fn read_result_count(
    body: &str,
    url: &str,
    selectors: &ListingSelectors,
) -> Result<u64> {
    let document = ListingDocument::parse(body);
    let text = document
        .first_text(&selectors.result_count)
        .ok_or_else(|| SweepError::MissingIndicator {
            url: url.to_string(),
            selector: "result count".to_string(),
        })?;

    parse_count("result count", &text)
}

/// Upper bound on the page count for `total` results
pub fn page_estimate(total: u64, rows_per_page: u32) -> u32 {
    let pages = (total / u64::from(rows_per_page.max(1))).saturating_add(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Returns true if `page` loads within the retry budget and lists results
pub async fn is_page_available<S: PageSource>(
    source: &S,
    search: &SearchContext,
    page: u32,
    max_retries: u32,
    selectors: &ListingSelectors,
) -> bool {
    let url = search.page_url(page);

    match fetch_with_retry(source, &url, max_retries).await {
        Ok(body) => !shows_no_results(&body, selectors),
        Err(e) => {
            tracing::debug!("Probe of page {} failed: {}", page, e);
            false
        }
    }
}

/// Returns true if the body carries the no-results marker
pub fn shows_no_results(body: &str, selectors: &ListingSelectors) -> bool {
    ListingDocument::parse(body).contains(&selectors.no_results)
}
