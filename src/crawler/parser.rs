//! Listing page parser
//!
//! This module turns one fetched listing page into its post rows. Each row
//! yields five fields:
//! - Post number (`td.num span` by default)
//! - Title, taken from the anchor's own text so nested badges are dropped
//! - Author
//! - View count, with thousands separators removed
//! - Link target of the title anchor
//!
//! A field that cannot be read is left empty and reported with a warning;
//! the rest of the row is still kept.

use crate::crawler::document::{element_text, find_in, own_text, ListingDocument, ListingSelectors};
use crate::SweepError;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};

/// One post entry of a listing page
///
/// The serialized form is one table row with the columns
/// `No.`, `Title`, `User`, `View`, `Link`. The originating page is only
/// used for ordering and is not written out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRecord {
    /// Listing page the row was found on (1-based)
    #[serde(skip)]
    pub page: u32,

    /// Post number shown in the row
    #[serde(rename = "No.")]
    pub number: Option<u64>,

    #[serde(rename = "Title")]
    pub title: String,

    #[serde(rename = "User")]
    pub author: String,

    #[serde(rename = "View")]
    pub views: Option<u64>,

    #[serde(rename = "Link")]
    pub link: Option<String>,
}

impl RowRecord {
    fn is_blank(&self) -> bool {
        self.number.is_none()
            && self.title.is_empty()
            && self.author.is_empty()
            && self.views.is_none()
            && self.link.is_none()
    }
}

/// Parses a page body and extracts its rows
///
/// # Example
///
/// ```
/// use forum_sweep::config::SelectorConfig;
/// use forum_sweep::crawler::{extract_page, ListingSelectors};
///
/// let html = r#"<div class="board-list"><table><tbody><tr>
///     <td class="num"><span>1041</span></td>
///     <td class="tit"><div><div><a href="/board/ff14/4337/1041">Glamour help</a></div></div></td>
///     <td class="user"><span>Alisaie</span></td>
///     <td class="view">1,024</td>
/// </tr></tbody></table></div>"#;
///
/// let selectors = ListingSelectors::compile(&SelectorConfig::default()).unwrap();
/// let rows = extract_page(html, 2, &selectors);
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].page, 2);
/// assert_eq!(rows[0].views, Some(1024));
/// ```
pub fn extract_page(body: &str, page: u32, selectors: &ListingSelectors) -> Vec<RowRecord> {
    let document = ListingDocument::parse(body);
    extract_rows(&document, page, selectors)
}

/// Extracts every row of an already parsed document, in document order
pub fn extract_rows(
    document: &ListingDocument,
    page: u32,
    selectors: &ListingSelectors,
) -> Vec<RowRecord> {
    let mut rows = Vec::new();

    for (index, element) in document.select(&selectors.row).enumerate() {
        let (record, problems) = extract_row(element, page, selectors);

        if record.is_blank() {
            tracing::trace!("Skipping empty row {} on page {}", index + 1, page);
            continue;
        }

        if !problems.is_empty() {
            let details: Vec<String> = problems.iter().map(|e| e.to_string()).collect();
            tracing::warn!(
                "Row {} on page {} kept with missing fields: {}",
                index + 1,
                page,
                details.join("; ")
            );
        }

        rows.push(record);
    }

    rows
}

/// Reads one row; every field failure is collected rather than returned early
fn extract_row(
    row: ElementRef<'_>,
    page: u32,
    selectors: &ListingSelectors,
) -> (RowRecord, Vec<SweepError>) {
    let mut problems = Vec::new();

    let number = match find_in(row, &selectors.row_number).map(element_text) {
        Some(text) => parse_count("post number", &text)
            .map_err(|e| problems.push(e))
            .ok(),
        None => {
            problems.push(missing("post number"));
            None
        }
    };

    let anchor = find_in(row, &selectors.title);
    let title = match anchor {
        Some(anchor) => own_text(anchor),
        None => {
            problems.push(missing("title"));
            String::new()
        }
    };

    let link = anchor
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string);
    if anchor.is_some() && link.is_none() {
        problems.push(missing("link"));
    }

    let author = match find_in(row, &selectors.author) {
        Some(element) => element_text(element),
        None => {
            problems.push(missing("author"));
            String::new()
        }
    };

    let views = match find_in(row, &selectors.views).map(element_text) {
        Some(text) => parse_count("view count", &text)
            .map_err(|e| problems.push(e))
            .ok(),
        None => {
            problems.push(missing("view count"));
            None
        }
    };

    let record = RowRecord {
        page,
        number,
        title,
        author,
        views,
        link,
    };

    (record, problems)
}

fn missing(field: &'static str) -> SweepError {
    SweepError::FieldParse {
        field,
        value: String::new(),
    }
}

/// Parses a non-negative count written with optional thousands separators
///
/// # Examples
///
/// ```
/// use forum_sweep::crawler::parse_count;
///
/// assert_eq!(parse_count("views", " 12,345 ").unwrap(), 12345);
/// assert!(parse_count("views", "notice").is_err());
/// ```
pub fn parse_count(field: &'static str, text: &str) -> Result<u64, SweepError> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();

    cleaned.parse::<u64>().map_err(|_| SweepError::FieldParse {
        field,
        value: text.to_string(),
    })
}
