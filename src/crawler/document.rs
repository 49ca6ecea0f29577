//! Selector-based queries over a parsed listing page

use crate::config::SelectorConfig;
use crate::ConfigError;
use scraper::html::Select;
use scraper::{ElementRef, Html, Selector};

/// Compiled form of [`SelectorConfig`]
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    pub result_count: Selector,
    pub no_results: Selector,
    pub row: Selector,
    pub row_number: Selector,
    pub title: Selector,
    pub author: Selector,
    pub views: Selector,
}

impl ListingSelectors {
    /// Compiles every selector of the configuration
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            result_count: compile("result-count", &config.result_count)?,
            no_results: compile("no-results", &config.no_results)?,
            row: compile("row", &config.row)?,
            row_number: compile("row-number", &config.row_number)?,
            title: compile("title", &config.title)?,
            author: compile("author", &config.author)?,
            views: compile("views", &config.views)?,
        })
    }
}

fn compile(field: &'static str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|_| ConfigError::InvalidSelector {
        field,
        selector: selector.to_string(),
    })
}

/// A fetched page parsed into a queryable tree
pub struct ListingDocument {
    html: Html,
}

impl ListingDocument {
    /// Parses a response body; malformed markup is repaired, never rejected
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Returns true if anything in the document matches `selector`
    pub fn contains(&self, selector: &Selector) -> bool {
        self.html.select(selector).next().is_some()
    }

    /// Trimmed text of the first element matching `selector`
    pub fn first_text(&self, selector: &Selector) -> Option<String> {
        self.html.select(selector).next().map(element_text)
    }

    /// All elements matching `selector`, in document order
    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> Select<'a, 'b> {
        self.html.select(selector)
    }
}

/// Trimmed text of an element and all its descendants
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the element's own text nodes, skipping nested elements
///
/// Badges and comment counters nested inside a title anchor are dropped this way.
pub fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect::<String>()
        .trim()
        .to_string()
}

/// First descendant of `scope` matching `selector`
pub fn find_in<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    #[test]
    fn test_default_selectors_compile() {
        let selectors = ListingSelectors::compile(&SelectorConfig::default()).unwrap();
        let doc = ListingDocument::parse(
            r#"<div class="board-list"><table><tbody><tr><td><div class="no-result">none</div></td></tr></tbody></table></div>"#,
        );
        assert!(doc.contains(&selectors.no_results));
    }

    #[test]
    fn test_compile_reports_field() {
        let config = SelectorConfig {
            views: "td..view".to_string(),
            ..SelectorConfig::default()
        };
        let err = ListingSelectors::compile(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSelector { field: "views", .. }));
    }

    #[test]
    fn test_first_text_trims() {
        let doc = ListingDocument::parse("<p class='a'>  hello  </p><p class='a'>second</p>");
        assert_eq!(doc.first_text(&sel("p.a")), Some("hello".to_string()));
        assert_eq!(doc.first_text(&sel("p.b")), None);
    }

    #[test]
    fn test_own_text_skips_children() {
        let doc = ListingDocument::parse(
            r#"<a href="/x"><span class="cate">[Tip]</span> Desert map <span class="num">[12]</span></a>"#,
        );
        let anchor = doc.select(&sel("a")).next().unwrap();
        assert_eq!(own_text(anchor), "Desert map");
        assert_eq!(element_text(anchor), "[Tip] Desert map [12]");
    }

    #[test]
    fn test_find_in_is_scoped() {
        let doc = ListingDocument::parse(
            "<table><tr class='r'><td class='v'>1</td></tr><tr class='r'><td>none</td></tr></table>",
        );
        let rows: Vec<_> = doc.select(&sel("tr.r")).collect();
        assert_eq!(rows.len(), 2);
        assert!(find_in(rows[0], &sel("td.v")).is_some());
        assert!(find_in(rows[1], &sel("td.v")).is_none());
    }
}
