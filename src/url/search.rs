use crate::config::SiteConfig;
use crate::url::normalize_keyword;
use crate::SweepError;
use url::Url;

/// A single board search, able to produce the URL of any listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchContext {
    /// Board URL carrying the fixed search query, without the page parameter
    base: Url,

    /// Keyword as sent to the site
    keyword: String,
}

impl SearchContext {
    /// Builds the search for `raw_keyword` on the configured board
    ///
    /// The keyword is whitespace-normalized and lowercased before use.
    ///
    /// # Examples
    ///
    /// ```
    /// use forum_sweep::config::SiteConfig;
    /// use forum_sweep::url::SearchContext;
    ///
    /// let search = SearchContext::new(&SiteConfig::default(), "  Gold   Saucer ").unwrap();
    /// assert_eq!(search.keyword(), "gold saucer");
    /// assert_eq!(
    ///     search.page_url(2).as_str(),
    ///     "https://www.inven.co.kr/board/ff14/4337?query=list&sterm=&name=subject&keyword=gold+saucer&p=2"
    /// );
    /// ```
    pub fn new(site: &SiteConfig, raw_keyword: &str) -> Result<Self, SweepError> {
        let keyword = normalize_keyword(raw_keyword).to_lowercase();

        let mut base = Url::parse(&site.base_url)?;
        {
            let mut segments = base.path_segments_mut().map_err(|_| {
                SweepError::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase)
            })?;
            segments
                .pop_if_empty()
                .push(&site.board_name)
                .push(&site.board_id.to_string());
        }
        base.query_pairs_mut()
            .clear()
            .append_pair("query", "list")
            .append_pair("sterm", "")
            .append_pair("name", "subject")
            .append_pair("keyword", &keyword);

        Ok(Self { base, keyword })
    }

    /// The normalized keyword
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// URL of the 1-based listing page `page`
    pub fn page_url(&self, page: u32) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut().append_pair("p", &page.to_string());
        url
    }
}
