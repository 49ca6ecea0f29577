use serde::Deserialize;

/// Main configuration structure for Forum-Sweep
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
}

/// Which board to search
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root of the board URLs; board name and id are appended as path segments
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Board identifier, first path segment (e.g., "ff14")
    #[serde(rename = "board-name", default = "default_board_name")]
    pub board_name: String,

    /// Numeric board id, second path segment
    #[serde(rename = "board-id", default = "default_board_id")]
    pub board_id: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            board_name: default_board_name(),
            board_id: default_board_id(),
        }
    }
}

/// Fetching and fan-out behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Extra attempts after the first failed request
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Rows the site shows per listing page
    #[serde(rename = "rows-per-page", default = "default_rows_per_page")]
    pub rows_per_page: u32,

    /// Maximum number of page tasks in flight; 0 means no cap
    #[serde(
        rename = "max-concurrent-pages",
        default = "default_max_concurrent_pages"
    )]
    pub max_concurrent_pages: usize,

    /// Upper bound on the page estimate taken from the result count
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Total request timeout (seconds)
    #[serde(
        rename = "request-timeout-secs",
        default = "default_request_timeout_secs"
    )]
    pub request_timeout_secs: u64,

    /// Connect timeout (seconds)
    #[serde(
        rename = "connect-timeout-secs",
        default = "default_connect_timeout_secs"
    )]
    pub connect_timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            rows_per_page: default_rows_per_page(),
            max_concurrent_pages: default_max_concurrent_pages(),
            max_pages: default_max_pages(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the scraper
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Version of the scraper
    #[serde(default = "default_agent_version")]
    pub version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            version: default_agent_version(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the CSV table produced by a run
    #[serde(rename = "table-path", default = "default_table_path")]
    pub table_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            table_path: default_table_path(),
        }
    }
}

/// CSS selectors used to read listing pages
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// Element holding the newest post number on page 1
    #[serde(rename = "result-count", default = "default_result_count")]
    pub result_count: String,

    /// Marker shown instead of rows when a page is past the end
    #[serde(rename = "no-results", default = "default_no_results")]
    pub no_results: String,

    /// One element per listing row
    #[serde(default = "default_row")]
    pub row: String,

    /// Row-relative selectors below
    #[serde(rename = "row-number", default = "default_row_number")]
    pub row_number: String,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_author")]
    pub author: String,

    #[serde(default = "default_views")]
    pub views: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            result_count: default_result_count(),
            no_results: default_no_results(),
            row: default_row(),
            row_number: default_row_number(),
            title: default_title(),
            author: default_author(),
            views: default_views(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.inven.co.kr/board".to_string()
}

fn default_board_name() -> String {
    "ff14".to_string()
}

fn default_board_id() -> u32 {
    4337
}

fn default_max_retries() -> u32 {
    20
}

fn default_rows_per_page() -> u32 {
    30
}

fn default_max_concurrent_pages() -> usize {
    16
}

fn default_max_pages() -> u32 {
    10_000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_agent_name() -> String {
    "ForumSweep".to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_table_path() -> String {
    "pages.csv".to_string()
}

fn default_result_count() -> String {
    "tbody tr.lgtm td.num span".to_string()
}

fn default_no_results() -> String {
    "div.board-list table tbody tr td div.no-result".to_string()
}

fn default_row() -> String {
    "div.board-list table tbody tr".to_string()
}

fn default_row_number() -> String {
    "td.num span".to_string()
}

fn default_title() -> String {
    "td.tit div div a".to_string()
}

fn default_author() -> String {
    "td.user span".to_string()
}

fn default_views() -> String {
    "td.view".to_string()
}
