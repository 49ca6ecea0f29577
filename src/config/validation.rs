use crate::config::types::{Config, OutputConfig, ScraperConfig, SelectorConfig, SiteConfig};
use crate::crawler::ListingSelectors;
use crate::ConfigError;
use url::Url;

/// Upper bound for the page task pool
const MAX_CONCURRENCY_CAP: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_scraper_config(&config.scraper)?;
    validate_output_config(&config.output)?;
    validate_selectors(&config.selectors)?;
    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' cannot carry path segments",
            config.base_url
        )));
    }

    if config.board_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "board-name cannot be empty".to_string(),
        ));
    }

    if config.board_name.contains('/') {
        return Err(ConfigError::Validation(format!(
            "board-name must be a single path segment, got '{}'",
            config.board_name
        )));
    }

    Ok(())
}

fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.rows_per_page < 1 {
        return Err(ConfigError::Validation(
            "rows-per-page must be >= 1".to_string(),
        ));
    }

    if config.max_concurrent_pages > MAX_CONCURRENCY_CAP {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-pages must be between 0 and {}, got {}",
            MAX_CONCURRENCY_CAP, config.max_concurrent_pages
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1".to_string(),
        ));
    }

    if config.request_timeout_secs == 0 || config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeouts must be at least one second".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.table_path.is_empty() {
        return Err(ConfigError::Validation(
            "table-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    ListingSelectors::compile(config).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_base_url() {
        let mut config = Config::default();
        config.site.base_url = "ftp://example.com/board".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));

        config.site.base_url = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_validate_board_name() {
        let mut config = Config::default();
        config.site.board_name = "  ".to_string();
        assert!(validate(&config).is_err());

        config.site.board_name = "a/b".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_concurrency_cap() {
        let mut config = Config::default();
        config.scraper.max_concurrent_pages = 0;
        assert!(validate(&config).is_ok());

        config.scraper.max_concurrent_pages = 257;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_max_pages() {
        let mut config = Config::default();
        config.scraper.max_pages = 0;
        assert!(validate(&config).is_err());

        config.scraper.max_pages = 1;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_selectors() {
        let mut config = Config::default();
        config.selectors.row = "div[[".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidSelector { field: "row", .. })
        ));
    }
}
