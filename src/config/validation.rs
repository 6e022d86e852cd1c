use crate::config::types::{Config, CrawlerConfig, HttpConfig, ListingConfig, SelectorConfig};
use crate::ConfigError;
use scraper::Selector;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_selector_config(&config.selectors)?;
    validate_listing_config(&config.listing)?;
    Ok(())
}

/// Validates crawl pacing and concurrency settings
pub fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.stride < 1 {
        return Err(ConfigError::Validation(format!(
            "stride must be >= 1, got {}",
            config.stride
        )));
    }

    if config.concurrency_limit < 1 || config.concurrency_limit > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency_limit must be between 1 and 100, got {}",
            config.concurrency_limit
        )));
    }

    if config.timeout_ms < 1 {
        return Err(ConfigError::Validation(
            "timeout_ms must be >= 1ms".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&config.delay_variation) {
        return Err(ConfigError::Validation(format!(
            "delay_variation must be between 0.0 and 1.0, got {}",
            config.delay_variation
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    if config.max_total_pages < 1 {
        return Err(ConfigError::Validation(
            "max_total_pages must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP client settings
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_ms < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_ms must be >= 1ms".to_string(),
        ));
    }

    if config.default_charset.trim().is_empty() {
        return Err(ConfigError::Validation(
            "default_charset cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates thread page selectors
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (field, selector) in [
        ("record", &config.record),
        ("record_body", &config.record_body),
        ("record_id", &config.record_id),
        ("pagination_link", &config.pagination_link),
        ("page_count", &config.page_count),
        ("title", &config.title),
        ("title_fallback", &config.title_fallback),
    ] {
        parse_selector(field, selector)?;
    }

    if config.page_suffix.is_empty() {
        return Err(ConfigError::Validation(
            "page_suffix cannot be empty".to_string(),
        ));
    }

    if config.page_count_word.trim().is_empty() {
        return Err(ConfigError::Validation(
            "page_count_word cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates listing page selectors
fn validate_listing_config(config: &ListingConfig) -> Result<(), ConfigError> {
    for (field, selector) in [
        ("thread_link", &config.thread_link),
        ("category", &config.category),
        ("row", &config.row),
        ("stats", &config.stats),
    ] {
        parse_selector(field, selector)?;
    }

    if config.views_word.trim().is_empty() || config.replies_word.trim().is_empty() {
        return Err(ConfigError::Validation(
            "views_word and replies_word cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Parses a CSS selector, naming the offending config field on failure
pub fn parse_selector(field: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|_| ConfigError::InvalidSelector {
        field: field.to_string(),
        selector: selector.to_string(),
    })
}
