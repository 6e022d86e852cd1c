use serde::Deserialize;

/// Main configuration structure for Thread-Harvest
///
/// Every section is optional in the TOML file; missing sections and keys
/// fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub selectors: SelectorConfig,
    pub listing: ListingConfig,
}

/// Crawl pacing and concurrency
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Step between fetched page indices (1 = every page)
    pub stride: u32,

    /// Median pause between batches (milliseconds)
    pub base_delay_ms: u64,

    /// Relative spread of the inter-batch pause (0.5 = ±25%)
    pub delay_variation: f64,

    /// Hard cap on the number of pages fetched
    pub max_pages: Option<u32>,

    /// Upper bound on the page count read from a thread's markup
    pub max_total_pages: u32,

    /// Maximum simultaneous in-flight fetches, also the batch size
    pub concurrency_limit: u32,

    /// Per-fetch abandonment threshold (milliseconds)
    pub timeout_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            stride: 1,
            base_delay_ms: 2000,
            delay_variation: 0.5,
            max_pages: None,
            max_total_pages: 50_000,
            concurrency_limit: 3,
            timeout_ms: 30_000,
        }
    }
}

/// HTTP client behavior
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,

    /// Timeout for a single HTTP request (milliseconds)
    pub request_timeout_ms: u64,

    /// Charset used when the response does not declare one
    pub default_charset: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "sv-SE,sv;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
            request_timeout_ms: 10_000,
            default_charset: "iso-8859-1".to_string(),
        }
    }
}

/// CSS selectors and markers used to read a thread page
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectorConfig {
    /// One element per record
    pub record: String,

    /// Body text, relative to the record element
    pub record_body: String,

    /// Identifier text, relative to the record element
    pub record_id: String,

    /// Identifier used when a record has none
    pub unknown_id: String,

    /// Links inside the pagination control
    pub pagination_link: String,

    /// Element carrying the "page X of Y" text
    pub page_count: String,

    /// Word between X and Y in the page count text
    pub page_count_word: String,

    pub title: String,
    pub title_fallback: String,

    /// Appended to the base URL before the page number
    pub page_suffix: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            record: "div.post".to_string(),
            record_body: ".post_message".to_string(),
            record_id: "a[id^='postcount']".to_string(),
            unknown_id: "unknown".to_string(),
            pagination_link: ".pagination a[href*='p']".to_string(),
            page_count: "span.select2-selection__placeholder".to_string(),
            page_count_word: "av".to_string(),
            title: ".page-title h1 a".to_string(),
            title_fallback: "h1.entry-title".to_string(),
            page_suffix: "p".to_string(),
        }
    }
}

/// Selectors for the popular-threads listing page
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ListingConfig {
    pub thread_link: String,

    /// Category link, a sibling of the thread link
    pub category: String,

    /// Row element enclosing one listed thread
    pub row: String,

    /// Element in the row holding the view and reply counts
    pub stats: String,

    pub views_word: String,
    pub replies_word: String,

    /// Estimated records per page, used by probe-only mode
    pub records_per_page: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            thread_link: "a.thread-title".to_string(),
            category: "a.thread-forum-title".to_string(),
            row: "tr".to_string(),
            stats: "div.text-muted".to_string(),
            views_word: "visningar".to_string(),
            replies_word: "svar".to_string(),
            records_per_page: 12,
        }
    }
}
