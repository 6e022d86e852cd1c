//! HTML extraction of records and thread metadata
//!
//! The crawl core only depends on the `RecordExtractor` trait. The default
//! implementation, `SelectorExtractor`, reads pages with CSS selectors taken
//! from the `[selectors]` config section.

use crate::config::{parse_selector, SelectorConfig};
use crate::crawler::fetcher::Record;
use crate::url::{count_after_word, trailing_page_number};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};

/// Reads records and thread metadata out of page markup
pub trait RecordExtractor: Send + Sync {
    /// Extracts every record-like element, in document order
    fn extract_records(&self, markup: &str, page: u32) -> Vec<Record>;

    /// Total page count advertised by the page, if any
    fn extract_total_pages(&self, markup: &str) -> Option<u32>;

    /// Display title of the thread, if any
    fn extract_title(&self, markup: &str) -> Option<String>;
}

/// `RecordExtractor` driven by configured CSS selectors
#[derive(Debug, Clone)]
pub struct SelectorExtractor {
    record: Selector,
    record_body: Selector,
    record_id: Selector,
    pagination_link: Selector,
    page_count: Selector,
    title: Selector,
    title_fallback: Selector,
    unknown_id: String,
    page_count_word: String,
    page_suffix: String,
}

impl SelectorExtractor {
    /// Compiles the configured selectors
    ///
    /// # Returns
    ///
    /// * `Ok(SelectorExtractor)` - All selectors parsed
    /// * `Err(ConfigError::InvalidSelector)` - A selector failed to parse
    pub fn new(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            record: parse_selector("record", &config.record)?,
            record_body: parse_selector("record_body", &config.record_body)?,
            record_id: parse_selector("record_id", &config.record_id)?,
            pagination_link: parse_selector("pagination_link", &config.pagination_link)?,
            page_count: parse_selector("page_count", &config.page_count)?,
            title: parse_selector("title", &config.title)?,
            title_fallback: parse_selector("title_fallback", &config.title_fallback)?,
            unknown_id: config.unknown_id.clone(),
            page_count_word: config.page_count_word.clone(),
            page_suffix: config.page_suffix.clone(),
        })
    }

    /// Highest page number linked from the pagination control
    fn pagination_max(&self, document: &Html) -> Option<u32> {
        document
            .select(&self.pagination_link)
            .filter_map(|link| link.value().attr("href"))
            .filter_map(|href| trailing_page_number(href, &self.page_suffix))
            .max()
    }

    /// Y from the first "page X of Y" marker that has one
    fn page_count_marker(&self, document: &Html) -> Option<u32> {
        document
            .select(&self.page_count)
            .find_map(|element| count_after_word(&element_text(&element), &self.page_count_word))
    }
}

impl RecordExtractor for SelectorExtractor {
    fn extract_records(&self, markup: &str, page: u32) -> Vec<Record> {
        let document = Html::parse_document(markup);

        document
            .select(&self.record)
            .map(|element| {
                let body = joined_text(element.select(&self.record_body)).unwrap_or_default();
                let id = joined_text(element.select(&self.record_id))
                    .unwrap_or_else(|| self.unknown_id.clone());
                Record { id, body, page }
            })
            .collect()
    }

    fn extract_total_pages(&self, markup: &str) -> Option<u32> {
        let document = Html::parse_document(markup);

        self.pagination_max(&document)
            .or_else(|| self.page_count_marker(&document))
    }

    fn extract_title(&self, markup: &str) -> Option<String> {
        let document = Html::parse_document(markup);

        joined_text(document.select(&self.title))
            .or_else(|| joined_text(document.select(&self.title_fallback)))
    }
}

/// Concatenated, trimmed text of an element
fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Space-joined text of the given elements, or None when it is blank
fn joined_text<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> Option<String> {
    let text = elements
        .map(|element| element_text(&element))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}
