//! Popular-threads listing
//!
//! Reads a forum's "popular threads" page into a list of thread summaries,
//! giving a user something to pick a base URL from.

use crate::config::{parse_selector, ListingConfig};
use crate::crawler::fetcher::Transport;
use crate::{ConfigError, HarvestError};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use url::Url;

/// One entry of the popular-threads listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularThread {
    pub title: String,

    /// Absolute thread URL, when the entry links anywhere
    pub url: Option<String>,

    /// Forum category, empty when absent
    pub category: String,

    pub views: Option<u64>,
    pub replies: Option<u64>,
}

struct ListingSelectors {
    thread_link: Selector,
    category: Selector,
    row: Selector,
    stats: Selector,
}

impl ListingSelectors {
    fn new(config: &ListingConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            thread_link: parse_selector("thread_link", &config.thread_link)?,
            category: parse_selector("category", &config.category)?,
            row: parse_selector("row", &config.row)?,
            stats: parse_selector("stats", &config.stats)?,
        })
    }
}

/// Fetches and parses the listing page at `listing_url`
///
/// Unlike page fetches during a crawl, a failed listing fetch is an error.
pub async fn fetch_popular_threads<T>(
    transport: &T,
    listing_url: &str,
    config: &ListingConfig,
) -> Result<Vec<PopularThread>, HarvestError>
where
    T: Transport + ?Sized,
{
    let page_url = Url::parse(listing_url)
        .map_err(|e| crate::UrlError::Parse(format!("{}: {}", listing_url, e)))?;

    let markup = transport.get(listing_url).await.map_err(|e| {
        tracing::error!("Failed to fetch popular threads from {}: {}", listing_url, e);
        e
    })?;

    let threads = parse_popular_threads(&markup, &page_url, config)?;
    tracing::info!("Found {} popular threads at {}", threads.len(), listing_url);
    Ok(threads)
}

/// Parses listing markup; relative thread links resolve against `page_url`
pub fn parse_popular_threads(
    markup: &str,
    page_url: &Url,
    config: &ListingConfig,
) -> Result<Vec<PopularThread>, ConfigError> {
    let selectors = ListingSelectors::new(config)?;
    let document = Html::parse_document(markup);

    let threads = document
        .select(&selectors.thread_link)
        .map(|link| {
            let title = link.text().collect::<String>().trim().to_string();
            let url = link
                .value()
                .attr("href")
                .and_then(|href| page_url.join(href).ok())
                .map(String::from);

            let category = sibling_matching(&link, &selectors.category)
                .map(|element| element.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            let stats = closest(&link, &selectors.row)
                .and_then(|row| row.select(&selectors.stats).next())
                .map(|element| element.text().collect::<String>());

            let (views, replies) = match stats.as_deref() {
                Some(text) => parse_counts(text, &config.views_word, &config.replies_word),
                None => (None, None),
            };

            PopularThread {
                title,
                url,
                category,
                views,
                replies,
            }
        })
        .collect();

    Ok(threads)
}

fn sibling_matching<'a>(element: &ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element
        .prev_siblings()
        .chain(element.next_siblings())
        .filter_map(ElementRef::wrap)
        .find(|sibling| selector.matches(sibling))
}

fn closest<'a>(element: &ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| selector.matches(ancestor))
}

/// Reads "934 visningar • 21 läsare • 46 svar" style text
///
/// Both counts are present or neither is. Numbers may contain spaces or
/// non-breaking spaces as thousands separators.
fn parse_counts(text: &str, views_word: &str, replies_word: &str) -> (Option<u64>, Option<u64>) {
    let lowered = text.to_lowercase();

    let Some(views_at) = lowered.find(&views_word.to_lowercase()) else {
        tracing::debug!("No view count in {:?}", text.trim());
        return (None, None);
    };
    let after_views = views_at + views_word.to_lowercase().len();
    let Some(replies_at) = lowered[after_views..]
        .find(&replies_word.to_lowercase())
        .map(|at| at + after_views)
    else {
        tracing::debug!("No reply count in {:?}", text.trim());
        return (None, None);
    };

    match (
        number_before(&lowered[..views_at]),
        number_before(&lowered[after_views..replies_at]),
    ) {
        (Some(views), Some(replies)) => (Some(views), Some(replies)),
        _ => (None, None),
    }
}

/// The number ending `text`, allowing blanks between digit groups
fn number_before(text: &str) -> Option<u64> {
    let digits: String = text
        .trim_end()
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit() || c.is_whitespace())
        .filter(char::is_ascii_digit)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    digits.parse().ok()
}
