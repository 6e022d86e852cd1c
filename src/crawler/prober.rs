//! Thread metadata discovery
//!
//! One preliminary fetch of page 1 tells the crawler how many pages exist
//! and what the thread is called. Discovery never fails: anything that goes
//! wrong yields a single untitled page.

use crate::crawler::extractor::RecordExtractor;
use crate::crawler::fetcher::Transport;
use serde::Serialize;

/// Metadata discovered by the probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadInfo {
    /// Total page count, at least 1
    pub total_pages: u32,

    /// Display title, if one was found
    pub title: Option<String>,
}

impl ThreadInfo {
    /// The fallback used when nothing can be discovered
    pub fn unknown() -> Self {
        Self {
            total_pages: 1,
            title: None,
        }
    }

    /// Rough record count for the whole thread
    pub fn estimated_records(&self, records_per_page: u32) -> u64 {
        u64::from(self.total_pages) * u64::from(records_per_page)
    }
}

impl Default for ThreadInfo {
    fn default() -> Self {
        Self::unknown()
    }
}

/// What the probe found, and whether the page count had to be assumed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub thread: ThreadInfo,

    /// True when no page count could be read and 1 was assumed
    pub page_count_assumed: bool,
}

impl ProbeReport {
    fn assumed(title: Option<String>) -> Self {
        Self {
            thread: ThreadInfo {
                total_pages: 1,
                title,
            },
            page_count_assumed: true,
        }
    }
}

/// Fetches page 1 and discovers the page count and title
///
/// Page count comes from the pagination control, then from the "page X of Y"
/// marker, then defaults to 1 (flagged in the report). The result is always
/// clamped to at least 1.
pub async fn probe<T, X>(transport: &T, extractor: &X, base_url: &str) -> ProbeReport
where
    T: Transport + ?Sized,
    X: RecordExtractor + ?Sized,
{
    let markup = match transport.get(base_url).await {
        Ok(markup) => markup,
        Err(e) => {
            tracing::warn!("Failed to probe thread info at {}: {}", base_url, e);
            return ProbeReport::assumed(None);
        }
    };

    let title = extractor.extract_title(&markup);
    let Some(total_pages) = extractor.extract_total_pages(&markup) else {
        tracing::debug!("No page count found at {}, assuming 1", base_url);
        return ProbeReport::assumed(title);
    };
    let total_pages = total_pages.max(1);

    tracing::debug!(
        "Probed {}: {} pages, title {:?}",
        base_url,
        total_pages,
        title
    );

    ProbeReport {
        thread: ThreadInfo { total_pages, title },
        page_count_assumed: false,
    }
}
