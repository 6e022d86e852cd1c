//! Crawler module for paginated thread harvesting
//!
//! This module contains the core crawling logic, including:
//! - The rate gate bounding concurrent page fetches
//! - Page fetching over a pluggable transport
//! - Record and metadata extraction from page markup
//! - Page planning, batching and inter-batch pacing
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod gate;
mod listing;
mod prober;
mod scheduler;

pub use coordinator::Coordinator;
pub use extractor::{RecordExtractor, SelectorExtractor};
pub use fetcher::{build_http_client, fetch_page, HttpTransport, PageResult, Record, Transport};
pub use gate::{GateError, RateGate};
pub use listing::{fetch_popular_threads, parse_popular_threads, PopularThread};
pub use prober::{probe, ProbeReport, ThreadInfo};
pub use scheduler::{batches, jittered_delay, page_sequence};

use crate::config::Config;
use crate::output::{CrawlOutcome, ProgressSink};
use crate::url::parse_base_url;
use crate::HarvestError;

/// Runs a complete crawl of one thread
///
/// This is the main entry point for crawling. It will:
/// 1. Validate the base URL and configuration
/// 2. Build the HTTP transport and extractor
/// 3. Probe the thread for its page count and title
/// 4. Fetch the planned pages in gated batches
/// 5. Return the ordered records and the progress log
///
/// # Arguments
///
/// * `base_url` - URL of the thread's first page
/// * `config` - The crawler configuration
/// * `sink` - Optional live subscriber for progress lines
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl ran to completion, possibly with failed pages
/// * `Err(HarvestError)` - Invalid input; no page was fetched
pub async fn crawl(
    base_url: &str,
    config: &Config,
    sink: Option<&dyn ProgressSink>,
) -> Result<CrawlOutcome, HarvestError> {
    parse_base_url(base_url)?;
    let coordinator = Coordinator::from_config(config.clone())?;
    coordinator.crawl(base_url, sink).await
}

/// Discovers a thread's page count and title without crawling it
pub async fn probe_thread(base_url: &str, config: &Config) -> Result<ThreadInfo, HarvestError> {
    parse_base_url(base_url)?;
    let coordinator = Coordinator::from_config(config.clone())?;
    coordinator.probe(base_url).await
}
